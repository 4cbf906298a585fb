//! Application configuration loaded from environment variables.

use std::time::Duration;

use speech_core::DaemonConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000").
    pub bind_addr: String,

    /// Connection settings for the local daemon's RPC endpoint.
    pub daemon: DaemonConfig,

    /// Base URL for this server (used in canonical URLs and OG tags).
    pub base_url: String,

    /// Site name shown in page titles and OG tags.
    pub site_name: String,

    /// One-line site description for the home page and OG tags.
    pub site_description: String,

    /// Optional endpoint that receives best-effort analytics posts.
    /// Unset disables the stats sink entirely.
    pub stats_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional and default to a local development
    /// setup:
    /// - `SPEECH_BIND_ADDR`: Server bind address (default: "0.0.0.0:3000")
    /// - `SPEECH_DAEMON_HOST`: Daemon RPC host (default: "localhost")
    /// - `SPEECH_DAEMON_PORT`: Daemon RPC port (default: 5279)
    /// - `SPEECH_DAEMON_TIMEOUT_SECS`: Per-call RPC timeout (default: 30)
    /// - `SPEECH_BASE_URL`: Canonical base URL (default: "http://localhost:3000")
    /// - `SPEECH_SITE_NAME`: Site name (default: "Speech")
    /// - `SPEECH_SITE_DESCRIPTION`: Site tagline
    /// - `SPEECH_STATS_URL`: Analytics sink endpoint (default: unset)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SPEECH_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let daemon_host =
            std::env::var("SPEECH_DAEMON_HOST").unwrap_or_else(|_| "localhost".to_string());

        let daemon_port: u16 = std::env::var("SPEECH_DAEMON_PORT")
            .unwrap_or_else(|_| "5279".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("SPEECH_DAEMON_PORT must be a port number"))?;

        let daemon_timeout: u64 = std::env::var("SPEECH_DAEMON_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("SPEECH_DAEMON_TIMEOUT_SECS must be a number"))?;

        let base_url = std::env::var("SPEECH_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("SPEECH_SITE_NAME").unwrap_or_else(|_| "Speech".to_string());

        let site_description = std::env::var("SPEECH_SITE_DESCRIPTION").unwrap_or_else(|_| {
            "Open-source, decentralized image and video hosting.".to_string()
        });

        let stats_url = std::env::var("SPEECH_STATS_URL")
            .ok()
            .filter(|s| !s.is_empty());

        tracing::info!(
            bind_addr = %bind_addr,
            daemon = %format!("{daemon_host}:{daemon_port}"),
            base_url = %base_url,
            site_name = %site_name,
            stats_sink = stats_url.is_some(),
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            daemon: DaemonConfig {
                host: daemon_host,
                port: daemon_port,
                request_timeout: Duration::from_secs(daemon_timeout),
            },
            base_url,
            site_name,
            site_description,
            stats_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "SPEECH_BIND_ADDR",
        "SPEECH_DAEMON_HOST",
        "SPEECH_DAEMON_PORT",
        "SPEECH_DAEMON_TIMEOUT_SECS",
        "SPEECH_BASE_URL",
        "SPEECH_SITE_NAME",
        "SPEECH_SITE_DESCRIPTION",
        "SPEECH_STATS_URL",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:3000");
            assert_eq!(config.daemon.host, "localhost");
            assert_eq!(config.daemon.port, 5279);
            assert_eq!(config.base_url, "http://localhost:3000");
            assert_eq!(config.site_name, "Speech");
            assert!(config.stats_url.is_none());
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("SPEECH_BIND_ADDR", "127.0.0.1:9090"),
                ("SPEECH_DAEMON_HOST", "daemon.internal"),
                ("SPEECH_DAEMON_PORT", "6279"),
                ("SPEECH_BASE_URL", "https://spee.ch"),
                ("SPEECH_SITE_NAME", "My Speech"),
                ("SPEECH_STATS_URL", "https://stats.internal/ingest"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.daemon.host, "daemon.internal");
                assert_eq!(config.daemon.port, 6279);
                assert_eq!(config.base_url, "https://spee.ch");
                assert_eq!(config.site_name, "My Speech");
                assert_eq!(
                    config.stats_url.as_deref(),
                    Some("https://stats.internal/ingest")
                );
            },
        );
    }

    #[test]
    fn config_base_url_trailing_slash_stripped() {
        with_env_vars(&[("SPEECH_BASE_URL", "https://spee.ch/")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.base_url, "https://spee.ch");
        });
    }

    #[test]
    fn config_rejects_bad_port() {
        with_env_vars(&[("SPEECH_DAEMON_PORT", "not-a-port")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_empty_stats_url_disables_sink() {
        with_env_vars(&[("SPEECH_STATS_URL", "")], || {
            let config = Config::from_env().unwrap();
            assert!(config.stats_url.is_none());
        });
    }
}
