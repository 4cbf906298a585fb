//! Application state shared across all request handlers.

use std::sync::Arc;

use speech_core::DaemonClient;

use crate::config::Config;
use crate::stats::StatsSink;
use crate::store::Store;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the local daemon's RPC endpoint.
    pub daemon: DaemonClient,

    /// In-process claim/channel/file store.
    pub store: Arc<Store>,

    /// Fire-and-forget analytics sink.
    pub stats: StatsSink,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create the application state, spawning the stats worker.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let daemon = DaemonClient::new(&config.daemon)?;
        let stats = StatsSink::spawn(config.stats_url.clone());

        tracing::info!(
            daemon_host = %config.daemon.host,
            daemon_port = config.daemon.port,
            "application state initialized"
        );

        Ok(Self {
            daemon,
            store: Arc::new(Store::new()),
            stats,
            config: Arc::new(config),
        })
    }
}
