//! Fire-and-forget analytics sink.
//!
//! Request handlers post one [`StatEvent`] per terminal outcome. Posting
//! is a channel send that never blocks and never fails the request; a
//! background worker drains the channel and POSTs each event to the
//! configured sink, logging (and otherwise swallowing) delivery errors.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::negotiate::ResponseType;

/// One analytics datum: what was requested and how it ended.
#[derive(Debug, Clone, Serialize)]
pub struct StatEvent {
    /// Response tag ("SERVE", "SHOW", "SHOWLITE") or an API action name.
    pub action: String,
    /// Original request path.
    pub url: String,
    /// Client IP, best effort.
    pub ip: String,
    pub claim_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
    /// "success" or "failure".
    pub result: String,
}

impl StatEvent {
    pub fn success(
        response_type: ResponseType,
        url: &str,
        ip: &str,
        claim_name: &str,
        claim_id: Option<&str>,
    ) -> Self {
        Self {
            action: response_type.as_str().to_string(),
            url: url.to_string(),
            ip: ip.to_string(),
            claim_name: claim_name.to_string(),
            claim_id: claim_id.map(str::to_string),
            result: "success".to_string(),
        }
    }
}

/// Handle for posting stat events from request handlers.
#[derive(Debug, Clone)]
pub struct StatsSink {
    tx: Option<mpsc::UnboundedSender<StatEvent>>,
}

impl StatsSink {
    /// Spawn the delivery worker for the configured sink URL.
    ///
    /// With no URL the sink is disabled: posts become debug logs.
    pub fn spawn(sink_url: Option<String>) -> Self {
        let Some(url) = sink_url else {
            tracing::debug!("no stats sink configured, analytics disabled");
            return Self { tx: None };
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<StatEvent>();
        tokio::spawn(async move {
            let client = reqwest::Client::new();
            while let Some(event) = rx.recv().await {
                if let Err(err) = client.post(&url).json(&event).send().await {
                    tracing::warn!(error = %err, action = %event.action, "stats post failed");
                }
            }
        });

        Self { tx: Some(tx) }
    }

    /// A sink that drops everything; used in tests.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Post an event. Never blocks, never errors.
    pub fn post(&self, event: StatEvent) {
        match &self.tx {
            Some(tx) => {
                // A closed channel means the worker is gone; nothing to do
                // but note it.
                if tx.send(event).is_err() {
                    tracing::warn!("stats worker is gone, dropping event");
                }
            }
            None => {
                tracing::debug!(
                    action = %event.action,
                    claim_name = %event.claim_name,
                    result = %event.result,
                    "stat event (sink disabled)"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sink_accepts_posts() {
        let sink = StatsSink::disabled();
        sink.post(StatEvent::success(
            ResponseType::Serve,
            "/video.mp4",
            "127.0.0.1",
            "video",
            Some("abcd"),
        ));
    }

    #[test]
    fn event_serializes_without_missing_claim_id() {
        let event = StatEvent::success(ResponseType::Show, "/video", "", "video", None);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["action"], "SHOW");
        assert_eq!(value["result"], "success");
        assert!(value.get("claim_id").is_none());
    }

    #[tokio::test]
    async fn spawned_sink_accepts_posts_without_blocking() {
        let sink = StatsSink::spawn(Some("http://127.0.0.1:1/ingest".to_string()));
        for _ in 0..100 {
            sink.post(StatEvent::success(
                ResponseType::Serve,
                "/video.mp4",
                "127.0.0.1",
                "video",
                Some("abcd"),
            ));
        }
    }
}
