//! Error types for claim resolution and daemon access.
//!
//! Two kinds of failure flow through the server: expected absences
//! (`NoClaim`, `NoChannel`, missing file records) which are modeled as
//! [`crate::claim::ResolveOutcome`] variants, and faults, which are this
//! type. Every fault normalizes to an HTTP status and a client-facing
//! message via [`Error::http_status`] and [`Error::user_message`].

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing identifiers or talking to the daemon.
#[derive(Error, Debug)]
pub enum Error {
    /// The daemon socket refused the connection or could not be reached.
    #[error("connection refused: the daemon may not be running")]
    Unreachable(#[source] Option<reqwest::Error>),

    /// The daemon answered with a non-success HTTP status.
    ///
    /// `body` holds the parsed response body when it was JSON, or a
    /// string value with the raw text otherwise.
    #[error("daemon returned HTTP {status}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    /// The daemon accepted the call but reported an RPC-level error
    /// inside its `result` payload.
    #[error("{message}")]
    Rpc { message: String },

    /// The daemon response was empty or structurally unusable, which the
    /// daemon produces when an operation timed out internally.
    #[error("unexpected daemon response: {0}")]
    EmptyResponse(String),

    /// A URL segment could not be parsed into a claim or channel
    /// reference. Always the client's fault, never a server fault.
    #[error("{0}")]
    Parse(String),

    /// Any other transport failure (timeouts, TLS, malformed URLs).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Classify a reqwest failure, separating connection-refused-style
    /// errors from the rest.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unreachable(Some(err))
        } else {
            Self::Transport(err)
        }
    }

    /// The HTTP status this fault maps to.
    ///
    /// Classification order, first match wins:
    /// 1. connection refused → 503
    /// 2. upstream HTTP response → its status (500 when unknown)
    /// 3. anything with a message → 400
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unreachable(_) => 503,
            Self::Upstream { status, .. } => {
                if *status == 0 {
                    500
                } else {
                    *status
                }
            }
            _ => 400,
        }
    }

    /// The message shown to the client.
    ///
    /// For upstream responses the message is dug out of the body: a
    /// top-level `message` field wins, then a nested `error.message`,
    /// then the raw body itself.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable(_) => {
                "Connection refused. The daemon may not be running.".to_string()
            }
            Self::Upstream { body, .. } => extract_upstream_message(body),
            other => other.to_string(),
        }
    }
}

/// Pull the most specific human-readable message out of an upstream body.
fn extract_upstream_message(body: &serde_json::Value) -> String {
    if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(message) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    match body {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render an error and its full source chain for diagnostics.
///
/// Wrapped transport errors keep their detail in `source()`, so logging
/// only the display form would drop the part that matters.
pub fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
