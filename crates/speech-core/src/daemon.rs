//! JSON-RPC client for the local LBRY daemon.
//!
//! Every method is an HTTP POST of `{method, params}` to the daemon's
//! single RPC endpoint. A successful call answers `{result: ...}`; an
//! RPC-level failure answers `{result: {error: ...}}`; an empty or
//! malformed body is how the daemon signals an internal timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::claim::{ChannelInfo, ClaimInfo};
use crate::error::{Error, Result};

/// Connection settings for the daemon RPC endpoint.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request timeout for each RPC call.
    pub request_timeout: Duration,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5279,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Seconds the daemon itself may spend fetching a blob before giving up.
const GET_TIMEOUT_SECS: u32 = 20;

/// Download directory used when the daemon cannot report its own.
const FALLBACK_DOWNLOAD_DIR: &str = "/home/lbry/Downloads/";

/// What the daemon knows about a URI: the winning claim and, for channel
/// URIs, the channel certificate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub claim: Option<ClaimInfo>,
    #[serde(default)]
    pub certificate: Option<ChannelInfo>,
    #[serde(default)]
    pub claims_in_channel: Option<u64>,
}

/// Response of a `get` call: where the daemon put the blob.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub claim_id: String,
    #[serde(default)]
    pub download_path: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Parameters for publishing a new claim.
#[derive(Debug, Clone, Serialize)]
pub struct PublishParams {
    pub name: String,
    pub file_path: String,
    pub bid: f64,
    pub metadata: PublishMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

/// Metadata attached to a published claim.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishMetadata {
    pub title: String,
    pub description: String,
    pub license: String,
    pub nsfw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Receipt for a `publish` or `channel_new` transaction.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TxReceipt {
    #[serde(default)]
    pub claim_id: String,
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub nout: u32,
}

/// Client for the daemon's JSON-RPC-over-HTTP API.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    http: reqwest::Client,
    url: String,
}

impl DaemonClient {
    /// Build a client for the configured host and port.
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            url: format!("http://{}:{}", config.host, config.port),
        })
    }

    /// Issue one RPC call and unwrap its `result` payload.
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "method": method, "params": params }))
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.map_err(Error::from_transport)?;
            let body =
                serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await.map_err(Error::from_transport)?;
        unwrap_result(data)
    }

    /// Resolve a URI to its winning claim and/or channel certificate.
    ///
    /// Returns `Ok(None)` when the daemon reports the URI as unresolvable
    /// (its per-URI error entry), which is an expected absence rather
    /// than a fault.
    pub async fn resolve(&self, uri: &str) -> Result<Option<Resolution>> {
        tracing::debug!(uri = %uri, "daemon resolve");
        let result = self.call("resolve", json!({ "uri": uri })).await?;

        // The daemon keys resolve results by the requested URI.
        let entry = match result.get(uri) {
            Some(entry) => entry.clone(),
            None => result,
        };

        if let Some(err) = entry.get("error")
            && !err.is_null()
        {
            tracing::debug!(uri = %uri, error = %err, "uri did not resolve");
            return Ok(None);
        }

        let resolution: Resolution =
            serde_json::from_value(entry.clone()).map_err(|_| Error::EmptyResponse(entry.to_string()))?;
        Ok(Some(resolution))
    }

    /// Ask the daemon to fetch the blob for a URI and report the local
    /// file it lands in.
    pub async fn get(&self, uri: &str) -> Result<GetResult> {
        tracing::debug!(uri = %uri, "daemon get");
        let result = self
            .call("get", json!({ "uri": uri, "timeout": GET_TIMEOUT_SECS }))
            .await?;
        serde_json::from_value(result.clone())
            .map_err(|_| Error::EmptyResponse(result.to_string()))
    }

    /// List all claims competing for a name.
    pub async fn claim_list(&self, name: &str) -> Result<Vec<ClaimInfo>> {
        tracing::debug!(name = %name, "daemon claim_list");
        let result = self.call("claim_list", json!({ "name": name })).await?;
        let claims = match result.get("claims") {
            Some(claims) => claims.clone(),
            None => result,
        };
        serde_json::from_value(claims.clone())
            .map_err(|_| Error::EmptyResponse(claims.to_string()))
    }

    /// Publish a new claim.
    pub async fn publish(&self, params: &PublishParams) -> Result<TxReceipt> {
        tracing::debug!(name = %params.name, "daemon publish");
        let params_value =
            serde_json::to_value(params).map_err(|e| Error::EmptyResponse(e.to_string()))?;
        let result = self.call("publish", params_value).await?;
        serde_json::from_value(result.clone())
            .map_err(|_| Error::EmptyResponse(result.to_string()))
    }

    /// Create a new channel certificate.
    pub async fn channel_new(&self, channel_name: &str, amount: f64) -> Result<TxReceipt> {
        tracing::debug!(channel = %channel_name, "daemon channel_new");
        let result = self
            .call(
                "channel_new",
                json!({ "channel_name": channel_name, "amount": amount }),
            )
            .await?;
        serde_json::from_value(result.clone())
            .map_err(|_| Error::EmptyResponse(result.to_string()))
    }

    /// The daemon's download directory.
    ///
    /// Falls back to a conventional default when the daemon cannot be
    /// asked, so publish flows keep working against a half-up node.
    pub async fn download_directory(&self) -> String {
        match self.call("settings_get", json!({})).await {
            Ok(result) => result
                .get("download_directory")
                .and_then(|d| d.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_DOWNLOAD_DIR.to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "settings_get failed, using fallback download directory");
                FALLBACK_DOWNLOAD_DIR.to_string()
            }
        }
    }
}

/// Unwrap the `{result}` envelope, surfacing RPC errors and treating a
/// missing result as the daemon's timed-out shape.
fn unwrap_result(data: Value) -> Result<Value> {
    match data.get("result") {
        Some(result) if !result.is_null() => {
            if let Some(err) = result.get("error")
                && !err.is_null()
            {
                let message = err
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                return Err(Error::Rpc { message });
            }
            Ok(result.clone())
        }
        _ => Err(Error::EmptyResponse(data.to_string())),
    }
}
