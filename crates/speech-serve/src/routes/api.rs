//! JSON API routes: daemon passthroughs plus the on-demand fetch
//! endpoint that cold serve requests redirect to.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::{Json, Router, routing::get, routing::post};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use speech_core::claim::{ClaimInfo, ClaimValue, FileRecord, StreamMetadata, StreamValue};
use speech_core::daemon::{PublishMetadata, PublishParams};
use speech_core::uri::{is_valid_claim_id, validate_claim_name};

use crate::error::ApiError;
use crate::negotiate::ResponseType;
use crate::state::AppState;
use crate::stats::StatEvent;

/// Default bid attached to publishes that do not specify one.
const DEFAULT_PUBLISH_BID: f64 = 0.01;

/// Deposit locked when creating a new channel.
const CHANNEL_NEW_AMOUNT: f64 = 0.1;

/// Build the `/api` sub-router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/claim-get/{name}/{claim_id}", get(claim_get))
        .route("/claim-list/{name}", get(claim_list))
        .route("/claim-resolve/{identifier}", get(claim_resolve))
        .route("/claim-publish", post(claim_publish))
        .route("/channel-new", post(channel_new))
}

/// `GET /api/claim-get/{name}/{claim_id}`
///
/// Ask the daemon to fetch the blob for a claim, record the resulting
/// local file, and answer with its bytes. Serve requests land here via
/// 307 when no local copy exists yet.
async fn claim_get(
    State(state): State<AppState>,
    Path((name, claim_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    validate_claim_name(&name)?;
    if !is_valid_claim_id(&claim_id) {
        return Err(ApiError::BadRequest(format!(
            "\"{claim_id}\" is not a full claim id"
        )));
    }

    let record = match state.store.file_record(&claim_id, &name) {
        Some(record) => record,
        None => {
            let fetched = state.daemon.get(&format!("{name}#{claim_id}")).await?;

            // Older daemons report only the file name; the path is then
            // the daemon's download directory plus that name.
            let file_path = if fetched.download_path.is_empty() {
                if fetched.file_name.is_empty() {
                    return Err(ApiError::NotFound(format!(
                        "the daemon could not produce a file for {name}#{claim_id}"
                    )));
                }
                let dir = state.daemon.download_directory().await;
                format!("{}/{}", dir.trim_end_matches('/'), fetched.file_name)
            } else {
                fetched.download_path
            };

            let record = FileRecord {
                name: name.clone(),
                claim_id: claim_id.clone(),
                file_path,
                file_name: if fetched.file_name.is_empty() {
                    name.clone()
                } else {
                    fetched.file_name
                },
                content_type: fetched
                    .mime_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                fetched_at: Utc::now(),
            };
            state.store.insert_file(record.clone());
            record
        }
    };

    let response = super::content::serve_file(&record).await?;
    state.stats.post(StatEvent::success(
        ResponseType::Serve,
        &format!("/api/claim-get/{name}/{claim_id}"),
        &forwarded_ip(&headers),
        &name,
        Some(claim_id.as_str()),
    ));
    Ok(response)
}

/// `GET /api/claim-list/{name}`
///
/// All claims competing for a name, as the daemon reports them.
async fn claim_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_claim_name(&name)?;
    let claims = state.daemon.claim_list(&name).await?;
    for claim in &claims {
        state.store.upsert_claim(claim.clone());
    }
    Ok(Json(json!({ "name": name, "claims": claims })))
}

/// `GET /api/claim-resolve/{identifier}`
///
/// Raw resolve passthrough for a name or channel identifier.
async fn claim_resolve(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let resolution = state
        .daemon
        .resolve(&identifier)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("\"{identifier}\" did not resolve")))?;

    if let Some(claim) = &resolution.claim {
        state.store.upsert_claim(claim.clone());
    }
    if let Some(certificate) = &resolution.certificate
        && !certificate.claim_id.is_empty()
    {
        state
            .store
            .record_channel(&certificate.name, &certificate.claim_id);
    }

    Ok(Json(json!({
        "claim": resolution.claim,
        "certificate": resolution.certificate,
        "claims_in_channel": resolution.claims_in_channel,
    })))
}

/// Body of `POST /api/claim-publish`.
///
/// The file must already be on a path the daemon can read; upload
/// transport is a front-end concern.
#[derive(Debug, Deserialize)]
struct PublishRequest {
    name: String,
    file_path: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    nsfw: bool,
    #[serde(default)]
    channel_name: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    bid: Option<f64>,
}

/// `POST /api/claim-publish`
async fn claim_publish(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PublishRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_claim_name(&request.name)?;
    if request.file_path.is_empty() {
        return Err(ApiError::BadRequest("no file path provided".to_string()));
    }
    let channel_name = request
        .channel_name
        .as_deref()
        .map(normalize_channel_name)
        .transpose()?;

    let params = PublishParams {
        name: request.name.clone(),
        file_path: request.file_path.clone(),
        bid: request.bid.unwrap_or(DEFAULT_PUBLISH_BID),
        metadata: PublishMetadata {
            title: request.title.clone().unwrap_or_else(|| request.name.clone()),
            description: request.description.clone().unwrap_or_default(),
            license: request.license.clone().unwrap_or_else(|| "None".to_string()),
            nsfw: request.nsfw,
            author: None,
            thumbnail: request.thumbnail.clone(),
        },
        channel_name: channel_name.clone(),
    };

    let receipt = state.daemon.publish(&params).await?;
    tracing::info!(name = %request.name, claim_id = %receipt.claim_id, "claim published");

    // Remember what we just published so pages and serves can answer
    // without another round trip.
    let content_type = request
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    state.store.upsert_claim(ClaimInfo {
        name: request.name.clone(),
        claim_id: receipt.claim_id.clone(),
        channel_name: channel_name.clone(),
        value: ClaimValue {
            stream: Some(StreamValue {
                metadata: StreamMetadata {
                    title: request.title,
                    description: request.description,
                    license: request.license,
                    thumbnail: request.thumbnail,
                    content_type: Some(content_type.clone()),
                    nsfw: request.nsfw,
                    ..Default::default()
                },
                source: None,
            }),
        },
        ..Default::default()
    });
    state.store.insert_file(FileRecord {
        name: request.name.clone(),
        claim_id: receipt.claim_id.clone(),
        file_name: file_name_of(&request.file_path),
        file_path: request.file_path,
        content_type,
        fetched_at: Utc::now(),
    });

    let url = format!(
        "{}/{}/{}",
        state.config.base_url, receipt.claim_id, request.name
    );
    state.stats.post(StatEvent {
        action: "PUBLISH".to_string(),
        url: "/api/claim-publish".to_string(),
        ip: forwarded_ip(&headers),
        claim_name: request.name.clone(),
        claim_id: Some(receipt.claim_id.clone()),
        result: "success".to_string(),
    });

    Ok(Json(json!({
        "success": true,
        "message": {
            "name": request.name,
            "claim_id": receipt.claim_id,
            "url": url,
            "txid": receipt.txid,
        }
    })))
}

/// Body of `POST /api/channel-new`.
#[derive(Debug, Deserialize)]
struct ChannelNewRequest {
    name: String,
}

/// `POST /api/channel-new`
async fn channel_new(
    State(state): State<AppState>,
    Json(request): Json<ChannelNewRequest>,
) -> Result<Json<Value>, ApiError> {
    let channel_name = normalize_channel_name(&request.name)?;

    let receipt = state
        .daemon
        .channel_new(&channel_name, CHANNEL_NEW_AMOUNT)
        .await?;
    tracing::info!(channel = %channel_name, claim_id = %receipt.claim_id, "channel created");

    state.store.record_channel(&channel_name, &receipt.claim_id);

    Ok(Json(json!({
        "success": true,
        "channel_name": channel_name,
        "claim_id": receipt.claim_id,
        "txid": receipt.txid,
    })))
}

/// Accept a channel name with or without the `@` marker, returning the
/// canonical `@name` form.
fn normalize_channel_name(name: &str) -> Result<String, ApiError> {
    let bare = name.strip_prefix('@').unwrap_or(name);
    validate_claim_name(bare)
        .map_err(|_| ApiError::BadRequest(format!("\"{name}\" is not a valid channel name")))?;
    Ok(format!("@{bare}"))
}

fn forwarded_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Last path component of a daemon-side file path.
fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
