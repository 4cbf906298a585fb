//! Content routes: `GET /{identifier}` and `GET /{identifier}/{name}`.
//!
//! The identifier segment is ambiguous (a channel, a full claim id, a
//! short id, or, in legacy URLs, a claim name), so each request is
//! parsed, possibly swapped for backward compatibility, negotiated into
//! a response type, resolved to a concrete claim id, and finally shown,
//! served, or redirected.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use maud::Markup;
use serde::Deserialize;

use speech_core::claim::{FileRecord, ResolveOutcome};
use speech_core::uri::{
    Identifier, ParsedName, flip_claim_name_and_id, parse_identifier, parse_name,
};

use crate::error::PageError;
use crate::negotiate::{ResponseType, determine_response_type};
use crate::render;
use crate::resolve;
use crate::state::AppState;
use crate::stats::StatEvent;

/// Query parameters for channel pages.
#[derive(Debug, Deserialize)]
pub struct ChannelPageQuery {
    pub page: Option<usize>,
}

/// `GET /{identifier}/{name}`: an asset addressed through a channel or
/// a claim id.
pub async fn asset_handler(
    State(state): State<AppState>,
    Path((identifier, name)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, PageError> {
    let ParsedName {
        claim_name,
        is_serve_request,
    } = parse_name(&name)?;
    let response_type = determine_response_type(is_serve_request, &headers);
    let ip = client_ip(&headers);

    match parse_identifier(&identifier)? {
        Identifier::Channel {
            channel_name,
            channel_claim_id,
        } => {
            log_request_data(Some(response_type), &claim_name, Some(&channel_name), None);
            let outcome = resolve::resolve_claim_id(
                &state,
                Some((&channel_name, channel_claim_id.as_deref())),
                &claim_name,
                None,
            )
            .await?;
            finish_asset(&state, outcome, response_type, &claim_name, uri.path(), &ip).await
        }
        Identifier::ClaimId(raw) => {
            // Legacy URLs put the name first and the id second.
            let (claim_id, claim_name) = flip_claim_name_and_id(raw, claim_name);
            log_request_data(Some(response_type), &claim_name, None, Some(&claim_id));
            let outcome =
                resolve::resolve_claim_id(&state, None, &claim_name, Some(&claim_id)).await?;
            finish_asset(&state, outcome, response_type, &claim_name, uri.path(), &ip).await
        }
    }
}

/// `GET /{identifier}`: a channel page, or the winning asset for a
/// bare claim name.
pub async fn identifier_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<ChannelPageQuery>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, PageError> {
    let ip = client_ip(&headers);

    match parse_identifier(&identifier)? {
        Identifier::Channel {
            channel_name,
            channel_claim_id,
        } => {
            log_request_data(None, "", Some(&channel_name), None);
            let page = query.page.unwrap_or(1);
            let view = resolve::channel_view_data(
                &state,
                &channel_name,
                channel_claim_id.as_deref(),
                page,
            )
            .await?;
            match view {
                Some(view) => Ok(html_response(render::channel::render(
                    &view,
                    &state.config.base_url,
                    &state.config.site_name,
                ))),
                None => Ok(no_channel_page(&state)),
            }
        }
        Identifier::ClaimId(raw) => {
            let ParsedName {
                claim_name,
                is_serve_request,
            } = parse_name(&raw)?;
            let response_type = determine_response_type(is_serve_request, &headers);
            log_request_data(Some(response_type), &claim_name, None, None);
            let outcome = resolve::resolve_claim_id(&state, None, &claim_name, None).await?;
            finish_asset(&state, outcome, response_type, &claim_name, uri.path(), &ip).await
        }
    }
}

/// Turn a resolution outcome into the final response, posting a stat
/// event on success.
async fn finish_asset(
    state: &AppState,
    outcome: ResolveOutcome,
    response_type: ResponseType,
    claim_name: &str,
    url: &str,
    ip: &str,
) -> Result<Response, PageError> {
    match outcome {
        ResolveOutcome::NoClaim => Ok(no_claim_page(state)),
        ResolveOutcome::NoChannel => Ok(no_channel_page(state)),
        ResolveOutcome::Found(claim_id) => {
            let response = show_or_serve(state, response_type, &claim_id, claim_name).await?;
            state.stats.post(StatEvent::success(
                response_type,
                url,
                ip,
                claim_name,
                Some(claim_id.as_str()),
            ));
            Ok(response)
        }
    }
}

/// Dispatch a resolved claim by response type.
async fn show_or_serve(
    state: &AppState,
    response_type: ResponseType,
    claim_id: &str,
    claim_name: &str,
) -> Result<Response, PageError> {
    match response_type {
        ResponseType::Show => match resolve::asset_view(state, claim_id, claim_name).await? {
            Some(view) => Ok(html_response(render::asset::render(
                &view,
                &state.config.base_url,
                &state.config.site_name,
            ))),
            None => Ok(no_claim_page(state)),
        },
        ResponseType::ShowLite => match resolve::asset_view(state, claim_id, claim_name).await? {
            Some(view) => Ok(html_response(render::lite::render(
                &view,
                &state.config.base_url,
                &state.config.site_name,
            ))),
            None => Ok(no_claim_page(state)),
        },
        ResponseType::Serve => serve_asset(state, claim_id, claim_name).await,
    }
}

/// Serve the local file for a claim, or redirect to the fetch endpoint
/// when no local copy exists yet. The redirect keeps cold serves from
/// holding the connection open while the daemon downloads.
async fn serve_asset(
    state: &AppState,
    claim_id: &str,
    claim_name: &str,
) -> Result<Response, PageError> {
    match state.store.file_record(claim_id, claim_name) {
        Some(record) => Ok(serve_file(&record).await?),
        None => {
            tracing::debug!(claim_id = %claim_id, name = %claim_name, "no local file, redirecting to fetch endpoint");
            Ok(Redirect::temporary(&format!("/api/claim-get/{claim_name}/{claim_id}")).into_response())
        }
    }
}

/// Read a local file record off disk and answer with its bytes.
pub(crate) async fn serve_file(record: &FileRecord) -> Result<Response, std::io::Error> {
    let bytes = tokio::fs::read(&record.file_path).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&record.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("inline; filename=\"{}\"", record.file_name))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((StatusCode::OK, headers, bytes).into_response())
}

/// Build an HTML response with content, security, and ETag headers.
pub(crate) fn html_response(markup: Markup) -> Response {
    let html = markup.into_string();
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(render::components::CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, value);
    }

    (StatusCode::OK, headers, html).into_response()
}

fn no_claim_page(state: &AppState) -> Response {
    html_response(render::missing::no_claim(
        &state.config.base_url,
        &state.config.site_name,
    ))
}

fn no_channel_page(state: &AppState) -> Response {
    html_response(render::missing::no_channel(
        &state.config.base_url,
        &state.config.site_name,
    ))
}

/// Best-effort client IP for stats, from the usual proxy headers.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default()
}

fn log_request_data(
    response_type: Option<ResponseType>,
    claim_name: &str,
    channel_name: Option<&str>,
    claim_id: Option<&str>,
) {
    tracing::debug!(
        response_type = response_type.map(|r| r.as_str()).unwrap_or("-"),
        claim_name = %claim_name,
        channel_name = channel_name.unwrap_or("-"),
        claim_id = claim_id.unwrap_or("-"),
        "content request"
    );
}
