//! Content negotiation: deciding whether a request gets raw asset bytes
//! or an HTML page.
//!
//! The same URL serves two audiences: humans opening it in a browser and
//! `<img>`/`<video>` tags embedding it directly. There is no separate URL
//! scheme for "embed" vs. "visit", so intent is inferred from the
//! `Accept`, `Range`, and `User-Agent` headers.

use axum::http::{HeaderMap, header};

/// How a content request should be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Raw asset bytes.
    Serve,
    /// Full asset detail page.
    Show,
    /// Lightweight HTML wrapper around the asset.
    ShowLite,
}

impl ResponseType {
    /// Short tag used in logs and stats posts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serve => "SERVE",
            Self::Show => "SHOW",
            Self::ShowLite => "SHOWLITE",
        }
    }
}

fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
}

/// The client negotiates for an HTML page.
fn client_accepts_html(headers: &HeaderMap) -> bool {
    accept_header(headers).is_some_and(|accept| accept.contains("text/html"))
}

/// The request came from a browser (or something wearing its UA string).
fn request_is_from_browser(headers: &HeaderMap) -> bool {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| ua.contains("Mozilla"))
}

/// The client is asking for media bytes rather than a page: an image
/// `Accept` with no HTML alternative, or a ranged (video) request.
fn client_wants_asset(headers: &HeaderMap) -> bool {
    let image_is_wanted = accept_header(headers).is_some_and(|accept| {
        accept.contains("image/") && !accept.contains("text/html") && !accept.contains("text/*")
    });
    let video_is_wanted = accept_header(headers).is_some() && headers.contains_key(header::RANGE);
    image_is_wanted || video_is_wanted
}

/// Select the response type for a content request.
///
/// A serve URL opened directly in a browser gets the lightweight HTML
/// wrapper instead of raw bytes; a show URL embedded in an `<img>` or
/// `<video>` tag gets the bytes instead of a page.
pub fn determine_response_type(is_serve_request: bool, headers: &HeaderMap) -> ResponseType {
    if is_serve_request {
        if client_accepts_html(headers) {
            return ResponseType::ShowLite;
        }
        return ResponseType::Serve;
    }

    if client_wants_asset(headers) && request_is_from_browser(headers) {
        tracing::debug!("show request wants an image/video; answering with raw bytes");
        return ResponseType::Serve;
    }
    ResponseType::Show
}
