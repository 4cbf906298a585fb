//! Error-to-response conversion for page and API routes.
//!
//! Page routes render an HTML error page; API routes answer with a JSON
//! payload of `{status, success: false, message}`. Both derive their
//! status and message from the core error normalization, and both log
//! the full error source chain before responding.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, PreEscaped, html};
use serde::Serialize;

use speech_core::describe_chain;

use crate::render::components::ERROR_CSS;

/// Fault on a user-facing page route; renders as HTML.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Anything from the parsing/resolution/daemon layer; status and
    /// message come from the core normalization.
    #[error(transparent)]
    Core(#[from] speech_core::Error),

    /// A local file that should exist could not be read.
    #[error("failed to read local file: {0}")]
    Io(#[from] std::io::Error),
}

impl PageError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Core(err) => (response_status(err), err.user_message()),
            Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The file for this claim could not be read.".to_string(),
            ),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        tracing::error!(
            status = status.as_u16(),
            error = %describe_chain(&self),
            "request failed"
        );

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { "Error " (status.as_u16()) }
                    meta name="robots" content="noindex";
                    style { (PreEscaped(ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { "Something went wrong" }
                        p { (message) }
                        a href="/" { "Back home" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

/// Fault on an API route; renders as JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The requested claim or channel does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Anything from the resolution/daemon layer.
    #[error(transparent)]
    Core(#[from] speech_core::Error),

    /// A local file that should exist could not be read.
    #[error("failed to read local file: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorPayload {
    status: u16,
    success: bool,
    message: String,
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::Core(err) => (response_status(err), err.user_message()),
            Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The file for this claim could not be read.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        tracing::error!(
            status = status.as_u16(),
            error = %describe_chain(&self),
            "api request failed"
        );

        let payload = ErrorPayload {
            status: status.as_u16(),
            success: false,
            message,
        };
        (status, Json(payload)).into_response()
    }
}

/// Translate the normalized numeric status into a `StatusCode`.
fn response_status(err: &speech_core::Error) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
