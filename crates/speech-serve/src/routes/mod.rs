//! Route definitions for the content server.
//!
//! ## Routes
//!
//! - `GET /` - Home page
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /api/claim-get/{name}/{claim_id}` - Fetch a blob via the daemon, then serve it
//! - `GET /api/claim-list/{name}` - Claims competing for a name (JSON)
//! - `GET /api/claim-resolve/{identifier}` - Resolve passthrough (JSON)
//! - `POST /api/claim-publish` - Publish a claim
//! - `POST /api/channel-new` - Create a channel
//! - `GET /{identifier}` - Channel page or winning asset
//! - `GET /{identifier}/{name}` - Asset by channel or claim id

mod api;
mod content;
mod health;
mod home;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .nest("/api", api::router())
        .route("/{identifier}", get(content::identifier_handler))
        .route("/{identifier}/{name}", get(content::asset_handler))
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Crawlers should see asset and channel pages for link previews.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}
