//! Speech - web front end for publishing and serving LBRY content.
//!
//! This crate provides an HTTP server that translates browser requests
//! into calls against a local LBRY daemon and renders server-side HTML
//! pages for assets and channels.
//!
//! # Architecture
//!
//! - **Parse**: a URL segment is decoded into a channel reference, a
//!   claim id, a short id, or a claim name (`speech_core::uri`)
//! - **Negotiate**: `Accept`/`Range`/`User-Agent` decide between raw
//!   bytes and an HTML page (`negotiate`)
//! - **Resolve**: identifiers become a concrete claim id via the
//!   in-process store and the daemon (`resolve`)
//! - **Respond**: serve local bytes, render a page with maud, or
//!   307-redirect cold serves to the fetch endpoint (`routes`)
//!
//! Expected absences (no claim, no channel, no file) are ordinary
//! control flow with their own pages and redirects; faults normalize to
//! `{status, message}` in `speech_core::error`.
//!
//! # URL Pattern
//!
//! ```text
//! GET /{identifier}
//! GET /{identifier}/{name}
//! ```
//!
//! Supported identifiers:
//! - `@channel` / `@channel:claimid` → channel page
//! - `name` → winning asset for the name
//! - `name.ext` → raw asset bytes
//! - 40-char claim id or short-id prefix (with `{name}`) → that asset
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Strict Content-Security-Policy: no JavaScript execution
//! - X-Frame-Options: DENY prevents clickjacking

pub mod config;
pub mod error;
pub mod negotiate;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;
pub mod stats;
pub mod store;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
