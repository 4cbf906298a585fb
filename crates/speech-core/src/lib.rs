//! Core types and daemon plumbing for the Speech content server.
//!
//! This crate provides:
//! - Claim and channel identifier parsing and validation
//! - The JSON-RPC client for the local LBRY daemon
//! - Claim, channel, and file-record types shared across the server
//! - The error taxonomy with HTTP status normalization

mod error;

pub mod claim;
pub mod daemon;
pub mod uri;

pub use claim::{ClaimInfo, FileRecord, ResolveOutcome};
pub use daemon::{DaemonClient, DaemonConfig};
pub use error::{Error, Result, describe_chain};

/// A full claim id is exactly this many base36 characters.
pub const CLAIM_ID_LENGTH: usize = 40;
