//! Claim, channel, and local-file types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of resolving identifiers to a concrete claim id.
///
/// Expected absences are values here, not errors: a missing claim or
/// channel gets its own "not found" page, while faults (daemon errors,
/// transport failures) travel as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Resolution produced a full 40-character claim id.
    Found(String),
    /// No claim exists for the requested name / id.
    NoClaim,
    /// The requested channel does not exist.
    NoChannel,
}

/// A claim as the daemon reports it from `resolve` and `claim_list`.
///
/// The daemon nests stream metadata two levels deep; the accessors at the
/// bottom flatten the common lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub claim_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub effective_amount: f64,
    #[serde(default)]
    pub height: u64,
    /// Set when the claim was resolved through a channel.
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub value: ClaimValue,
}

/// The `value` envelope of a claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimValue {
    #[serde(default)]
    pub stream: Option<StreamValue>,
}

/// A stream claim's payload: metadata plus the source descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamValue {
    #[serde(default)]
    pub metadata: StreamMetadata,
    #[serde(default)]
    pub source: Option<StreamSource>,
}

/// Publisher-supplied metadata for a stream claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
}

/// Where the stream bytes come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamSource {
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
}

impl ClaimInfo {
    fn metadata(&self) -> Option<&StreamMetadata> {
        self.value.stream.as_ref().map(|s| &s.metadata)
    }

    /// Display title, falling back to the claim name.
    pub fn title(&self) -> &str {
        self.metadata()
            .and_then(|m| m.title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.description.as_deref())
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.thumbnail.as_deref())
    }

    pub fn nsfw(&self) -> bool {
        self.metadata().is_some_and(|m| m.nsfw)
    }

    /// Content type from metadata, falling back to the source descriptor.
    pub fn content_type(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.content_type.as_deref())
            .or_else(|| {
                self.value
                    .stream
                    .as_ref()
                    .and_then(|s| s.source.as_ref())
                    .and_then(|s| s.content_type.as_deref())
            })
    }
}

/// A channel certificate as the daemon reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub claim_id: String,
}

/// A locally available copy of a claim's content.
///
/// Records are created when the daemon finishes a `get` or `publish`; a
/// serve request that finds no record 307-redirects to the fetch endpoint
/// instead of blocking on the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub claim_id: String,
    pub file_path: String,
    pub file_name: String,
    pub content_type: String,
    pub fetched_at: DateTime<Utc>,
}
