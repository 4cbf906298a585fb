//! URL segment parsing for claim and channel references.
//!
//! A path segment can denote a channel (`@name` or `@name:claimid`), a
//! full 40-character claim id, a short claim id, or a claim name. The
//! second segment of a two-part path is a claim name, optionally carrying
//! a file extension (`video.mp4`) which marks the request as a raw-asset
//! serve rather than an HTML show.

use crate::CLAIM_ID_LENGTH;
use crate::error::{Error, Result};

/// Channel references start with this marker in URLs.
pub const CHANNEL_CHAR: char = '@';

/// Separates a channel name from its claim id (`@chan:abcd...`).
const CLAIM_ID_CHAR: char = ':';

/// The decoded meaning of the first path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// `@name` or `@name:claimid`, a channel reference.
    Channel {
        channel_name: String,
        channel_claim_id: Option<String>,
    },
    /// Anything else: a claim id, short id, or (in legacy URLs) a claim
    /// name that the backward-compatibility swap will sort out.
    ClaimId(String),
}

/// The decoded meaning of a claim-name segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub claim_name: String,
    /// True when the segment carried a file extension, which requests raw
    /// asset bytes instead of an HTML page.
    pub is_serve_request: bool,
}

/// A full claim id is exactly 40 characters of `[A-Za-z0-9]`.
pub fn is_valid_claim_id(candidate: &str) -> bool {
    candidate.len() == CLAIM_ID_LENGTH && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A short claim id is taken to be exactly one character.
///
/// This only checks URL shape. It does not verify that the prefix is
/// unambiguous, and it rejects multi-character prefixes that would be
/// perfectly good short ids.
// TODO: accept any prefix here and let the resolver's prefix match decide
// ambiguity, instead of assuming short ids are single characters.
pub fn is_valid_short_id(candidate: &str) -> bool {
    candidate.len() == 1
}

/// True when the candidate looks like either a full or a short claim id.
pub fn is_valid_short_id_or_claim_id(candidate: &str) -> bool {
    is_valid_claim_id(candidate) || is_valid_short_id(candidate)
}

/// Characters allowed in claim and channel names.
fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn check_name_chars(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Parse(format!("no {what} provided")));
    }
    match name.chars().find(|c| !is_valid_name_char(*c)) {
        Some(bad) => Err(Error::Parse(format!(
            "invalid character \"{bad}\" in {what} \"{name}\""
        ))),
        None => Ok(()),
    }
}

/// Validate a bare claim or channel name (no markers, no extension).
pub fn validate_claim_name(name: &str) -> Result<()> {
    check_name_chars(name, "claim name")
}

/// Parse the first path segment into a channel or claim reference.
pub fn parse_identifier(segment: &str) -> Result<Identifier> {
    if segment.is_empty() {
        return Err(Error::Parse("no identifier provided".to_string()));
    }

    if let Some(rest) = segment.strip_prefix(CHANNEL_CHAR) {
        let (channel_name, channel_claim_id) = match rest.split_once(CLAIM_ID_CHAR) {
            Some((name, claim_id)) => (name, Some(claim_id)),
            None => (rest, None),
        };
        check_name_chars(channel_name, "channel name")?;
        // Any alphanumeric prefix is accepted here; whether it actually
        // identifies the channel is the resolver's call.
        if let Some(claim_id) = channel_claim_id
            && (claim_id.is_empty() || !claim_id.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(Error::Parse(format!(
                "invalid claim id \"{claim_id}\" for channel \"@{channel_name}\""
            )));
        }
        return Ok(Identifier::Channel {
            channel_name: channel_name.to_string(),
            channel_claim_id: channel_claim_id.map(str::to_string),
        });
    }

    // Non-channel identifiers may still carry a serve extension
    // (`/myvideo.mp4` lands here); the dot is split off by parse_name.
    match segment
        .chars()
        .find(|c| !is_valid_name_char(*c) && *c != '.')
    {
        Some(bad) => Err(Error::Parse(format!(
            "invalid character \"{bad}\" in identifier \"{segment}\""
        ))),
        None => Ok(Identifier::ClaimId(segment.to_string())),
    }
}

/// Parse a claim-name segment, splitting off a serve-request extension.
pub fn parse_name(segment: &str) -> Result<ParsedName> {
    if segment.is_empty() {
        return Err(Error::Parse("no claim name provided".to_string()));
    }

    let (claim_name, extension) = match segment.split_once('.') {
        Some((name, ext)) => (name, Some(ext)),
        None => (segment, None),
    };
    check_name_chars(claim_name, "claim name")?;

    let is_serve_request = match extension {
        Some("") => return Err(Error::Parse(format!("no file extension after \"{claim_name}.\""))),
        Some(_) => true,
        None => false,
    };

    Ok(ParsedName {
        claim_name: claim_name.to_string(),
        is_serve_request,
    })
}

/// Restore `(claim_id, claim_name)` ordering for legacy `/name/claim_id`
/// URLs: when the name segment parses as an id and the identifier segment
/// does not, the two are swapped.
pub fn flip_claim_name_and_id(claim_id: String, claim_name: String) -> (String, String) {
    if is_valid_short_id_or_claim_id(&claim_name) && !is_valid_short_id_or_claim_id(&claim_id) {
        (claim_name, claim_id)
    } else {
        (claim_id, claim_name)
    }
}
