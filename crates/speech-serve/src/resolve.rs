//! Claim and channel resolution against the store and the daemon.
//!
//! Expected absences come back as [`ResolveOutcome`] values; only real
//! faults (daemon or transport errors) come back as `Err`. The store is
//! consulted first, the daemon second, and anything the daemon reports
//! is folded back into the store.

use speech_core::Result;
use speech_core::claim::{ClaimInfo, ResolveOutcome};
use speech_core::uri::is_valid_claim_id;

use crate::state::AppState;

/// Claims shown per channel page.
pub const CHANNEL_PAGE_SIZE: usize = 10;

/// Everything the asset pages need about one claim.
#[derive(Debug, Clone)]
pub struct AssetView {
    pub claim: ClaimInfo,
    pub short_claim_id: String,
}

/// A channel page worth of claims plus paging state.
#[derive(Debug, Clone)]
pub struct ChannelViewData {
    /// Channel name including the `@` prefix.
    pub channel_name: String,
    pub channel_claim_id: String,
    pub claims: Vec<ClaimInfo>,
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

/// Compose a daemon URI for a channel, with its claim id when known.
fn channel_uri(channel_name: &str, channel_claim_id: Option<&str>) -> String {
    match channel_claim_id {
        Some(id) => format!("@{channel_name}#{id}"),
        None => format!("@{channel_name}"),
    }
}

/// Resolve request identifiers to a full claim id.
///
/// `channel` carries `(channel_name_without_marker, channel_claim_id)`
/// when the URL referenced a channel; otherwise `claim_id` is the raw
/// identifier segment (full id, short-id prefix, or absent).
pub async fn resolve_claim_id(
    state: &AppState,
    channel: Option<(&str, Option<&str>)>,
    claim_name: &str,
    claim_id: Option<&str>,
) -> Result<ResolveOutcome> {
    if let Some((channel_name, channel_claim_id)) = channel {
        return resolve_in_channel(state, channel_name, channel_claim_id, claim_name).await;
    }

    match claim_id {
        Some(id) if is_valid_claim_id(id) => Ok(ResolveOutcome::Found(id.to_string())),
        Some(prefix) => resolve_by_prefix(state, claim_name, prefix).await,
        None => resolve_winning(state, claim_name).await,
    }
}

/// Resolve a short-id prefix to the oldest matching claim.
async fn resolve_by_prefix(
    state: &AppState,
    claim_name: &str,
    prefix: &str,
) -> Result<ResolveOutcome> {
    if let Some(claim) = state.store.claim_by_prefix(claim_name, prefix) {
        return Ok(ResolveOutcome::Found(claim.claim_id));
    }

    let claims = state.daemon.claim_list(claim_name).await?;
    for claim in &claims {
        state.store.upsert_claim(claim.clone());
    }

    let found = claims
        .into_iter()
        .filter(|c| c.claim_id.starts_with(prefix))
        .min_by_key(|c| c.height);

    Ok(match found {
        Some(claim) => ResolveOutcome::Found(claim.claim_id),
        None => ResolveOutcome::NoClaim,
    })
}

/// Resolve a bare name to its winning claim (highest effective amount).
async fn resolve_winning(state: &AppState, claim_name: &str) -> Result<ResolveOutcome> {
    if let Some(claim) = state.store.winning_claim(claim_name) {
        return Ok(ResolveOutcome::Found(claim.claim_id));
    }

    let claims = state.daemon.claim_list(claim_name).await?;
    for claim in &claims {
        state.store.upsert_claim(claim.clone());
    }

    let found = claims.into_iter().max_by(|a, b| {
        a.effective_amount
            .partial_cmp(&b.effective_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(match found {
        Some(claim) => ResolveOutcome::Found(claim.claim_id),
        None => ResolveOutcome::NoClaim,
    })
}

/// Resolve a claim by name inside a channel.
async fn resolve_in_channel(
    state: &AppState,
    channel_name: &str,
    channel_claim_id: Option<&str>,
    claim_name: &str,
) -> Result<ResolveOutcome> {
    let at_name = format!("@{channel_name}");

    // Known channel: answer from the store when it already holds the claim.
    if state.store.channel_claim_id(&at_name).is_some()
        && let Some(claim) = state
            .store
            .claims_in_channel(&at_name)
            .into_iter()
            .find(|c| c.name == claim_name)
    {
        return Ok(ResolveOutcome::Found(claim.claim_id));
    }

    // Otherwise establish the channel identity with the daemon.
    let channel_id = match resolve_channel_id(state, channel_name, channel_claim_id).await? {
        Some(id) => id,
        None => return Ok(ResolveOutcome::NoChannel),
    };

    let uri = format!("@{channel_name}#{channel_id}/{claim_name}");
    let resolution = state.daemon.resolve(&uri).await?;
    let claim = resolution.and_then(|r| r.claim);

    Ok(match claim {
        Some(mut claim) => {
            claim.channel_name = Some(at_name);
            let id = claim.claim_id.clone();
            state.store.upsert_claim(claim);
            ResolveOutcome::Found(id)
        }
        None => ResolveOutcome::NoClaim,
    })
}

/// Establish a channel's full claim id via the store or the daemon.
///
/// Returns `Ok(None)` when the channel does not exist.
pub async fn resolve_channel_id(
    state: &AppState,
    channel_name: &str,
    channel_claim_id: Option<&str>,
) -> Result<Option<String>> {
    if let Some(id) = channel_claim_id
        && is_valid_claim_id(id)
    {
        return Ok(Some(id.to_string()));
    }

    let at_name = format!("@{channel_name}");
    if let Some(known) = state.store.channel_claim_id(&at_name) {
        let prefix_ok = channel_claim_id.is_none_or(|p| known.starts_with(p));
        if prefix_ok {
            return Ok(Some(known));
        }
    }

    let uri = channel_uri(channel_name, channel_claim_id);
    let resolution = state.daemon.resolve(&uri).await?;
    let certificate = resolution.and_then(|r| r.certificate);

    Ok(match certificate {
        Some(certificate) if !certificate.claim_id.is_empty() => {
            state.store.record_channel(&at_name, &certificate.claim_id);
            Some(certificate.claim_id)
        }
        _ => None,
    })
}

/// Build one page of channel view data.
///
/// Returns `Ok(None)` when the channel does not exist.
pub async fn channel_view_data(
    state: &AppState,
    channel_name: &str,
    channel_claim_id: Option<&str>,
    page: usize,
) -> Result<Option<ChannelViewData>> {
    let channel_id = match resolve_channel_id(state, channel_name, channel_claim_id).await? {
        Some(id) => id,
        None => return Ok(None),
    };

    let at_name = format!("@{channel_name}");
    let all_claims = state.store.claims_in_channel(&at_name);
    let total_results = all_claims.len();
    let total_pages = total_results.div_ceil(CHANNEL_PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);

    let claims = all_claims
        .into_iter()
        .skip((page - 1) * CHANNEL_PAGE_SIZE)
        .take(CHANNEL_PAGE_SIZE)
        .collect();

    Ok(Some(ChannelViewData {
        channel_name: at_name,
        channel_claim_id: channel_id,
        claims,
        page,
        total_pages,
        total_results,
    }))
}

/// Fetch everything the show pages need: resolved claim metadata plus
/// the claim's short id.
pub async fn asset_view(
    state: &AppState,
    claim_id: &str,
    claim_name: &str,
) -> Result<Option<AssetView>> {
    let claim = match state
        .store
        .claims_for_name(claim_name)
        .into_iter()
        .find(|c| c.claim_id == claim_id)
    {
        Some(claim) => Some(claim),
        None => {
            let uri = format!("{claim_name}#{claim_id}");
            let resolved = state.daemon.resolve(&uri).await?.and_then(|r| r.claim);
            if let Some(claim) = &resolved {
                state.store.upsert_claim(claim.clone());
            }
            resolved
        }
    };

    Ok(claim.map(|claim| {
        let short_claim_id = state.store.short_claim_id(claim_id, claim_name);
        AssetView {
            claim,
            short_claim_id,
        }
    }))
}
