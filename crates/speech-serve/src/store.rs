//! In-process store of known claims, channels, and local files.
//!
//! The daemon is the source of truth; this store remembers what this
//! node has published, resolved, or fetched so that channel pages, short
//! ids, and serve requests can be answered without a round trip. Records
//! are rebuildable from the daemon, so nothing here is persisted.

use std::collections::HashMap;

use parking_lot::RwLock;

use speech_core::claim::{ClaimInfo, FileRecord};

/// Shared store guarded by a single lock; all operations are short map
/// manipulations and never held across awaits.
#[derive(Debug, Default)]
pub struct Store {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Claims by full claim id.
    claims: HashMap<String, ClaimInfo>,
    /// Claim ids competing for each claim name.
    by_name: HashMap<String, Vec<String>>,
    /// Channel claim ids by channel name (with the `@` prefix).
    channels: HashMap<String, String>,
    /// Local file records by `(claim_id, name)`.
    files: HashMap<(String, String), FileRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh a claim record.
    pub fn upsert_claim(&self, claim: ClaimInfo) {
        if claim.claim_id.is_empty() || claim.name.is_empty() {
            return;
        }
        let mut inner = self.inner.write();
        let ids = inner.by_name.entry(claim.name.clone()).or_default();
        if !ids.contains(&claim.claim_id) {
            ids.push(claim.claim_id.clone());
        }
        inner.claims.insert(claim.claim_id.clone(), claim);
    }

    /// All known claims competing for a name.
    pub fn claims_for_name(&self, name: &str) -> Vec<ClaimInfo> {
        let inner = self.inner.read();
        inner
            .by_name
            .get(name)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.claims.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The winning claim for a name: highest effective amount.
    pub fn winning_claim(&self, name: &str) -> Option<ClaimInfo> {
        self.claims_for_name(name).into_iter().max_by(|a, b| {
            a.effective_amount
                .partial_cmp(&b.effective_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Find the claim for a name whose id starts with the given prefix.
    ///
    /// When several match, the oldest claim (lowest height) wins, which
    /// keeps short ids stable as newer claims arrive.
    pub fn claim_by_prefix(&self, name: &str, prefix: &str) -> Option<ClaimInfo> {
        self.claims_for_name(name)
            .into_iter()
            .filter(|c| c.claim_id.starts_with(prefix))
            .min_by_key(|c| c.height)
    }

    /// Shortest prefix of `claim_id` that is unambiguous among the known
    /// claims sharing `name`. Falls back to the full id when every
    /// prefix collides.
    pub fn short_claim_id(&self, claim_id: &str, name: &str) -> String {
        let competitors: Vec<String> = self
            .claims_for_name(name)
            .into_iter()
            .map(|c| c.claim_id)
            .filter(|id| id != claim_id)
            .collect();

        for len in 1..=claim_id.len() {
            let prefix = &claim_id[..len];
            if !competitors.iter().any(|id| id.starts_with(prefix)) {
                return prefix.to_string();
            }
        }
        claim_id.to_string()
    }

    /// Remember a channel's full claim id.
    pub fn record_channel(&self, channel_name: &str, claim_id: &str) {
        self.inner
            .write()
            .channels
            .insert(channel_name.to_string(), claim_id.to_string());
    }

    pub fn channel_claim_id(&self, channel_name: &str) -> Option<String> {
        self.inner.read().channels.get(channel_name).cloned()
    }

    /// Claims owned by a channel, newest first.
    pub fn claims_in_channel(&self, channel_name: &str) -> Vec<ClaimInfo> {
        let inner = self.inner.read();
        let mut claims: Vec<ClaimInfo> = inner
            .claims
            .values()
            .filter(|c| c.channel_name.as_deref() == Some(channel_name))
            .cloned()
            .collect();
        claims.sort_by(|a, b| b.height.cmp(&a.height).then(a.claim_id.cmp(&b.claim_id)));
        claims
    }

    /// Record a locally available file for a claim.
    pub fn insert_file(&self, record: FileRecord) {
        self.inner
            .write()
            .files
            .insert((record.claim_id.clone(), record.name.clone()), record);
    }

    /// Look up the local file for `(claim_id, name)`.
    pub fn file_record(&self, claim_id: &str, name: &str) -> Option<FileRecord> {
        self.inner
            .read()
            .files
            .get(&(claim_id.to_string(), name.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claim(name: &str, claim_id: &str, effective_amount: f64, height: u64) -> ClaimInfo {
        ClaimInfo {
            name: name.to_string(),
            claim_id: claim_id.to_string(),
            effective_amount,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn upsert_and_list_by_name() {
        let store = Store::new();
        store.upsert_claim(claim("video", "aaaa", 1.0, 10));
        store.upsert_claim(claim("video", "abcd", 2.0, 20));
        store.upsert_claim(claim("other", "zzzz", 5.0, 5));

        let claims = store.claims_for_name("video");
        assert_eq!(claims.len(), 2);
        assert!(store.claims_for_name("missing").is_empty());
    }

    #[test]
    fn upsert_is_idempotent() {
        let store = Store::new();
        store.upsert_claim(claim("video", "aaaa", 1.0, 10));
        store.upsert_claim(claim("video", "aaaa", 3.0, 10));
        let claims = store.claims_for_name("video");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].effective_amount, 3.0);
    }

    #[test]
    fn ignores_incomplete_claims() {
        let store = Store::new();
        store.upsert_claim(claim("", "aaaa", 1.0, 10));
        store.upsert_claim(claim("video", "", 1.0, 10));
        assert!(store.claims_for_name("video").is_empty());
    }

    #[test]
    fn winning_claim_is_highest_effective_amount() {
        let store = Store::new();
        store.upsert_claim(claim("video", "aaaa", 1.0, 10));
        store.upsert_claim(claim("video", "bbbb", 4.5, 20));
        store.upsert_claim(claim("video", "cccc", 2.0, 30));

        assert_eq!(store.winning_claim("video").unwrap().claim_id, "bbbb");
        assert!(store.winning_claim("missing").is_none());
    }

    #[test]
    fn prefix_match_prefers_oldest() {
        let store = Store::new();
        store.upsert_claim(claim("video", "abc1", 1.0, 300));
        store.upsert_claim(claim("video", "abc2", 1.0, 100));
        store.upsert_claim(claim("video", "xyz9", 1.0, 50));

        assert_eq!(store.claim_by_prefix("video", "a").unwrap().claim_id, "abc2");
        assert_eq!(store.claim_by_prefix("video", "xyz").unwrap().claim_id, "xyz9");
        assert!(store.claim_by_prefix("video", "q").is_none());
    }

    #[test]
    fn short_id_is_shortest_unambiguous_prefix() {
        let store = Store::new();
        store.upsert_claim(claim("video", "abcdef", 1.0, 10));
        store.upsert_claim(claim("video", "abxyz0", 1.0, 20));
        store.upsert_claim(claim("video", "q12345", 1.0, 30));

        assert_eq!(store.short_claim_id("q12345", "video"), "q");
        assert_eq!(store.short_claim_id("abcdef", "video"), "abc");
        assert_eq!(store.short_claim_id("abxyz0", "video"), "abx");
    }

    #[test]
    fn short_id_for_sole_claim_is_one_char() {
        let store = Store::new();
        store.upsert_claim(claim("video", "abcdef", 1.0, 10));
        assert_eq!(store.short_claim_id("abcdef", "video"), "a");
    }

    #[test]
    fn channel_bookkeeping() {
        let store = Store::new();
        store.record_channel("@news", "ffff");
        assert_eq!(store.channel_claim_id("@news").as_deref(), Some("ffff"));
        assert!(store.channel_claim_id("@other").is_none());
    }

    #[test]
    fn channel_claims_newest_first() {
        let store = Store::new();
        let mut a = claim("one", "aaaa", 1.0, 10);
        a.channel_name = Some("@news".to_string());
        let mut b = claim("two", "bbbb", 1.0, 30);
        b.channel_name = Some("@news".to_string());
        let mut c = claim("three", "cccc", 1.0, 20);
        c.channel_name = Some("@other".to_string());
        store.upsert_claim(a);
        store.upsert_claim(b);
        store.upsert_claim(c);

        let claims = store.claims_in_channel("@news");
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].claim_id, "bbbb");
        assert_eq!(claims[1].claim_id, "aaaa");
    }

    #[test]
    fn file_records_round_trip() {
        let store = Store::new();
        assert!(store.file_record("aaaa", "video").is_none());

        store.insert_file(FileRecord {
            name: "video".to_string(),
            claim_id: "aaaa".to_string(),
            file_path: "/tmp/video.mp4".to_string(),
            file_name: "video.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            fetched_at: Utc::now(),
        });

        let record = store.file_record("aaaa", "video").unwrap();
        assert_eq!(record.file_path, "/tmp/video.mp4");
        assert!(store.file_record("aaaa", "other").is_none());
    }
}
