use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Display, Formatter},
};

use log::{debug, trace};

use crate::drive::FolderCandidate;

/// Handle to a live [`SelectionSession`]. Allocated from a monotonic counter
/// that is never reset, so tokens of concurrently-live sessions are pairwise
/// distinct by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Token> for u64 {
    fn from(value: Token) -> Self {
        value.0
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Candidates presented to one dialog, keyed by candidate id.
#[derive(Debug)]
struct SelectionSession {
    candidates: HashMap<String, FolderCandidate>,
    created_at: jiff::Timestamp,
}

/// Outcome of looking a selection payload up in the cache. All variants are
/// normal protocol outcomes, not faults.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    Selected(FolderCandidate),
    /// The token is not live anymore: consumed, expired or evicted.
    Expired,
    /// The token is live but names no candidate of that session.
    InvalidChoice,
}

/// Bounded table of in-flight selection sessions. Ordered by token, which is
/// allocation order, so the smallest key is always the oldest session.
#[derive(Debug)]
pub struct SessionCache {
    live: BTreeMap<Token, SelectionSession>,
    next_token: u64,
    capacity: usize,
}

impl SessionCache {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            live: BTreeMap::new(),
            next_token: 0,
            capacity,
        }
    }

    /// Stores the candidate set under a fresh token. When the cache is at
    /// capacity the oldest live session is evicted first, keeping memory
    /// bounded however long the process runs.
    pub fn create(&mut self, candidates: Vec<FolderCandidate>) -> Token {
        if self.live.len() >= self.capacity
            && let Some((evicted, session)) = self.live.pop_first()
        {
            debug!(
                "session cache full, evicting token {evicted} created at {}",
                session.created_at
            );
        }

        let token = Token(self.next_token);
        self.next_token += 1;

        let candidates = candidates
            .into_iter()
            .map(|candidate| (candidate.id().clone(), candidate))
            .collect();
        self.live.insert(
            token,
            SelectionSession {
                candidates,
                created_at: jiff::Timestamp::now(),
            },
        );
        trace!("created session {token}");

        token
    }

    /// One-shot consumption: a successful resolve removes the session before
    /// returning, so the same token can never resolve twice. An unknown
    /// candidate leaves the session in place.
    pub fn resolve(&mut self, token: Token, candidate_id: &str) -> Resolution {
        let Some(session) = self.live.get(&token) else {
            return Resolution::Expired;
        };
        if !session.candidates.contains_key(candidate_id) {
            return Resolution::InvalidChoice;
        }

        let mut session = self
            .live
            .remove(&token)
            .expect("session looked up above should still be present");
        let candidate = session
            .candidates
            .remove(candidate_id)
            .expect("candidate looked up above should still be present");
        trace!("consumed session {token}");
        Resolution::Selected(candidate)
    }

    /// Explicit removal, used when a dialog is cancelled or superseded.
    /// Removing a token that is no longer live is a no-op.
    pub fn expire(&mut self, token: Token) {
        if self.live.remove(&token).is_some() {
            trace!("expired session {token}");
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn candidate_count(&self, token: Token) -> Option<usize> {
        self.live.get(&token).map(|session| session.candidates.len())
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    fn candidates(ids: &[&str]) -> Vec<FolderCandidate> {
        ids.iter()
            .map(|id| FolderCandidate::fake(id, &format!("folder {id}"), &format!("/{id}")))
            .collect()
    }

    #[fixture]
    fn cache() -> SessionCache {
        SessionCache::new(3)
    }

    #[rstest]
    fn test_create_stores_one_entry_per_candidate(mut cache: SessionCache) {
        let token = cache.create(candidates(&["a", "b", "c"]));

        assert_eq!(Some(3), cache.candidate_count(token));
    }

    #[rstest]
    fn test_live_tokens_are_pairwise_distinct(mut cache: SessionCache) {
        let first = cache.create(candidates(&["a"]));
        let second = cache.create(candidates(&["a"]));
        let third = cache.create(candidates(&["a"]));

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[rstest]
    fn test_resolve_is_one_shot(mut cache: SessionCache) {
        let token = cache.create(candidates(&["a", "b"]));

        let first = cache.resolve(token, "a");
        let second = cache.resolve(token, "a");

        assert_matches!(first, Resolution::Selected(_));
        assert_eq!(Resolution::Expired, second);
    }

    #[rstest]
    fn test_resolve_unknown_token_is_expired(mut cache: SessionCache) {
        assert_eq!(Resolution::Expired, cache.resolve(Token(99), "a"));
    }

    #[rstest]
    fn test_resolve_unknown_candidate_keeps_session_live(mut cache: SessionCache) {
        let token = cache.create(candidates(&["a"]));

        assert_eq!(Resolution::InvalidChoice, cache.resolve(token, "nope"));
        assert_matches!(cache.resolve(token, "a"), Resolution::Selected(_));
    }

    #[rstest]
    fn test_create_at_capacity_evicts_oldest_session(mut cache: SessionCache) {
        let oldest = cache.create(candidates(&["a"]));
        cache.create(candidates(&["b"]));
        cache.create(candidates(&["c"]));
        cache.create(candidates(&["d"]));

        assert_eq!(3, cache.live_count());
        assert_eq!(Resolution::Expired, cache.resolve(oldest, "a"));
    }

    #[rstest]
    fn test_expire_removes_session(mut cache: SessionCache) {
        let token = cache.create(candidates(&["a"]));

        cache.expire(token);

        assert_eq!(Resolution::Expired, cache.resolve(token, "a"));
        assert_eq!(0, cache.live_count());
    }

    #[rstest]
    fn test_resolved_candidate_is_returned_intact(mut cache: SessionCache) {
        let token = cache.create(vec![FolderCandidate::fake("a", "Docs", "/team/a")]);

        let Resolution::Selected(candidate) = cache.resolve(token, "a") else {
            panic!("selection should resolve");
        };
        assert_eq!("Docs", candidate.name());
        assert_eq!("/team/a", candidate.path());
    }
}
