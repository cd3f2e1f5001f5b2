// src/crawl/registry.rs
// =============================================================================
// The visited registry: the set of URLs that some crawl task has claimed.
//
// Many tasks run at the same time and several of them can discover the same
// link at the same moment. Only ONE of them may go on to fetch it. The
// registry makes that decision with a single operation, claim_if_new(),
// which checks and inserts under one lock.
//
// Rules:
// - A URL is never removed once claimed
// - Exactly one caller ever sees `true` for a given URL
// - URLs are compared as exact strings (no normalization)
//
// Rust concepts:
// - Mutex: Exclusive access to shared data across threads
// - HashSet::insert: Returns true only when the value was not present
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

// Concurrency-safe set of claimed URLs
//
// The inner HashSet is private on purpose: the only way to touch it is
// claim_if_new(), so nobody can do a separate "contains" then "insert".
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller
    ///
    /// Returns true exactly once per distinct URL: for the call that
    /// inserted it. Every other call, from any task, returns false.
    pub fn claim_if_new(&self, url: &str) -> bool {
        // A panic while holding this lock can only come from HashSet itself,
        // and the set is still consistent afterwards, so poisoning is ignored
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);

        // Avoid allocating a String for URLs we have already seen
        if claimed.contains(url) {
            return false;
        }
        claimed.insert(url.to_string())
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
