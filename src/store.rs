//! Host-scoped memory of the last override payload applied by an operator.
//!
//! One store is created per session and shared by reference (usually an
//! `Arc<OverrideStore>`) between every open editor. Payloads are kept as the
//! raw text the operator typed so they can be shown again unchanged.
//!
//! Entries live for the whole process; there is no eviction. Concurrent writes
//! to the same host race and the last writer wins. Writes to different hosts
//! never interfere.

use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct OverrideStore {
    entries: DashMap<String, String>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload last stored for `host`.
    pub fn get(&self, host: &str) -> Option<String> {
        self.entries.get(host).map(|entry| entry.value().clone())
    }

    /// Replaces whatever was stored for `host`.
    ///
    /// `host` must be non-empty; callers skip the call when no host is known.
    pub fn put(&self, host: &str, payload: &str) {
        debug_assert!(!host.is_empty(), "override store keyed by an empty host");
        self.entries.insert(host.to_string(), payload.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the hosts with remembered overrides, sorted.
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        hosts.sort();
        hosts
    }
}
