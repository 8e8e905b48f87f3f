//! Unit-of-work identity cache.
//!
//! Maps the exact lookup key (username or email) to the identity it
//! resolved to, so repeated lookups within one unit of work hit the Portal
//! at most once per key. The cache is never shared across units of work.

use std::collections::HashMap;

use parking_lot::Mutex;
use pf_model::LocalIdentity;

/// Per-unit-of-work lookup cache.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: Mutex<HashMap<String, LocalIdentity>>,
}

impl IdentityCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the identity cached under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<LocalIdentity> {
        self.entries.lock().get(key).cloned()
    }

    /// Caches `identity` under `key`. Last write wins.
    pub fn put(&self, key: impl Into<String>, identity: LocalIdentity) {
        self.entries.lock().insert(key.into(), identity);
    }

    /// Replaces every entry holding this identity with the given record.
    pub fn refresh(&self, identity: &LocalIdentity) {
        self.entries
            .lock()
            .values_mut()
            .filter(|cached| cached.id == identity.id)
            .for_each(|cached| *cached = identity.clone());
    }

    /// Returns the number of cached keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
