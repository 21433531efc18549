//! Registry of records with an update in flight.
//!
//! Submitting the same edit twice before the first answer arrives would send
//! two mutations for one record. [`InFlight::try_acquire`] hands out at most
//! one guard per key; the key is released when the guard drops, including
//! when the request future is cancelled.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

/// Set of keys currently being mutated.
#[derive(Debug)]
pub struct InFlight<K> {
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K> Clone for InFlight<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or return `None` if it is already claimed.
    #[must_use]
    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<K>> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct InFlightGuard<K: Eq + Hash> {
    keys: Arc<Mutex<HashSet<K>>>,
    key: K,
}

impl<K: Eq + Hash> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let registry = InFlight::new();
        let guard = registry.try_acquire("gid://shopify/Customer/1");
        assert!(guard.is_some());
        assert!(registry.try_acquire("gid://shopify/Customer/1").is_none());

        // Other records are independent.
        assert!(registry.try_acquire("gid://shopify/Customer/2").is_some());
    }

    #[test]
    fn test_drop_releases_key() {
        let registry = InFlight::new();
        {
            let _guard = registry.try_acquire(7_u64);
            assert!(registry.try_acquire(7).is_none());
        }
        assert!(registry.try_acquire(7).is_some());
    }

    #[test]
    fn test_clones_share_keys() {
        let registry = InFlight::new();
        let clone = registry.clone();
        let _guard = registry.try_acquire('a');
        assert!(clone.try_acquire('a').is_none());
    }
}
