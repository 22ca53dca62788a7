//! In-memory cache of rendered pages.
//!
//! A render takes a [`RenderTicket`] before reading its source and stores its
//! result with that ticket. Any invalidation in between bumps the cache
//! generation and the late result is dropped, so a slow render can never
//! overwrite the cache with content older than the latest file change.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation snapshot taken before a render starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    generation: u64,
}

/// Generation-guarded map from route key to rendered value.
#[derive(Debug)]
pub struct RenderCache<V> {
    entries: RwLock<HashMap<String, V>>,
    generation: AtomicU64,
}

impl<V: Clone> RenderCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Snapshot the current generation.
    pub fn ticket(&self) -> RenderTicket {
        RenderTicket {
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    /// Store `value` unless the cache was invalidated after `ticket` was taken.
    ///
    /// Returns whether the value was stored.
    pub fn insert(&self, key: impl Into<String>, value: V, ticket: RenderTicket) -> bool {
        let key = key.into();
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Checked under the write lock: invalidation bumps the generation
        // before it takes the lock, so a stale insert cannot slip in after it.
        if self.generation.load(Ordering::Acquire) != ticket.generation {
            tracing::debug!(%key, "Discarding stale render");
            return false;
        }
        entries.insert(key, value);
        true
    }

    /// Drop one entry and reject renders still in flight.
    pub fn invalidate(&self, key: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }

    /// Drop every entry and reject renders still in flight.
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for RenderCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = RenderCache::new();
        let ticket = cache.ticket();

        assert!(cache.insert("/docs/overview", "<h1>Overview</h1>".to_owned(), ticket));
        assert_eq!(
            cache.get("/docs/overview").as_deref(),
            Some("<h1>Overview</h1>")
        );
        assert_eq!(cache.get("/docs/api/rest"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let cache = RenderCache::new();
        let ticket = cache.ticket();

        cache.invalidate("/docs/overview");

        assert!(!cache.insert("/docs/overview", "old".to_owned(), ticket));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fresh_ticket_after_invalidation_accepted() {
        let cache = RenderCache::new();
        let stale = cache.ticket();
        cache.invalidate_all();
        let fresh = cache.ticket();

        assert_ne!(stale, fresh);
        assert!(cache.insert("/docs/overview", "new".to_owned(), fresh));
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = RenderCache::new();
        let ticket = cache.ticket();
        cache.insert("/docs/overview", 1, ticket);
        cache.insert("/docs/api/rest", 2, ticket);

        cache.invalidate("/docs/overview");
        assert_eq!(cache.get("/docs/overview"), None);
        assert_eq!(cache.get("/docs/api/rest"), Some(2));

        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_invalidation_blocks_late_insert() {
        let cache = Arc::new(RenderCache::new());
        let ticket = cache.ticket();

        let invalidator = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.invalidate("/docs/overview"))
        };
        invalidator.join().unwrap();

        assert!(!cache.insert("/docs/overview", "stale".to_owned(), ticket));
        assert_eq!(cache.get("/docs/overview"), None);
    }
}
