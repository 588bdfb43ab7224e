//! Memo of search results keyed by query
//!
//! Each entry holds its own handle on the buffer its range indexes into, so a
//! cached range stays valid after the searcher moves on to other results.

use super::types::{OccurrenceRange, Occurrences};
use ahash::AHashMap;

/// What was searched for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Exact byte pattern
    Exact(Vec<u8>),
    /// Pattern with ASCII letters matched in either case
    IgnoreCase(Vec<u8>),
    /// Union of several exact patterns, in sorted order
    Any(Vec<Vec<u8>>),
}

/// A remembered result
#[derive(Debug, Clone)]
pub struct CachedRange {
    pub source: Occurrences,
    pub range: OccurrenceRange,
}

#[derive(Debug, Default)]
pub struct SearchCache {
    entries: AHashMap<CacheKey, CachedRange>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CachedRange> {
        self.entries.get(key)
    }

    /// Look up an exact pattern
    pub fn get_exact(&self, pattern: &[u8]) -> Option<&CachedRange> {
        self.entries.get(&CacheKey::Exact(pattern.to_vec()))
    }

    pub fn insert(&mut self, key: CacheKey, source: Occurrences, range: OccurrenceRange) {
        self.entries.insert(key, CachedRange { source, range });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_and_get() {
        let mut cache = SearchCache::new();
        assert!(cache.is_empty());

        cache.insert(
            CacheKey::Exact(b"ana".to_vec()),
            Occurrences::Array,
            OccurrenceRange::new(2, 3),
        );
        let hit = cache.get_exact(b"ana").unwrap();
        assert_eq!(hit.range, OccurrenceRange::new(2, 3));
        assert!(cache.get_exact(b"an").is_none());
        assert!(cache.get(&CacheKey::IgnoreCase(b"ana".to_vec())).is_none());
    }

    #[test]
    fn test_entry_keeps_buffer_alive() {
        let mut cache = SearchCache::new();
        let buffer = Arc::new(vec![1, 3]);
        cache.insert(
            CacheKey::IgnoreCase(b"ana".to_vec()),
            Occurrences::Owned(buffer.clone()),
            OccurrenceRange::new(0, 1),
        );
        drop(buffer);

        let entry = cache.get(&CacheKey::IgnoreCase(b"ana".to_vec())).unwrap();
        match &entry.source {
            Occurrences::Owned(points) => assert_eq!(points.as_slice(), &[1, 3]),
            Occurrences::Array => panic!("expected owned buffer"),
        }

        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
