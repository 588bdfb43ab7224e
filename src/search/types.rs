//! Result types of the searcher

use crate::index::{IndexPoint, SuffixArray};
use std::sync::Arc;

/// Inclusive bounds of a match within an occurrence buffer
///
/// Only exists for non-empty results; "no match" is `None` at the use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceRange {
    pub first: usize,
    pub last: usize,
}

impl OccurrenceRange {
    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last);
        Self { first, last }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// A range always holds at least one occurrence
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, i: usize) -> bool {
        self.first <= i && i <= self.last
    }
}

/// Buffer an [`OccurrenceRange`] indexes into
#[derive(Debug, Clone)]
pub enum Occurrences {
    /// The suffix array itself (results of a single binary search)
    Array,
    /// A materialized buffer (unions of several searches, or position-sorted)
    Owned(Arc<Vec<IndexPoint>>),
}

impl Occurrences {
    pub fn is_owned(&self) -> bool {
        matches!(self, Occurrences::Owned(_))
    }

    #[inline]
    pub fn get(&self, array: &SuffixArray, i: usize) -> IndexPoint {
        match self {
            Occurrences::Array => array.get(i),
            Occurrences::Owned(points) => points[i],
        }
    }

    /// Copy of the points in `range`
    pub fn collect(&self, array: &SuffixArray, range: OccurrenceRange) -> Vec<IndexPoint> {
        match self {
            Occurrences::Array => array.copy_range(range.first, range.last),
            Occurrences::Owned(points) => points[range.first..=range.last].to_vec(),
        }
    }
}

/// Byte range `[head, tail)` of the text around one or more occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub head: usize,
    pub tail: usize,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.head..self.tail
    }
}

/// Counters describing the work a searcher has done
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Binary searches run over the suffix array
    pub binary_searches: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrence_range() {
        let range = OccurrenceRange::new(3, 5);
        assert_eq!(range.len(), 3);
        assert!(range.contains(3) && range.contains(5));
        assert!(!range.contains(6));
        assert_eq!(OccurrenceRange::new(4, 4).len(), 1);
    }

    #[test]
    fn test_occurrences_lookup() {
        let array = SuffixArray::from_points(vec![6, 5, 3, 1, 0, 4, 2]);
        let owned = Occurrences::Owned(Arc::new(vec![1, 3]));

        assert_eq!(Occurrences::Array.get(&array, 2), 3);
        assert_eq!(owned.get(&array, 1), 3);
        assert_eq!(
            Occurrences::Array.collect(&array, OccurrenceRange::new(2, 3)),
            vec![3, 1]
        );
        assert!(owned.is_owned());
    }

    #[test]
    fn test_region() {
        let region = Region { head: 4, tail: 10 };
        assert_eq!(region.len(), 6);
        assert_eq!(region.range(), 4..10);
        assert!(Region { head: 2, tail: 2 }.is_empty());
    }
}
