//! Pattern search over a finished suffix array
//!
//! A [`Searcher`] holds the result of the last search as an inclusive range
//! over an occurrence buffer, plus an iteration cursor within that range.
//! Plain and incremental searches produce ranges directly over the suffix
//! array. Case-insensitive and multi-pattern searches union several ranges
//! into an owned buffer, which is not in any particular order until
//! [`Searcher::sort_occurrences`] is called.

use super::bsearch::equal_range;
use super::cache::{CacheKey, SearchCache};
use super::region::{self, Seeker};
use super::types::{OccurrenceRange, Occurrences, Region, SearchStats};
use crate::error::{Error, Result};
use crate::index::{IndexPoint, SuffixArray, default_array_path};
use crate::text::{TextCursor, TextView};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Order `pattern` against the suffix at `point`, assuming the first `skip`
/// bytes are already known to be equal
///
/// A pattern that runs past the end of the suffix orders after it.
#[inline]
pub fn compare_suffix(text: &[u8], pattern: &[u8], point: IndexPoint, skip: usize) -> Ordering {
    let start = (point as usize).saturating_add(skip).min(text.len());
    let suffix = &text[start..];
    let pattern = &pattern[skip.min(pattern.len())..];
    let n = pattern.len().min(suffix.len());

    match pattern[..n].cmp(&suffix[..n]) {
        Ordering::Equal if pattern.len() > suffix.len() => Ordering::Greater,
        ord => ord,
    }
}

/// Bounds of the suffixes in `array[offset..offset + count]` starting with
/// `pattern`
fn range_search(
    text: &[u8],
    array: &SuffixArray,
    pattern: &[u8],
    skip: usize,
    offset: usize,
    count: usize,
) -> Option<OccurrenceRange> {
    if count == 0 || array.is_empty() {
        return None;
    }
    equal_range(count, |i| {
        compare_suffix(text, pattern, array.get(offset + i), skip)
    })
    .map(|(first, last)| OccurrenceRange::new(offset + first, offset + last))
}

/// ASCII letters in upper then lower case; anything else as is
fn case_variants(c: u8) -> impl Iterator<Item = u8> {
    let upper = c.to_ascii_uppercase();
    let lower = c.to_ascii_lowercase();
    std::iter::once(upper).chain((upper != lower).then_some(lower))
}

/// Searches one text through its suffix array
pub struct Searcher {
    text: Arc<TextView>,
    array: Arc<SuffixArray>,
    source: Occurrences,
    range: Option<OccurrenceRange>,
    cursor: usize,
    sorted: bool,
    /// Pattern bytes already verified by the current incremental session
    skip: usize,
    cache: Option<SearchCache>,
    stats: SearchStats,
}

impl Searcher {
    /// Open a text and its array at `<text>.ary`
    pub fn open(text_path: &Path) -> Result<Self> {
        Self::open_with_array(text_path, &default_array_path(text_path))
    }

    pub fn open_with_array(text_path: &Path, array_path: &Path) -> Result<Self> {
        let text = TextView::open(text_path)?;
        let array = SuffixArray::open(array_path)?;
        debug!(
            text = %text_path.display(),
            array = %array_path.display(),
            points = array.len(),
            "opened searcher"
        );
        Ok(Self::new(Arc::new(text), Arc::new(array)))
    }

    /// Searcher over a shared text and array
    pub fn new(text: Arc<TextView>, array: Arc<SuffixArray>) -> Self {
        Self {
            text,
            array,
            source: Occurrences::Array,
            range: None,
            cursor: 0,
            sorted: false,
            skip: 0,
            cache: None,
            stats: SearchStats::default(),
        }
    }

    pub fn text(&self) -> &Arc<TextView> {
        &self.text
    }

    pub fn array(&self) -> &Arc<SuffixArray> {
        &self.array
    }

    /// Remember results so repeated searches skip the binary search
    pub fn enable_cache(&mut self) {
        if self.cache.is_none() {
            self.cache = Some(SearchCache::new());
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Whether the current result is in text order
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Bounds of the current result within its buffer
    pub fn range(&self) -> Option<OccurrenceRange> {
        self.range
    }

    fn clear_result(&mut self) {
        self.source = Occurrences::Array;
        self.range = None;
        self.cursor = 0;
        self.sorted = false;
        self.skip = 0;
    }

    fn assign(&mut self, source: Occurrences, range: Option<OccurrenceRange>) {
        self.source = source;
        self.range = range;
        self.cursor = range.map_or(0, |r| r.first);
    }

    /// Binary search for an exact pattern, through the cache when enabled
    ///
    /// `window` restricts the search to a previous result; `None` searches
    /// the whole array.
    fn lookup(
        &mut self,
        pattern: &[u8],
        skip: usize,
        window: Option<OccurrenceRange>,
    ) -> Option<OccurrenceRange> {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get_exact(pattern)) {
            self.stats.cache_hits += 1;
            trace!(len = pattern.len(), "cache hit");
            return Some(hit.range);
        }

        let (offset, count) = window.map_or((0, self.array.len()), |w| (w.first, w.len()));
        self.stats.binary_searches += 1;
        let found = range_search(self.text.as_bytes(), &self.array, pattern, skip, offset, count);

        if let Some(cache) = self.cache.as_mut() {
            self.stats.cache_misses += 1;
            if let Some(range) = found {
                cache.insert(CacheKey::Exact(pattern.to_vec()), Occurrences::Array, range);
            }
        }
        found
    }

    /// Result remembered under a composite key
    fn cached(&mut self, key: &CacheKey) -> bool {
        let Some(hit) = self.cache.as_ref().and_then(|c| c.get(key)).cloned() else {
            return false;
        };
        self.stats.cache_hits += 1;
        self.assign(hit.source, Some(hit.range));
        true
    }

    /// Make `points` the current (unsorted) result
    fn assign_owned(&mut self, points: Vec<IndexPoint>, key: CacheKey) -> bool {
        if points.is_empty() {
            self.assign(Occurrences::Array, None);
            return false;
        }

        let range = OccurrenceRange::new(0, points.len() - 1);
        let source = Occurrences::Owned(Arc::new(points));
        if let Some(cache) = self.cache.as_mut() {
            self.stats.cache_misses += 1;
            cache.insert(key, source.clone(), range);
        }
        self.assign(source, Some(range));
        true
    }

    /// Find every suffix starting with `pattern`
    ///
    /// The empty pattern matches every suffix.
    pub fn search(&mut self, pattern: &[u8]) -> bool {
        self.clear_result();
        let range = self.lookup(pattern, 0, None);
        self.assign(Occurrences::Array, range);
        range.is_some()
    }

    /// Extend the previous incremental search to a longer `pattern`
    ///
    /// The first call of a session (or the first after
    /// [`Searcher::reset_incremental`]) searches the whole array. Later calls
    /// only search within the previous result and skip the bytes it already
    /// verified, so every call must extend the previous pattern.
    pub fn incremental_search(&mut self, pattern: &[u8]) -> Result<bool> {
        let len = pattern.len();
        if self.skip > len {
            return Err(Error::invalid(format!(
                "incremental pattern of {} bytes is shorter than the {} bytes already matched",
                len, self.skip
            )));
        }

        let skip = self.skip;
        let window = if skip == 0 {
            self.clear_result();
            None
        } else {
            if self.sorted || self.source.is_owned() {
                return Err(Error::invalid(
                    "incremental search cannot continue from a materialized result",
                ));
            }
            match self.range {
                Some(range) => Some(range),
                None => {
                    // An earlier step already failed
                    self.skip = len;
                    return Ok(false);
                }
            }
        };

        let range = self.lookup(pattern, skip, window);
        self.assign(Occurrences::Array, range);
        self.skip = len;
        Ok(range.is_some())
    }

    /// Start a new incremental search session
    pub fn reset_incremental(&mut self) {
        self.skip = 0;
    }

    /// Find `pattern` with ASCII letters matching either case
    ///
    /// The result is the union of every case variant and is not sorted.
    pub fn case_insensitive_search(&mut self, pattern: &[u8]) -> bool {
        self.clear_result();
        if pattern.is_empty() {
            return self.search(pattern);
        }

        let key = CacheKey::IgnoreCase(pattern.to_vec());
        if self.cached(&key) {
            return true;
        }

        let mut variant = pattern.to_vec();
        let mut found = Vec::new();
        self.expand_case(&mut variant, 0, None, &mut found);
        debug!(len = pattern.len(), matches = found.len(), "case-insensitive search");
        self.assign_owned(found, key)
    }

    /// Try each case of `variant[step]` within `window`, descending only into
    /// variants that still match
    fn expand_case(
        &mut self,
        variant: &mut [u8],
        step: usize,
        window: Option<OccurrenceRange>,
        found: &mut Vec<IndexPoint>,
    ) {
        for candidate in case_variants(variant[step]) {
            variant[step] = candidate;
            let Some(range) = self.lookup(&variant[..=step], step, window) else {
                continue;
            };
            if step + 1 < variant.len() {
                self.expand_case(variant, step + 1, Some(range), found);
            } else {
                found.extend(self.array.copy_range(range.first, range.last));
            }
        }
    }

    /// Find every suffix starting with any of `patterns`
    ///
    /// A pattern that extends the one just before it in sorted order is
    /// already covered by that pattern's result and is not searched.
    pub fn multi_search<P: AsRef<[u8]>>(&mut self, patterns: &[P]) -> bool {
        self.clear_result();

        let mut sorted: Vec<&[u8]> = patterns.iter().map(|p| p.as_ref()).collect();
        sorted.sort_unstable();

        let key = CacheKey::Any(sorted.iter().map(|p| p.to_vec()).collect());
        if self.cached(&key) {
            return true;
        }

        let mut found = Vec::new();
        for (i, pattern) in sorted.iter().enumerate() {
            if i > 0 && pattern.starts_with(sorted[i - 1]) {
                continue;
            }
            if let Some(range) = self.lookup(pattern, 0, None) {
                found.extend(self.array.copy_range(range.first, range.last));
            }
        }
        debug!(patterns = sorted.len(), matches = found.len(), "multi-pattern search");
        self.assign_owned(found, key)
    }

    /// Put the current result in text order
    ///
    /// Required before regions can be coalesced.
    pub fn sort_occurrences(&mut self) {
        let Some(range) = self.range else {
            return;
        };
        let mut points = self.source.collect(&self.array, range);
        points.sort_unstable();

        let range = OccurrenceRange::new(0, points.len() - 1);
        self.assign(Occurrences::Owned(Arc::new(points)), Some(range));
        self.sorted = true;
    }

    /// Number of occurrences in the current result
    pub fn count_occurrences(&self) -> usize {
        self.range.map_or(0, |r| r.len())
    }

    /// Text offset of the occurrence under the cursor, without advancing
    pub fn peek_position(&self) -> Option<IndexPoint> {
        let range = self.range?;
        if self.cursor > range.last {
            return None;
        }
        Some(self.source.get(&self.array, self.cursor))
    }

    /// Text offset of the next occurrence
    pub fn next_position(&mut self) -> Option<IndexPoint> {
        let position = self.peek_position()?;
        self.cursor += 1;
        Some(position)
    }

    /// Text cursor placed at the next occurrence
    pub fn next_occurrence(&mut self) -> Option<TextCursor<'_>> {
        let position = self.next_position()?;
        Some(TextCursor::at(self.text.as_bytes(), position as usize))
    }

    /// Every occurrence of the current result, independent of the cursor
    pub fn occurrences(&self) -> impl Iterator<Item = IndexPoint> + '_ {
        let indices = match self.range {
            Some(range) => range.first..range.last + 1,
            None => 0..0,
        };
        indices.map(move |i| self.source.get(&self.array, i))
    }

    /// Region around the next occurrence
    ///
    /// Overlapping regions are joined when the result is sorted.
    pub fn next_region(&mut self, seeker: &Seeker<'_>) -> Option<Region> {
        let range = self.range?;
        let text = self.text.as_bytes();
        let source = &self.source;
        let array = &self.array;
        region::next_region(
            text,
            seeker,
            &mut self.cursor,
            range.last,
            self.sorted,
            |i| source.get(array, i) as usize,
        )
    }

    pub fn region_text(&self, region: Region) -> &[u8] {
        &self.text.as_bytes()[region.range()]
    }

    /// The line containing the next occurrence
    pub fn next_line(&mut self) -> Option<&[u8]> {
        self.next_context_lines(0, 0)
    }

    /// The next occurrence's line with `backward` lines before it and
    /// `forward` lines after it
    pub fn next_context_lines(&mut self, backward: usize, forward: usize) -> Option<&[u8]> {
        let region = self.next_region(&Seeker::Lines { backward, forward })?;
        Some(self.region_text(region))
    }

    /// From the closest `start` tag before the next occurrence to the end of
    /// the closest `end` tag after it
    pub fn next_tagged_region(&mut self, start: &[u8], end: &[u8]) -> Option<&[u8]> {
        let region = self.next_region(&Seeker::Tagged { start, end })?;
        Some(self.region_text(region))
    }
}
