//! K-way merge of sorted blocks
//!
//! Blocks produced by the block sorter are merged through a binary min-heap.
//! Each heap entry keeps a copy of the first bytes of its current suffix, so
//! most comparisons never touch the (possibly cold) text pages.

use super::types::IndexPoint;
use super::writer::ArrayWriter;
use crate::error::Result;
use crate::utils::progress::Progress;
use std::cmp::Ordering;
use std::ops::Range;
use tracing::debug;

/// Bytes of each block head cached in the heap
pub const HEAD_CACHE_SIZE: usize = 16;

/// Cursor into one sorted block, with the head of its current suffix
#[derive(Debug, Clone)]
struct BlockHead {
    cursor: usize,
    end: usize,
    cache: [u8; HEAD_CACHE_SIZE],
    cache_len: usize,
}

impl BlockHead {
    fn new(range: Range<usize>) -> Self {
        Self {
            cursor: range.start,
            end: range.end,
            cache: [0; HEAD_CACHE_SIZE],
            cache_len: 0,
        }
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        self.cursor >= self.end
    }

    fn refresh(&mut self, text: &[u8], points: &[IndexPoint]) {
        let start = (points[self.cursor] as usize).min(text.len());
        let suffix = &text[start..];
        self.cache_len = suffix.len().min(HEAD_CACHE_SIZE);
        self.cache[..self.cache_len].copy_from_slice(&suffix[..self.cache_len]);
    }
}

/// Min-heap of block heads ordered by their current suffix
pub struct BlockQueue<'a> {
    text: &'a [u8],
    points: &'a [IndexPoint],
    heap: Vec<BlockHead>,
}

impl<'a> BlockQueue<'a> {
    /// Queue over the non-empty blocks of `points`
    pub fn new(text: &'a [u8], points: &'a [IndexPoint], blocks: &[Range<usize>]) -> Self {
        let mut queue = Self {
            text,
            points,
            heap: Vec::with_capacity(blocks.len()),
        };
        for range in blocks.iter().filter(|r| !r.is_empty()) {
            queue.push(BlockHead::new(range.clone()));
        }
        queue
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn compare(&self, a: &BlockHead, b: &BlockHead) -> Ordering {
        let len = a.cache_len.min(b.cache_len);
        match a.cache[..len].cmp(&b.cache[..len]) {
            Ordering::Equal => {
                let sa = (self.points[a.cursor] as usize + len).min(self.text.len());
                let sb = (self.points[b.cursor] as usize + len).min(self.text.len());
                self.text[sa..].cmp(&self.text[sb..])
            }
            other => other,
        }
    }

    fn push(&mut self, mut head: BlockHead) {
        head.refresh(self.text, self.points);
        self.heap.push(head);

        let mut i = self.heap.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.compare(&self.heap[parent], &self.heap[i]) != Ordering::Greater {
                break;
            }
            self.heap.swap(parent, i);
            i = parent;
        }
    }

    /// Take the smallest point and advance its block
    pub fn pop(&mut self) -> Option<IndexPoint> {
        let top = self.heap.first_mut()?;
        let point = self.points[top.cursor];

        top.cursor += 1;
        if top.is_exhausted() {
            self.heap.swap_remove(0);
        } else {
            let (text, points) = (self.text, self.points);
            self.heap[0].refresh(text, points);
        }
        self.sift_down();

        Some(point)
    }

    fn sift_down(&mut self) {
        let len = self.heap.len();
        let mut i = 0;
        loop {
            let mut child = 2 * i + 1;
            if child >= len {
                break;
            }
            if child + 1 < len
                && self.compare(&self.heap[child + 1], &self.heap[child]) == Ordering::Less
            {
                child += 1;
            }
            if self.compare(&self.heap[i], &self.heap[child]) != Ordering::Greater {
                break;
            }
            self.heap.swap(i, child);
            i = child;
        }
    }

    /// Every parent orders at or before both of its children
    pub fn is_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| {
            self.compare(&self.heap[(i - 1) / 2], &self.heap[i]) != Ordering::Greater
        })
    }
}

/// Merge sorted `blocks` of `points` into `writer`
///
/// Returns the number of points written.
pub fn merge_blocks(
    text: &[u8],
    points: &[IndexPoint],
    blocks: &[Range<usize>],
    writer: &mut ArrayWriter,
    progress: &mut Progress<'_>,
) -> Result<u64> {
    let mut queue = BlockQueue::new(text, points, blocks);
    debug!(blocks = queue.len(), "merging blocks");

    let mut written = 0u64;
    while let Some(point) = queue.pop() {
        writer.write(point)?;
        written += 1;
        progress.set(written);
    }
    Ok(written)
}
