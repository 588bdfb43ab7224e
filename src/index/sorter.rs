//! Parallel block sorting
//!
//! The unsorted array is cut into fixed-size blocks which are sorted
//! independently by a pool of workers. Workers claim blocks from a shared
//! queue; the blocks are disjoint `&mut` slices, so the only locking is around
//! claiming a block and bumping the progress counter.

use super::mkqsort::multikey_qsort;
use super::types::IndexPoint;
use crate::error::{Error, Result};
use crate::utils::progress::Progress;
use parking_lot::Mutex;
use std::ops::Range;
use tracing::{debug, trace};

/// Extents of `len` points cut into blocks of `block_points`
///
/// The last block holds the remainder.
pub fn block_ranges(len: usize, block_points: usize) -> Vec<Range<usize>> {
    if block_points == 0 {
        return Vec::new();
    }
    (0..len)
        .step_by(block_points)
        .map(|start| start..(start + block_points).min(len))
        .collect()
}

/// Sort each block of `points` in place and return the block extents
///
/// `progress` advances by a block's length once that block is sorted.
pub fn sort_blocks(
    points: &mut [IndexPoint],
    text: &[u8],
    block_points: usize,
    threads: usize,
    progress: &mut Progress<'_>,
) -> Result<Vec<Range<usize>>> {
    if block_points == 0 {
        return Err(Error::invalid("block size must be positive"));
    }
    if threads == 0 {
        return Err(Error::invalid("thread count must be positive"));
    }

    let ranges = block_ranges(points.len(), block_points);
    debug!(
        points = points.len(),
        blocks = ranges.len(),
        threads,
        "sorting blocks"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("fxsa-sort-{}", i))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let queue = Mutex::new(points.chunks_mut(block_points).enumerate());
    let progress = Mutex::new(progress);

    pool.scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|_| {
                loop {
                    // Lock only long enough to take the next block
                    let claimed = queue.lock().next();
                    let Some((id, block)) = claimed else {
                        break;
                    };
                    trace!(block = id, len = block.len(), "claimed block");

                    multikey_qsort(block, 0, text, None);

                    progress.lock().advance(block.len() as u64);
                }
            });
        }
    });

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::progress::tests::RecordingSink;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn is_sorted_block(text: &[u8], block: &[IndexPoint]) -> bool {
        block
            .windows(2)
            .all(|w| text[w[0] as usize..] <= text[w[1] as usize..])
    }

    #[test]
    fn test_block_ranges() {
        assert_eq!(block_ranges(10, 4), vec![0..4, 4..8, 8..10]);
        assert_eq!(block_ranges(8, 4), vec![0..4, 4..8]);
        assert_eq!(block_ranges(3, 10), vec![0..3]);
        assert!(block_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_blocks_sorted_independently() {
        let mut rng = StdRng::seed_from_u64(11);
        let text: Vec<u8> = (0..3000).map(|_| b"acgt"[rng.gen_range(0..4)]).collect();
        let mut points: Vec<IndexPoint> = (0..text.len() as IndexPoint).collect();
        let original = points.clone();

        let sink = RecordingSink::default();
        let mut progress = Progress::new("sort", points.len() as u64, &sink);
        let ranges = sort_blocks(&mut points, &text, 256, 4, &mut progress).unwrap();

        assert_eq!(ranges.len(), 12);
        for range in &ranges {
            assert!(is_sorted_block(&text, &points[range.clone()]));
            // Blocks never exchange points
            let mut got = points[range.clone()].to_vec();
            got.sort_unstable();
            assert_eq!(got, original[range.clone()].to_vec());
        }
        assert_eq!(progress.current(), text.len() as u64);
        sink.assert_monotone();
    }

    #[test]
    fn test_single_thread_single_block() {
        let text = b"banana\n";
        let mut points: Vec<IndexPoint> = (0..7).collect();
        let sink = RecordingSink::default();
        let mut progress = Progress::new("sort", 7, &sink);

        let ranges = sort_blocks(&mut points, text, 100, 1, &mut progress).unwrap();
        assert_eq!(ranges, vec![0..7]);
        assert_eq!(points, vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_invalid_arguments() {
        let sink = RecordingSink::default();
        let mut progress = Progress::new("sort", 0, &sink);
        let mut points: Vec<IndexPoint> = vec![0, 1];
        assert!(matches!(
            sort_blocks(&mut points, b"ab", 0, 1, &mut progress),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            sort_blocks(&mut points, b"ab", 1, 0, &mut progress),
            Err(Error::InvalidArgument(_))
        ));
    }
}
