//! Multikey quicksort over suffixes
//!
//! Ternary-partition string quicksort (Bentley & Sedgewick, "Fast Algorithms
//! for Sorting and Searching Strings", 1997) specialised for suffixes of one
//! text. Partitioning looks at a single byte per suffix at the current depth,
//! so the work is proportional to the distinguishing prefix lengths instead of
//! whole-suffix comparisons.
//!
//! Running off the end of the text yields a sentinel smaller than every byte,
//! which makes a suffix that is a prefix of another sort first.

use super::types::IndexPoint;
use crate::utils::progress::Progress;
use rand::Rng;

/// Slices this short are finished with insertion sort
const INSERTION_SORT_THRESHOLD: usize = 10;

/// Sentinel for "past the end of the text"
const EOF: i32 = -1;

/// Sort `points` by the suffixes they denote, comparing from byte `depth`
///
/// Every point in `points` must be at most `text.len()`. When `progress` is
/// given it is advanced as elements reach their final position.
pub fn multikey_qsort(
    points: &mut [IndexPoint],
    depth: usize,
    text: &[u8],
    mut progress: Option<&mut Progress<'_>>,
) {
    let mut rng = rand::thread_rng();
    sort(points, depth, text, &mut rng, &mut progress);
}

/// Byte at `depth` into the suffix starting at `point`, or [`EOF`]
#[inline]
fn byte_at(text: &[u8], point: IndexPoint, depth: usize) -> i32 {
    match text.get(point as usize + depth) {
        Some(&b) => b as i32,
        None => EOF,
    }
}

/// Suffix starting at `point`, skipping the first `depth` bytes
#[inline]
pub(crate) fn suffix_from(text: &[u8], point: IndexPoint, depth: usize) -> &[u8] {
    let start = (point as usize).saturating_add(depth).min(text.len());
    &text[start..]
}

fn sort<R: Rng>(
    points: &mut [IndexPoint],
    depth: usize,
    text: &[u8],
    rng: &mut R,
    progress: &mut Option<&mut Progress<'_>>,
) {
    let mut points = points;
    let mut depth = depth;

    // The equal partition is handled by looping at depth + 1 so that long
    // shared prefixes do not grow the call stack.
    loop {
        let len = points.len();
        if len <= INSERTION_SORT_THRESHOLD {
            insertion_sort(points, depth, text);
            if let Some(p) = progress.as_deref_mut() {
                p.advance(len as u64);
            }
            return;
        }

        points.swap(0, rng.gen_range(0..len));
        let pivot = byte_at(text, points[0], depth);

        // Layout during partitioning:
        //   [0, a) equal | [a, b) less | [b, c] unknown | (c, d] greater | (d, len) equal
        let (mut a, mut b) = (1usize, 1usize);
        let (mut c, mut d) = (len as isize - 1, len as isize - 1);

        loop {
            while b as isize <= c {
                let r = byte_at(text, points[b], depth) - pivot;
                if r > 0 {
                    break;
                }
                if r == 0 {
                    points.swap(a, b);
                    a += 1;
                }
                b += 1;
            }
            while b as isize <= c {
                let r = byte_at(text, points[c as usize], depth) - pivot;
                if r < 0 {
                    break;
                }
                if r == 0 {
                    points.swap(c as usize, d as usize);
                    d -= 1;
                }
                c -= 1;
            }
            if b as isize > c {
                break;
            }
            points.swap(b, c as usize);
            b += 1;
            c -= 1;
        }

        // Move the equal runs from both ends into the middle
        let r = a.min(b - a);
        swap_ranges(points, 0, b - r, r);
        let d = d as usize;
        let c = (c + 1) as usize; // first index of the greater-or-equal tail
        let r = (d + 1 - c).min(len - d - 1);
        swap_ranges(points, b, len - r, r);

        let less = b - a;
        let greater = d + 1 - c;
        let equal = len - less - greater;

        let (lt, rest) = points.split_at_mut(less);
        let (eq, gt) = rest.split_at_mut(equal);

        sort(lt, depth, text, rng, progress);
        sort(gt, depth, text, rng, progress);

        if pivot == EOF {
            // Every suffix here already ended; nothing left to compare
            if let Some(p) = progress.as_deref_mut() {
                p.advance(eq.len() as u64);
            }
            return;
        }
        points = eq;
        depth += 1;
    }
}

/// Swap `n` elements starting at `i` with `n` elements starting at `j`
#[inline]
fn swap_ranges(points: &mut [IndexPoint], i: usize, j: usize, n: usize) {
    for k in 0..n {
        points.swap(i + k, j + k);
    }
}

fn insertion_sort(points: &mut [IndexPoint], depth: usize, text: &[u8]) {
    for i in 1..points.len() {
        let mut j = i;
        while j > 0 && suffix_from(text, points[j - 1], depth) > suffix_from(text, points[j], depth) {
            points.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::progress::tests::RecordingSink;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn naive_sort(text: &[u8], points: &[IndexPoint]) -> Vec<IndexPoint> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        sorted
    }

    fn sorted_all(text: &[u8]) -> Vec<IndexPoint> {
        let mut points: Vec<IndexPoint> = (0..text.len() as IndexPoint).collect();
        multikey_qsort(&mut points, 0, text, None);
        points
    }

    #[test]
    fn test_banana() {
        // 6: "\n", 5: "a\n", 3: "ana\n", 1: "anana\n", 0: "banana\n", 4: "na\n", 2: "nana\n"
        assert_eq!(sorted_all(b"banana\n"), vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_prefix_suffix_sorts_first() {
        // "a" < "aa" < "aaa" < ...
        let text = vec![b'a'; 50];
        let expected: Vec<IndexPoint> = (0..50).rev().collect();
        assert_eq!(sorted_all(&text), expected);
    }

    #[test]
    fn test_matches_naive_sort_on_random_text() {
        let mut rng = StdRng::seed_from_u64(7);
        for &(len, alphabet) in &[(0usize, 2u8), (1, 2), (11, 2), (200, 2), (500, 4), (2000, 26)] {
            let text: Vec<u8> = (0..len).map(|_| b'a' + rng.gen_range(0..alphabet)).collect();
            let points: Vec<IndexPoint> = (0..len as IndexPoint).collect();
            assert_eq!(sorted_all(&text), naive_sort(&text, &points), "len {}", len);
        }
    }

    #[test]
    fn test_sparse_points() {
        let text = b"the cat sat on the mat\nthe end\n";
        let points: Vec<IndexPoint> = vec![0, 4, 8, 12, 15, 19, 23, 27];
        let mut sorted = points.clone();
        multikey_qsort(&mut sorted, 0, text, None);
        assert_eq!(sorted, naive_sort(text, &points));
    }

    #[test]
    fn test_point_at_end_of_text() {
        let text = b"abab";
        let mut points = vec![4, 2, 0, 3, 1];
        multikey_qsort(&mut points, 0, text, None);
        assert_eq!(points, vec![4, 2, 0, 3, 1]);
    }

    #[test]
    fn test_progress_reaches_total() {
        let text = b"mississippi river banks, mississippi delta\n".repeat(4);
        let sink = RecordingSink::default();
        let mut progress = Progress::new("sort", text.len() as u64, &sink);
        let mut points: Vec<IndexPoint> = (0..text.len() as IndexPoint).collect();

        multikey_qsort(&mut points, 0, &text, Some(&mut progress));

        assert_eq!(progress.current(), text.len() as u64);
        sink.assert_monotone();
    }
}
