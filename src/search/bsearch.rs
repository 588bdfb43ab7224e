//! Dual binary search for the first and last match
//!
//! After Bentley, Programming Pearls 2nd ed. p.93. `compare(i)` orders the key
//! against element `i` of a sorted sequence. The first-match pass records the
//! bracket it held when it first saw an equal element; every match lies
//! strictly inside that bracket, so the last-match pass starts from it instead
//! of the whole range.

use std::cmp::Ordering;

/// Open interval `(low, high)` known to contain every match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub low: isize,
    pub high: isize,
}

/// Index of the first element equal to the key
///
/// Also returns the bracket to hand to [`bsearch_last`]; it is `None` exactly
/// when there is no match.
pub fn bsearch_first<F>(len: usize, mut compare: F) -> (Option<usize>, Option<Boundary>)
where
    F: FnMut(usize) -> Ordering,
{
    let mut low: isize = -1;
    let mut high: isize = len as isize;
    let mut boundary = None;

    while low + 1 != high {
        let mid = (low + high) / 2;
        match compare(mid as usize) {
            Ordering::Greater => low = mid,
            cmp => {
                if cmp == Ordering::Equal && boundary.is_none() {
                    boundary = Some(Boundary { low, high });
                }
                high = mid;
            }
        }
    }

    match boundary {
        Some(_) if (high as usize) < len && compare(high as usize) == Ordering::Equal => {
            (Some(high as usize), boundary)
        }
        _ => (None, None),
    }
}

/// Index of the last element equal to the key within `boundary`
pub fn bsearch_last<F>(boundary: Boundary, mut compare: F) -> Option<usize>
where
    F: FnMut(usize) -> Ordering,
{
    let Boundary { mut low, mut high } = boundary;

    while low + 1 != high {
        let mid = (low + high) / 2;
        if compare(mid as usize) != Ordering::Less {
            low = mid;
        } else {
            high = mid;
        }
    }

    if low < 0 || compare(low as usize) != Ordering::Equal {
        return None;
    }
    Some(low as usize)
}

/// Inclusive bounds `(first, last)` of the elements equal to the key
pub fn equal_range<F>(len: usize, mut compare: F) -> Option<(usize, usize)>
where
    F: FnMut(usize) -> Ordering,
{
    let (first, boundary) = bsearch_first(len, &mut compare);
    let first = first?;
    let last = bsearch_last(boundary?, &mut compare)?;
    Some((first, last))
}
