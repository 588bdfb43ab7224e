//! Turning occurrences into text regions
//!
//! A [`Seeker`] widens an occurrence backward and forward into a region. When
//! the occurrences are visited in text order, regions that overlap are joined
//! so the same bytes are never produced twice.

use super::types::Region;
use crate::utils::scan;

/// How far a region extends around an occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeker<'a> {
    /// Whole lines, plus `backward` lines before and `forward` lines after
    Lines { backward: usize, forward: usize },
    /// From the nearest `start` tag at or before the occurrence to the end of
    /// the nearest `end` tag after it
    Tagged { start: &'a [u8], end: &'a [u8] },
}

impl Seeker<'_> {
    /// The line containing the occurrence
    pub fn line() -> Self {
        Seeker::Lines {
            backward: 0,
            forward: 0,
        }
    }

    pub fn seek_backward(&self, text: &[u8], pos: usize) -> usize {
        match *self {
            Seeker::Lines { backward, .. } => scan::seek_lines_backward(text, pos, backward),
            Seeker::Tagged { start, .. } => scan::seek_pattern_backward(text, pos, start),
        }
    }

    pub fn seek_forward(&self, text: &[u8], pos: usize) -> usize {
        match *self {
            Seeker::Lines { forward, .. } => scan::seek_lines_forward(text, pos, forward),
            Seeker::Tagged { end, .. } => scan::seek_pattern_forward(text, pos, end),
        }
    }
}

/// Region around the occurrence at `*cursor`, advancing the cursor
///
/// `position_at(i)` gives the text offset of occurrence `i`; `last` is the
/// index of the final occurrence. With `coalesce`, following occurrences
/// whose region starts before the current tail are consumed and the tail is
/// extended past them.
pub fn next_region<F>(
    text: &[u8],
    seeker: &Seeker<'_>,
    cursor: &mut usize,
    last: usize,
    coalesce: bool,
    position_at: F,
) -> Option<Region>
where
    F: Fn(usize) -> usize,
{
    if *cursor > last {
        return None;
    }

    let pos = position_at(*cursor);
    let head = seeker.seek_backward(text, pos);
    let mut tail = seeker.seek_forward(text, pos);
    *cursor += 1;

    if coalesce {
        while *cursor <= last {
            let next = position_at(*cursor);
            if seeker.seek_backward(text, next) >= tail {
                break;
            }
            tail = tail.max(seeker.seek_forward(text, next));
            *cursor += 1;
        }
    }

    Some(Region { head, tail })
}
