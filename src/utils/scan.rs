//! Byte scanning helpers used by tokenizers and region extraction
//!
//! All functions take a position in `0..=text.len()` and return another
//! position in the same range. Nothing here reads past the end of `text`.

use memchr::{memchr, memmem, memrchr};

/// Characters treated as whitespace by the word tokenizer
pub const WHITESPACE: &[u8] = b" \x0c\n\r\t\x0b";

/// Position just after the next newline at or after `pos`, or the end of text
#[inline]
pub fn seek_eol(text: &[u8], pos: usize) -> usize {
    let pos = pos.min(text.len());
    match memchr(b'\n', &text[pos..]) {
        Some(i) => pos + i + 1,
        None => text.len(),
    }
}

/// Start of the line containing `pos`
#[inline]
pub fn seek_bol(text: &[u8], pos: usize) -> usize {
    let pos = pos.min(text.len());
    match memrchr(b'\n', &text[..pos]) {
        Some(i) => i + 1,
        None => 0,
    }
}

/// Start of the line `n` lines before the one containing `pos`
pub fn seek_lines_backward(text: &[u8], pos: usize, n: usize) -> usize {
    let mut cursor = seek_bol(text, pos);
    let mut n = n;
    while cursor > 0 && n > 0 {
        cursor = seek_bol(text, cursor - 1);
        n -= 1;
    }
    cursor
}

/// End of the line `n` lines after the one containing `pos`
pub fn seek_lines_forward(text: &[u8], pos: usize, n: usize) -> usize {
    let mut cursor = seek_eol(text, pos);
    let mut n = n;
    while cursor < text.len() && n > 0 {
        cursor = seek_eol(text, cursor);
        n -= 1;
    }
    cursor
}

/// Start of the last occurrence of `pattern` beginning at or before `pos`,
/// or the beginning of the text when there is none
pub fn seek_pattern_backward(text: &[u8], pos: usize, pattern: &[u8]) -> usize {
    let end = pos.saturating_add(pattern.len()).min(text.len());
    memmem::rfind(&text[..end], pattern).unwrap_or(0)
}

/// End of the first occurrence of `pattern` beginning at or after `pos`,
/// or the end of the text when there is none
pub fn seek_pattern_forward(text: &[u8], pos: usize, pattern: &[u8]) -> usize {
    let pos = pos.min(text.len());
    match memmem::find(&text[pos..], pattern) {
        Some(i) => pos + i + pattern.len(),
        None => text.len(),
    }
}

/// Position just after the first byte in `class` at or after `pos`
pub fn seek_forward(text: &[u8], pos: usize, class: &[u8]) -> usize {
    let pos = pos.min(text.len());
    match text[pos..].iter().position(|b| class.contains(b)) {
        Some(i) => pos + i + 1,
        None => text.len(),
    }
}

/// First position at or after `pos` whose byte is not in `class`
pub fn skip_forward(text: &[u8], pos: usize, class: &[u8]) -> usize {
    let pos = pos.min(text.len());
    match text[pos..].iter().position(|b| !class.contains(b)) {
        Some(i) => pos + i,
        None => text.len(),
    }
}
