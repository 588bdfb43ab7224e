//! Index point tokenizers
//!
//! A tokenizer decides where suffixes start. Each call to
//! [`Tokenizer::next_point`] returns the offset under the cursor and advances
//! the cursor past one indexable unit (a byte, a character in some encoding,
//! a line or a word). Points come out in strictly increasing order.
//!
//! Invalid multibyte sequences are not fatal: the offending byte is treated as
//! a unit of length 1 and a warning is logged.

use crate::index::types::IndexPoint;
use crate::text::TextCursor;
use crate::utils::scan;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Strategy for choosing index points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tokenizer {
    /// Every byte
    #[default]
    ByteStream,
    Ascii,
    Iso8859,
    EucJp,
    ShiftJis,
    Utf8,
    /// Beginning of every line
    Line,
    /// Beginning of every whitespace-delimited word
    Word,
}

/// Codeset names accepted on the command line (matched case-insensitively)
const CODESETS: &[(&str, Tokenizer)] = &[
    ("bytestream", Tokenizer::ByteStream),
    ("ascii", Tokenizer::Ascii),
    ("iso8859", Tokenizer::Iso8859),
    ("iso-8859", Tokenizer::Iso8859),
    ("EUC-JP", Tokenizer::EucJp),
    ("eucJP", Tokenizer::EucJp),
    ("Shift_JIS", Tokenizer::ShiftJis),
    ("SJIS", Tokenizer::ShiftJis),
    ("UTF-8", Tokenizer::Utf8),
];

impl Tokenizer {
    /// Look up the tokenizer for an encoding name
    pub fn from_codeset(name: &str) -> Option<Self> {
        CODESETS
            .iter()
            .find(|(codeset, _)| codeset.eq_ignore_ascii_case(name))
            .map(|&(_, tokenizer)| tokenizer)
    }

    /// Emit the index point under the cursor and advance past it
    ///
    /// Returns `None` once the cursor reaches the end of the text.
    pub fn next_point(&self, cursor: &mut TextCursor<'_>) -> Option<IndexPoint> {
        match self {
            Tokenizer::ByteStream | Tokenizer::Ascii | Tokenizer::Iso8859 => {
                next_fixed(cursor, 1)
            }
            Tokenizer::EucJp => next_char(cursor, eucjp_char_len),
            Tokenizer::ShiftJis => next_char(cursor, sjis_char_len),
            Tokenizer::Utf8 => next_char(cursor, utf8_char_len),
            Tokenizer::Line => next_line(cursor),
            Tokenizer::Word => next_word(cursor),
        }
    }

    /// Iterate over every index point of `text`
    pub fn points<'a>(&self, text: &'a [u8]) -> Points<'a> {
        Points {
            tokenizer: *self,
            cursor: TextCursor::new(text),
        }
    }
}

/// Iterator adapter over [`Tokenizer::next_point`]
pub struct Points<'a> {
    tokenizer: Tokenizer,
    cursor: TextCursor<'a>,
}

impl Iterator for Points<'_> {
    type Item = IndexPoint;

    fn next(&mut self) -> Option<IndexPoint> {
        self.tokenizer.next_point(&mut self.cursor)
    }
}

fn next_fixed(cursor: &mut TextCursor<'_>, len: usize) -> Option<IndexPoint> {
    if cursor.is_eof() {
        return None;
    }
    let point = cursor.position() as IndexPoint;
    cursor.forward(len);
    Some(point)
}

fn next_char(cursor: &mut TextCursor<'_>, char_len: fn(&[u8]) -> Option<usize>) -> Option<IndexPoint> {
    if cursor.is_eof() {
        return None;
    }
    let point = cursor.position();
    let len = char_len(cursor.remaining()).unwrap_or_else(|| {
        warn!(offset = point, "invalid character");
        1
    });
    cursor.forward(len);
    Some(point as IndexPoint)
}

fn next_line(cursor: &mut TextCursor<'_>) -> Option<IndexPoint> {
    if cursor.is_eof() {
        return None;
    }
    let point = cursor.position();
    cursor.goto_next_line();
    Some(point as IndexPoint)
}

fn next_word(cursor: &mut TextCursor<'_>) -> Option<IndexPoint> {
    if cursor.position() == 0 {
        let start = scan::skip_forward(cursor.text(), 0, scan::WHITESPACE);
        cursor.set_position(start);
    }
    if cursor.is_eof() {
        return None;
    }
    let point = cursor.position();
    cursor.goto_next_word();
    Some(point as IndexPoint)
}

fn in_range(byte: u8, lo: u8, hi: u8) -> bool {
    (lo..=hi).contains(&byte)
}

/// Length of the UTF-8 sequence introduced by `s[0]`, judged by the lead
/// byte alone (legacy 5 and 6 byte forms included)
fn utf8_char_len(s: &[u8]) -> Option<usize> {
    let lead = s[0];
    let len = match lead {
        b if b < 0x80 => 1,
        b if b & 0xe0 == 0xc0 => 2,
        b if b & 0xf0 == 0xe0 => 3,
        b if b & 0xf8 == 0xf0 => 4,
        b if b & 0xfc == 0xf8 => 5,
        b if b & 0xfe == 0xfc => 6,
        _ => return None,
    };
    (len <= s.len()).then_some(len)
}

fn eucjp_char_len(s: &[u8]) -> Option<usize> {
    let c0 = s[0];
    if c0 < 0x7f {
        return Some(1);
    }
    match s {
        // JIS X 0208
        [a, b, ..] if in_range(*a, 0xa1, 0xfe) && in_range(*b, 0xa1, 0xfe) => Some(2),
        // JIS X 0201 kana
        [0x8e, b, ..] if in_range(*b, 0xa1, 0xdf) => Some(2),
        // JIS X 0212
        [0x8f, b, c, ..] if in_range(*b, 0xa1, 0xfe) && in_range(*c, 0xa1, 0xfe) => Some(3),
        _ => None,
    }
}

fn sjis_char_len(s: &[u8]) -> Option<usize> {
    let c0 = s[0];
    // JIS X 0201 including half-width kana
    if c0 < 0x7f || in_range(c0, 0xa1, 0xdf) {
        return Some(1);
    }
    match s {
        [a, b, ..]
            if (in_range(*a, 0x81, 0x9f) || in_range(*a, 0xe0, 0xef))
                && (in_range(*b, 0x40, 0x7e) || in_range(*b, 0x80, 0xfc)) =>
        {
            Some(2)
        }
        _ => None,
    }
}
