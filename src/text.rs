//! Read-only access to the indexed text
//!
//! The text is memory-mapped once and never mutated. Every index point is a
//! plain offset into [`TextView::as_bytes`], so suffix references are always
//! bounds-checked slices rather than raw pointers.

use crate::error::{Error, IoResultExt, Result};
use crate::utils::scan;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Largest text addressable by 32-bit signed index points
pub const MAX_TEXT_SIZE: u64 = i32::MAX as u64;

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
    /// Zero-length files cannot be mapped portably
    Empty,
}

/// Fail with [`Error::TextTooLarge`] when `size` bytes cannot be addressed
/// by index points
pub fn check_size(path: &Path, size: u64) -> Result<()> {
    if size > MAX_TEXT_SIZE {
        return Err(Error::TextTooLarge {
            path: path.to_path_buf(),
            size,
        });
    }
    Ok(())
}

/// Immutable byte view over a text file
pub struct TextView {
    backing: Backing,
    path: PathBuf,
}

impl TextView {
    /// Memory-map a text file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_path(path)?;
        let size = file.metadata().with_path(path)?.len();
        check_size(path, size)?;

        let backing = if size == 0 {
            Backing::Empty
        } else {
            // SAFETY: the text is treated as immutable for the lifetime of the map
            Backing::Mapped(unsafe { Mmap::map(&file) }.with_path(path)?)
        };

        Ok(Self {
            backing,
            path: path.to_path_buf(),
        })
    }

    /// Wrap bytes that are already in memory
    ///
    /// The length is not checked; texts above [`MAX_TEXT_SIZE`] yield
    /// truncated index points. Use [`TextView::try_from_bytes`] for input of
    /// unknown size.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            backing: Backing::Owned(bytes.into()),
            path: PathBuf::new(),
        }
    }

    /// Wrap bytes that are already in memory, refusing oversized text
    pub fn try_from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        check_size(Path::new(""), bytes.len() as u64)?;
        Ok(Self::from_bytes(bytes))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(map) => map,
            Backing::Owned(bytes) => bytes,
            Backing::Empty => &[],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path the text was opened from (empty for in-memory text)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cursor positioned at the beginning of the text
    pub fn cursor(&self) -> TextCursor<'_> {
        TextCursor::new(self.as_bytes())
    }
}

/// A position within a text, advanced by tokenizers
#[derive(Debug, Clone, Copy)]
pub struct TextCursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> TextCursor<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { text, pos: 0 }
    }

    pub fn at(text: &'a [u8], pos: usize) -> Self {
        Self {
            text,
            pos: pos.min(text.len()),
        }
    }

    #[inline]
    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Bytes from the cursor to the end of the text
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.text[self.pos..]
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    /// Advance by `n` bytes, stopping at the end of the text
    pub fn forward(&mut self, n: usize) -> usize {
        self.pos = self.pos.saturating_add(n).min(self.text.len());
        self.pos
    }

    /// Move to the first byte after the next newline
    pub fn goto_next_line(&mut self) -> usize {
        self.pos = scan::seek_eol(self.text, self.pos);
        self.pos
    }

    /// Move past the current word and the whitespace that follows it
    pub fn goto_next_word(&mut self) -> usize {
        let end = scan::seek_forward(self.text, self.pos, scan::WHITESPACE);
        self.pos = scan::skip_forward(self.text, end, scan::WHITESPACE);
        self.pos
    }

    /// The full line containing the cursor, including its newline
    pub fn line(&self) -> &'a [u8] {
        let bol = scan::seek_bol(self.text, self.pos);
        let eol = scan::seek_eol(self.text, self.pos);
        &self.text[bol..eol]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_mapped_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(&path, b"hello world\n").unwrap();

        let text = TextView::open(&path).unwrap();
        assert_eq!(text.len(), 12);
        assert_eq!(text.as_bytes(), b"hello world\n");
        assert_eq!(text.path(), path.as_path());
    }

    #[test]
    fn test_open_empty_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, b"").unwrap();

        let text = TextView::open(&path).unwrap();
        assert!(text.is_empty());
        assert!(text.cursor().is_eof());
    }

    #[test]
    fn test_open_missing_text() {
        let dir = tempdir().unwrap();
        let err = TextView::open(&dir.path().join("missing.txt")).err().unwrap();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_size_ceiling() {
        assert!(check_size(Path::new("big.txt"), MAX_TEXT_SIZE).is_ok());
        let err = check_size(Path::new("big.txt"), MAX_TEXT_SIZE + 1).unwrap_err();
        assert!(matches!(
            err,
            Error::TextTooLarge { size, .. } if size == MAX_TEXT_SIZE + 1
        ));
        // offsets from 4 GiB up would wrap in a 32-bit index point
        assert!(check_size(Path::new("big.txt"), 1 << 32).is_err());

        let text = TextView::try_from_bytes(b"small".to_vec()).unwrap();
        assert_eq!(text.as_bytes(), b"small");
    }

    #[test]
    fn test_cursor_navigation() {
        let text = TextView::from_bytes(b"one two\nthree  four\n".to_vec());
        let mut cursor = text.cursor();

        assert_eq!(cursor.goto_next_word(), 4);
        assert_eq!(cursor.line(), b"one two\n");
        assert_eq!(cursor.goto_next_line(), 8);
        assert_eq!(cursor.goto_next_word(), 15);
        assert_eq!(cursor.forward(100), 20);
        assert!(cursor.is_eof());
    }
}
