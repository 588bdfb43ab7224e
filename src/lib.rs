//! # FXSA - Suffix Array Indexing and Search
//!
//! FXSA builds a suffix array over a text file and answers substring
//! queries by binary search over it, without scanning the text.
//!
//! ## Architecture
//!
//! - [`text`] - Memory-mapped, read-only text
//! - [`index`] - Array construction (multikey quicksort, block sort + merge)
//! - [`search`] - Plain, incremental, case-insensitive and multi-pattern search
//! - [`output`] - Terminal printing of matched regions
//! - [`utils`] - Tokenizers, byte scanning, progress reporting
//!
//! ## Quick Start
//!
//! ```no_run
//! use fxsa::index::Builder;
//! use fxsa::search::Searcher;
//! use std::path::Path;
//!
//! let path = Path::new("corpus.txt");
//! Builder::new(path)?.index_and_sort()?;
//!
//! let mut searcher = Searcher::open(path)?;
//! if searcher.search(b"needle") {
//!     searcher.sort_occurrences();
//!     while let Some(line) = searcher.next_line() {
//!         print!("{}", String::from_utf8_lossy(line));
//!     }
//! }
//! # Ok::<(), fxsa::Error>(())
//! ```
//!
//! ## On-disk format
//!
//! An array file is a flat run of 4-byte big-endian offsets into the text,
//! sorted by the suffixes they start. There is no header; the number of
//! points is the file size divided by four.

pub mod error;
pub mod index;
pub mod output;
pub mod search;
pub mod text;
pub mod utils;

pub use error::{Error, Result};
