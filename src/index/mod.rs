//! Suffix array construction and storage
//!
//! - [`builder`] - index / sort / block sort entry points
//! - [`mkqsort`] - multikey quicksort over suffixes
//! - [`sorter`] - parallel block sorting
//! - [`merger`] - k-way merge of sorted blocks
//! - [`writer`] / [`array`] - the on-disk array format

pub mod array;
pub mod builder;
pub mod merger;
pub mod mkqsort;
pub mod sorter;
pub mod types;
pub mod writer;

pub use array::SuffixArray;
pub use builder::{Builder, build_in_memory};
pub use types::*;
pub use writer::ArrayWriter;
