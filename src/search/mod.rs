//! Searching a finished suffix array
//!
//! - [`searcher`] - plain, incremental, case-insensitive and multi-pattern search
//! - [`bsearch`] - first/last match binary search
//! - [`cache`] - result memo
//! - [`region`] - occurrence to text region extraction

pub mod bsearch;
pub mod cache;
pub mod region;
pub mod searcher;
pub mod types;

pub use region::Seeker;
pub use searcher::Searcher;
pub use types::{OccurrenceRange, Occurrences, Region, SearchStats};
