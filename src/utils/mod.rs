//! Utility functions shared by the builder and the searcher.
//!
//! ## Modules
//!
//! - [`scan`] - Line, tag and character-class seeking over byte slices
//! - [`tokenizer`] - Index point selection (bytes, characters, lines, words)
//! - [`progress`] - Progress reporting for long build phases

pub mod progress;
pub mod scan;
pub mod tokenizer;

pub use tokenizer::Tokenizer;
