//! Error types shared by the builder and the searcher.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or opening suffix arrays
#[derive(Error, Debug)]
pub enum Error {
    /// Open/read/write/rename failure on a text or array file
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed configuration or misuse of an API contract
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Index points are stored as 32-bit signed integers
    #[error("{}: text is {size} bytes, index points are limited to {} bytes", path.display(), i32::MAX)]
    TextTooLarge { path: PathBuf, size: u64 },

    #[error("{}: invalid configuration: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to start sort workers: {0}")]
    ThreadPool(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Attaches the offending path to raw `io::Error`s
pub trait IoResultExt<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
