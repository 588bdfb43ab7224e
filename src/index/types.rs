//! Types shared by the suffix array build pipeline

use crate::error::{Error, IoResultExt, Result};
use crate::utils::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Offset of the first byte of a suffix
///
/// Stored on disk as a 4-byte big-endian signed integer, so values never
/// exceed `i32::MAX`.
pub type IndexPoint = u32;

/// Size of one index point in an array file
pub const INDEX_POINT_SIZE: usize = 4;

/// Extension appended to the text path for the default array file
pub const ARRAY_EXTENSION: &str = "ary";

/// Block size used by the CLI when block sorting is requested without a size
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Default array path for a text file: `<text>.ary`
pub fn default_array_path(text_path: &Path) -> PathBuf {
    let mut name = text_path.as_os_str().to_os_string();
    name.push(".");
    name.push(ARRAY_EXTENSION);
    PathBuf::from(name)
}

/// Configuration for building a suffix array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// How index points are chosen
    pub tokenizer: Tokenizer,
    /// Bytes of array per block; `None` sorts the whole array at once
    pub block_size: Option<usize>,
    /// Worker threads for block sorting
    pub threads: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::ByteStream,
            block_size: None,
            threads: 1,
        }
    }
}

impl BuildConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).with_path(path)?;
        let config: Self = serde_json::from_slice(&data).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the sorter cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::invalid("thread count must be positive"));
        }
        match self.block_size {
            Some(bytes) if bytes < INDEX_POINT_SIZE => Err(Error::invalid(format!(
                "block size must hold at least one index point ({} bytes), got {}",
                INDEX_POINT_SIZE, bytes
            ))),
            None if self.threads > 1 => Err(Error::invalid(
                "multiple threads require block sorting (set a block size)",
            )),
            _ => Ok(()),
        }
    }

    /// Number of index points per block, if block sorting is enabled
    pub fn block_points(&self) -> Option<usize> {
        self.block_size.map(|bytes| bytes / INDEX_POINT_SIZE)
    }
}
