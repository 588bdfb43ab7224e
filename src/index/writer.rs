//! Sequential array file writer
//!
//! Index points are written as 4-byte big-endian integers with no header.
//! Writes go through a 1 MiB buffer to keep system calls down.

use super::types::IndexPoint;
use crate::error::{IoResultExt, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Bytes buffered before a write reaches the file
pub const WRITE_BUFFER_SIZE: usize = 1024 * 1024;

/// Buffered writer of big-endian index points
pub struct ArrayWriter {
    file: BufWriter<File>,
    path: PathBuf,
    count: u64,
}

impl ArrayWriter {
    /// Create (or truncate) an array file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).with_path(path)?;
        Ok(Self::new(file, path))
    }

    /// Write into an already opened file; `path` is used in error messages
    pub fn new(file: File, path: &Path) -> Self {
        Self {
            file: BufWriter::with_capacity(WRITE_BUFFER_SIZE, file),
            path: path.to_path_buf(),
            count: 0,
        }
    }

    #[inline]
    pub fn write(&mut self, point: IndexPoint) -> Result<()> {
        self.file
            .write_all(&point.to_be_bytes())
            .with_path(&self.path)?;
        self.count += 1;
        Ok(())
    }

    /// Points written so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Flush buffered points and return the total written
    pub fn finish(mut self) -> Result<u64> {
        self.file.flush().with_path(&self.path)?;
        self.file.get_ref().sync_data().with_path(&self.path)?;
        Ok(self.count)
    }
}
