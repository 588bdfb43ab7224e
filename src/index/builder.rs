//! Suffix array construction
//!
//! Every entry point writes into a temporary file next to the array path and
//! renames it into place only once the whole phase succeeded, so a failed
//! build never leaves a truncated array behind.

use super::array::load_points;
use super::merger::merge_blocks;
use super::mkqsort::multikey_qsort;
use super::sorter::sort_blocks;
use super::types::{BuildConfig, IndexPoint, default_array_path};
use super::writer::ArrayWriter;
use crate::error::{Error, IoResultExt, Result};
use crate::text::{TextView, check_size};
use crate::utils::progress::{Progress, ProgressSink, QuietProgress};
use crate::utils::tokenizer::Tokenizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Builds the suffix array of one text
pub struct Builder {
    text: Arc<TextView>,
    array_path: PathBuf,
    config: BuildConfig,
    progress: Arc<dyn ProgressSink>,
}

impl Builder {
    /// Builder for a text file, writing to `<text>.ary`
    pub fn new(text_path: &Path) -> Result<Self> {
        let text = TextView::open(text_path)?;
        Ok(Self::from_text(Arc::new(text), default_array_path(text_path)))
    }

    /// Builder for an already opened text
    pub fn from_text(text: Arc<TextView>, array_path: impl Into<PathBuf>) -> Self {
        Self {
            text,
            array_path: array_path.into(),
            config: BuildConfig::default(),
            progress: Arc::new(QuietProgress),
        }
    }

    pub fn with_array_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.array_path = path.into();
        self
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    pub fn set_tokenizer(&mut self, tokenizer: Tokenizer) {
        self.config.tokenizer = tokenizer;
    }

    /// Bytes per block for block sorting; `None` sorts the whole array
    pub fn set_block_size(&mut self, bytes: Option<usize>) {
        self.config.block_size = bytes;
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.config.threads = threads;
    }

    pub fn array_path(&self) -> &Path {
        &self.array_path
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn text(&self) -> &Arc<TextView> {
        &self.text
    }

    /// Write the unsorted index points of the text
    ///
    /// Returns the number of points written.
    pub fn index(&self) -> Result<u64> {
        self.config.validate()?;
        let text = self.text.as_bytes();
        let staged = self.stage()?;
        let mut writer = self.writer_for(&staged)?;

        let mut progress = Progress::new("index", text.len() as u64, self.progress.as_ref());
        for point in self.config.tokenizer.points(text) {
            writer.write(point)?;
            progress.set(point as u64);
        }
        progress.finish();

        let count = writer.finish()?;
        self.promote(staged)?;
        info!(points = count, path = %self.array_path.display(), "indexed text");
        Ok(count)
    }

    /// Sort an array previously written by [`Builder::index`]
    pub fn sort(&self) -> Result<()> {
        self.config.validate()?;
        let mut points = load_points(&self.array_path)?;
        if let Some(block_points) = self.config.block_points() {
            self.block_sort_points(&mut points, block_points)
        } else {
            self.sort_points(&mut points)
        }
    }

    /// Sort an unsorted array by blocks and merge the blocks
    pub fn block_sort(&self) -> Result<()> {
        self.config.validate()?;
        let block_points = self
            .config
            .block_points()
            .ok_or_else(|| Error::invalid("block sort requires a block size"))?;
        let mut points = load_points(&self.array_path)?;
        self.block_sort_points(&mut points, block_points)
    }

    /// Index and sort in one pass without writing the unsorted array
    ///
    /// Returns the number of points in the array.
    pub fn index_and_sort(&self) -> Result<u64> {
        self.config.validate()?;
        let text = self.text.as_bytes();

        let mut progress = Progress::new("index", text.len() as u64, self.progress.as_ref());
        let mut points = Vec::new();
        for point in self.config.tokenizer.points(text) {
            points.push(point);
            progress.set(point as u64);
        }
        progress.finish();
        debug!(points = points.len(), "collected index points");

        let count = points.len() as u64;
        match self.config.block_points() {
            Some(block_points) => self.block_sort_points(&mut points, block_points)?,
            None => self.sort_points(&mut points)?,
        }
        Ok(count)
    }

    fn sort_points(&self, points: &mut [IndexPoint]) -> Result<()> {
        let text = self.text.as_bytes();
        let mut progress = Progress::new("sort", points.len() as u64, self.progress.as_ref());
        multikey_qsort(points, 0, text, Some(&mut progress));
        progress.finish();

        let staged = self.stage()?;
        let mut writer = self.writer_for(&staged)?;
        for &point in points.iter() {
            writer.write(point)?;
        }
        let count = writer.finish()?;
        self.promote(staged)?;
        info!(points = count, path = %self.array_path.display(), "sorted array");
        Ok(())
    }

    fn block_sort_points(&self, points: &mut [IndexPoint], block_points: usize) -> Result<()> {
        let text = self.text.as_bytes();
        let total = points.len() as u64;

        let mut progress = Progress::new("sort", total, self.progress.as_ref());
        let blocks = sort_blocks(points, text, block_points, self.config.threads, &mut progress)?;
        progress.finish();

        let staged = self.stage()?;
        let mut writer = self.writer_for(&staged)?;
        let mut progress = Progress::new("merge", total, self.progress.as_ref());
        merge_blocks(text, points, &blocks, &mut writer, &mut progress)?;
        progress.finish();

        let count = writer.finish()?;
        self.promote(staged)?;
        info!(
            points = count,
            blocks = blocks.len(),
            threads = self.config.threads,
            path = %self.array_path.display(),
            "block sorted array"
        );
        Ok(())
    }

    /// Temporary file in the directory of the array path
    fn stage(&self) -> Result<NamedTempFile> {
        let dir = match self.array_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        NamedTempFile::new_in(dir).with_path(dir)
    }

    fn writer_for(&self, staged: &NamedTempFile) -> Result<ArrayWriter> {
        let file = staged.as_file().try_clone().with_path(staged.path())?;
        Ok(ArrayWriter::new(file, staged.path()))
    }

    fn promote(&self, staged: NamedTempFile) -> Result<()> {
        staged
            .persist(&self.array_path)
            .map(|_| ())
            .map_err(|e| Error::Io {
                path: self.array_path.clone(),
                source: e.error,
            })
    }
}

/// Sorted index points of `text`, built entirely in memory
///
/// Fails with [`Error::TextTooLarge`] when `text` exceeds
/// [`MAX_TEXT_SIZE`](crate::text::MAX_TEXT_SIZE).
pub fn build_in_memory(text: &[u8], tokenizer: Tokenizer) -> Result<Vec<IndexPoint>> {
    check_size(Path::new(""), text.len() as u64)?;
    let mut points: Vec<IndexPoint> = tokenizer.points(text).collect();
    multikey_qsort(&mut points, 0, text, None);
    Ok(points)
}
