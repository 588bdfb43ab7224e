//! Read-only suffix array access
//!
//! An array file is a flat sequence of big-endian 32-bit index points. The
//! number of points is the file size divided by four; trailing bytes are
//! ignored and no further validation is done.

use super::types::{INDEX_POINT_SIZE, IndexPoint};
use crate::error::{IoResultExt, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

enum Backing {
    Mapped(Mmap),
    Points(Vec<IndexPoint>),
    Empty,
}

/// A finished (sorted) suffix array
///
/// Shared read-only between any number of searchers.
pub struct SuffixArray {
    backing: Backing,
    len: usize,
}

impl SuffixArray {
    /// Memory-map an array file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_path(path)?;
        let size = file.metadata().with_path(path)?.len() as usize;
        let len = size / INDEX_POINT_SIZE;

        if len == 0 {
            return Ok(Self {
                backing: Backing::Empty,
                len: 0,
            });
        }

        // SAFETY: array files are not modified while a searcher holds them
        let map = unsafe { Mmap::map(&file) }.with_path(path)?;
        Ok(Self {
            backing: Backing::Mapped(map),
            len,
        })
    }

    /// Wrap points that are already sorted in memory
    pub fn from_points(points: Vec<IndexPoint>) -> Self {
        let len = points.len();
        Self {
            backing: Backing::Points(points),
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index point at position `i`
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn get(&self, i: usize) -> IndexPoint {
        match &self.backing {
            Backing::Mapped(map) => {
                let offset = i * INDEX_POINT_SIZE;
                let bytes: [u8; INDEX_POINT_SIZE] = map[offset..offset + INDEX_POINT_SIZE]
                    .try_into()
                    .unwrap_or([0; INDEX_POINT_SIZE]);
                IndexPoint::from_be_bytes(bytes)
            }
            Backing::Points(points) => points[i],
            Backing::Empty => panic!("index {} out of bounds for empty suffix array", i),
        }
    }

    /// Copy of the points in `first..=last`
    pub fn copy_range(&self, first: usize, last: usize) -> Vec<IndexPoint> {
        (first..=last).map(|i| self.get(i)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = IndexPoint> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

/// Read every index point of an array file into memory
pub fn load_points(path: &Path) -> Result<Vec<IndexPoint>> {
    let data = std::fs::read(path).with_path(path)?;
    Ok(data
        .chunks_exact(INDEX_POINT_SIZE)
        .map(|chunk| {
            let bytes: [u8; INDEX_POINT_SIZE] = [chunk[0], chunk[1], chunk[2], chunk[3]];
            IndexPoint::from_be_bytes(bytes)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::writer::ArrayWriter;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("text.ary");

        let mut writer = ArrayWriter::create(&path).unwrap();
        for point in [6, 5, 3, 1, 0, 4, 2] {
            writer.write(point).unwrap();
        }
        writer.finish().unwrap();

        let array = SuffixArray::open(&path).unwrap();
        assert_eq!(array.len(), 7);
        assert_eq!(array.get(0), 6);
        assert_eq!(array.get(6), 2);
        assert_eq!(array.copy_range(2, 4), vec![3, 1, 0]);
        assert_eq!(array.iter().collect::<Vec<_>>(), load_points(&path).unwrap());
    }

    #[test]
    fn test_open_empty_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.ary");
        fs::write(&path, b"").unwrap();

        let array = SuffixArray::open(&path).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.iter().count(), 0);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.ary");
        fs::write(&path, [0, 0, 0, 9, 0xff, 0xff]).unwrap();

        assert_eq!(SuffixArray::open(&path).unwrap().len(), 1);
        assert_eq!(load_points(&path).unwrap(), vec![9]);
    }

    #[test]
    fn test_missing_array() {
        let dir = tempdir().unwrap();
        assert!(SuffixArray::open(&dir.path().join("nope.ary")).is_err());
    }
}
