//! End-to-end tests of the library: build an array on disk, then search it.

use fxsa::index::{BuildConfig, Builder, IndexPoint, SuffixArray, build_in_memory};
use fxsa::search::{Searcher, Seeker};
use fxsa::text::TextView;
use fxsa::utils::tokenizer::Tokenizer;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const CORPUS: &[u8] = include_bytes!("fixtures/corpus.txt");

fn setup(content: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("corpus.txt");
    fs::write(&path, content).expect("Failed to write corpus");
    (dir, path)
}

fn build(path: &Path, config: BuildConfig) {
    Builder::new(path)
        .expect("Failed to open text")
        .with_config(config)
        .index_and_sort()
        .expect("Failed to build array");
}

fn naive_count(text: &[u8], pattern: &[u8]) -> usize {
    (0..text.len())
        .filter(|&p| text[p..].starts_with(pattern))
        .count()
}

#[test]
fn test_array_is_sorted() {
    let (_dir, path) = setup(CORPUS);
    build(&path, BuildConfig::default());

    let array = SuffixArray::open(&fxsa::index::default_array_path(&path)).unwrap();
    let points: Vec<IndexPoint> = array.iter().collect();
    assert_eq!(points.len(), CORPUS.len());
    assert!(
        points
            .windows(2)
            .all(|w| CORPUS[w[0] as usize..] <= CORPUS[w[1] as usize..])
    );
}

#[test]
fn test_block_sort_equivalent_to_whole_sort() {
    let (dir, path) = setup(CORPUS);
    build(&path, BuildConfig::default());
    let whole = fs::read(fxsa::index::default_array_path(&path)).unwrap();

    for (block_size, threads) in [(64, 1), (256, 4), (4, 2)] {
        let array_path = dir.path().join(format!("block-{}-{}.ary", block_size, threads));
        let builder = Builder::new(&path)
            .unwrap()
            .with_array_path(&array_path)
            .with_config(BuildConfig {
                block_size: Some(block_size),
                threads,
                ..Default::default()
            });
        builder.index().unwrap();
        builder.block_sort().unwrap();
        assert_eq!(fs::read(&array_path).unwrap(), whole);
    }
}

#[test]
fn test_search_counts() {
    let (_dir, path) = setup(CORPUS);
    build(&path, BuildConfig::default());
    let mut searcher = Searcher::open(&path).unwrap();

    for pattern in [&b"fox"[..], b"suffix", b"array", b"the", b"\n", b"", b"zebra"] {
        searcher.search(pattern);
        assert_eq!(
            searcher.count_occurrences(),
            naive_count(CORPUS, pattern),
            "pattern {:?}",
            String::from_utf8_lossy(pattern)
        );
    }
}

#[test]
fn test_sorted_lines() {
    let (_dir, path) = setup(CORPUS);
    build(&path, BuildConfig::default());
    let mut searcher = Searcher::open(&path).unwrap();

    assert!(searcher.search(b"fox"));
    searcher.sort_occurrences();

    let mut lines = Vec::new();
    while let Some(line) = searcher.next_line() {
        lines.push(String::from_utf8_lossy(line).into_owned());
    }
    assert_eq!(
        lines,
        vec![
            "The quick brown fox jumps over the lazy dog.\n",
            "The Quick Brown Fox is not the same fox.\n",
            "QUICK reflexes help a fox.\n",
        ]
    );
}

#[test]
fn test_case_insensitive_and_tagged_regions() {
    let (_dir, path) = setup(CORPUS);
    build(&path, BuildConfig::default());
    let mut searcher = Searcher::open(&path).unwrap();

    assert!(searcher.case_insensitive_search(b"quick"));
    assert_eq!(searcher.count_occurrences(), 3);
    searcher.sort_occurrences();

    let seeker = Seeker::Tagged {
        start: b"<entry>",
        end: b"</entry>",
    };
    let mut regions = Vec::new();
    while let Some(region) = searcher.next_region(&seeker) {
        let text = searcher.region_text(region);
        assert!(text.starts_with(b"<entry>"));
        assert!(text.ends_with(b"</entry>"));
        regions.push(region);
    }
    assert_eq!(regions.len(), 3);
    assert!(regions.windows(2).all(|w| w[0].tail <= w[1].head));
}

#[test]
fn test_line_tokenizer_finds_line_prefixes_only() {
    let (_dir, path) = setup(CORPUS);
    build(
        &path,
        BuildConfig {
            tokenizer: Tokenizer::Line,
            ..Default::default()
        },
    );
    let mut searcher = Searcher::open(&path).unwrap();

    assert!(searcher.search(b"The"));
    assert_eq!(searcher.count_occurrences(), 2);
    assert!(searcher.search(b"<entry>"));
    assert_eq!(searcher.count_occurrences(), 3);
    // "fox" never starts a line
    assert!(!searcher.search(b"fox"));
}

#[test]
fn test_in_memory_matches_on_disk() {
    let (_dir, path) = setup(CORPUS);
    build(&path, BuildConfig::default());

    let on_disk = SuffixArray::open(&fxsa::index::default_array_path(&path)).unwrap();
    let in_memory = build_in_memory(CORPUS, Tokenizer::ByteStream).unwrap();
    assert_eq!(on_disk.iter().collect::<Vec<_>>(), in_memory);

    let mut searcher = Searcher::new(
        Arc::new(TextView::from_bytes(CORPUS)),
        Arc::new(SuffixArray::from_points(in_memory)),
    );
    assert!(searcher.multi_search(&["fox", "Fox", "dog"]));
    assert_eq!(searcher.count_occurrences(), 5);
}

#[test]
fn test_missing_array_is_reported() {
    let (_dir, path) = setup(CORPUS);
    let err = Searcher::open(&path).err().expect("array should be missing");
    assert!(matches!(err, fxsa::Error::Io { .. }));
}
