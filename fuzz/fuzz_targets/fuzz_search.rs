#![no_main]

use arbitrary::Arbitrary;
use fxsa::index::{SuffixArray, build_in_memory};
use fxsa::search::Searcher;
use fxsa::text::TextView;
use fxsa::utils::tokenizer::Tokenizer;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    text: Vec<u8>,
    pattern: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Occurrence counts must agree with a linear scan
    let Ok(points) = build_in_memory(&input.text, Tokenizer::ByteStream) else {
        return;
    };
    let mut searcher = Searcher::new(
        Arc::new(TextView::from_bytes(input.text.clone())),
        Arc::new(SuffixArray::from_points(points)),
    );

    searcher.search(&input.pattern);
    let expected = (0..input.text.len())
        .filter(|&p| input.text[p..].starts_with(&input.pattern))
        .count();
    assert_eq!(searcher.count_occurrences(), expected);

    searcher.sort_occurrences();
    while searcher.next_line().is_some() {}
});
