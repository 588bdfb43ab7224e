#![no_main]

use fxsa::utils::tokenizer::Tokenizer;
use libfuzzer_sys::fuzz_target;

const TOKENIZERS: &[Tokenizer] = &[
    Tokenizer::ByteStream,
    Tokenizer::EucJp,
    Tokenizer::ShiftJis,
    Tokenizer::Utf8,
    Tokenizer::Line,
    Tokenizer::Word,
];

fuzz_target!(|data: &[u8]| {
    // Points must be strictly increasing and inside the text, even on
    // malformed multibyte input
    for tokenizer in TOKENIZERS {
        let points: Vec<u32> = tokenizer.points(data).collect();
        assert!(points.windows(2).all(|w| w[0] < w[1]));
        assert!(points.iter().all(|&p| (p as usize) < data.len()));
    }
});
