//! Terminal output for search results

use memchr::memmem;
use std::io::{self, Write};
use std::ops::Range;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Byte ranges of `region` covered by any of `patterns`
///
/// Overlapping matches are merged; the result is sorted.
pub fn match_spans(region: &[u8], patterns: &[Vec<u8>], ignore_case: bool) -> Vec<Range<usize>> {
    let folded;
    let haystack = if ignore_case {
        folded = region.to_ascii_lowercase();
        &folded[..]
    } else {
        region
    };

    let mut spans: Vec<Range<usize>> = Vec::new();
    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        let needle = if ignore_case {
            pattern.to_ascii_lowercase()
        } else {
            pattern.clone()
        };
        // restart one byte past each hit so overlapping matches are kept
        let finder = memmem::Finder::new(&needle);
        let mut pos = 0;
        while let Some(i) = finder.find(&haystack[pos..]) {
            let start = pos + i;
            spans.push(start..start + needle.len());
            pos = start + 1;
        }
    }
    spans.sort_by_key(|span| span.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Writes regions, optionally highlighting the searched patterns
pub struct Printer<W> {
    out: W,
    patterns: Vec<Vec<u8>>,
    ignore_case: bool,
    highlight: bool,
}

impl Printer<StandardStream> {
    /// Printer on stdout; colors only when `highlight` is set
    pub fn stdout(highlight: bool) -> Self {
        let choice = if highlight {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice), highlight)
    }
}

impl<W: WriteColor> Printer<W> {
    pub fn new(out: W, highlight: bool) -> Self {
        Self {
            out,
            patterns: Vec::new(),
            ignore_case: false,
            highlight,
        }
    }

    /// Patterns to highlight inside printed regions
    pub fn with_patterns(mut self, patterns: Vec<Vec<u8>>, ignore_case: bool) -> Self {
        self.patterns = patterns;
        self.ignore_case = ignore_case;
        self
    }

    /// Print one region; a newline is added when it does not end with one
    pub fn region(&mut self, region: &[u8]) -> io::Result<()> {
        if self.highlight && !self.patterns.is_empty() {
            let mut pos = 0;
            for span in match_spans(region, &self.patterns, self.ignore_case) {
                self.out.write_all(&region[pos..span.start])?;
                self.out
                    .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                self.out.write_all(&region[span.clone()])?;
                self.out.reset()?;
                pos = span.end;
            }
            self.out.write_all(&region[pos..])?;
        } else {
            self.out.write_all(region)?;
        }

        if !region.ends_with(b"\n") {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Separator between context groups, like grep's `--`
    pub fn separator(&mut self) -> io::Result<()> {
        if self.highlight {
            self.out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        }
        writeln!(self.out, "--")?;
        if self.highlight {
            self.out.reset()?;
        }
        Ok(())
    }

    pub fn count(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "{}", count)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    fn patterns(list: &[&str]) -> Vec<Vec<u8>> {
        list.iter().map(|p| p.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_match_spans() {
        let region = b"an ananas and a banana";
        assert_eq!(
            match_spans(region, &patterns(&["ana"]), false),
            vec![3..8, 17..22]
        );
        assert_eq!(
            match_spans(b"Foo foo FOO", &patterns(&["foo"]), true),
            vec![0..3, 4..7, 8..11]
        );
        assert_eq!(
            match_spans(b"abcd", &patterns(&["ab", "bc", ""]), false),
            vec![0..3]
        );
        assert!(match_spans(b"abcd", &patterns(&["x"]), false).is_empty());
    }

    #[test]
    fn test_match_spans_overlapping() {
        assert_eq!(match_spans(b"ananas", &patterns(&["ana"]), false), vec![0..5]);
        assert_eq!(match_spans(b"aaaa", &patterns(&["aa"]), false), vec![0..4]);
        assert_eq!(
            match_spans(b"xANAnA", &patterns(&["ana"]), true),
            vec![1..6]
        );
    }

    #[test]
    fn test_plain_region() {
        let mut printer = Printer::new(Buffer::no_color(), false)
            .with_patterns(patterns(&["b"]), false);
        printer.region(b"abc\n").unwrap();
        printer.region(b"no newline").unwrap();
        printer.separator().unwrap();
        printer.count(3).unwrap();
        assert_eq!(
            printer.into_inner().into_inner(),
            b"abc\nno newline\n--\n3\n".to_vec()
        );
    }

    #[test]
    fn test_highlighted_region() {
        let mut printer = Printer::new(Buffer::ansi(), true).with_patterns(patterns(&["b"]), false);
        printer.region(b"abc\n").unwrap();
        let out = String::from_utf8(printer.into_inner().into_inner()).unwrap();
        assert!(out.starts_with('a'));
        assert!(out.contains("\x1b["));
        assert!(out.ends_with("c\n"));
    }
}
