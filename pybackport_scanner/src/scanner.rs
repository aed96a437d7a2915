//! Literal scanner
//!
//! Walks the raw buffer once, left to right, and records every string
//! literal as a `LiteralSpan`. The walk is character-indexed over the whole
//! buffer (never line-indexed), so literals spanning line breaks are
//! handled correctly. Code between literals is skipped verbatim; `#`
//! comments are skipped so a quote inside a comment opens nothing.

use crate::error::{ScanError, ScanErrors, ScanResult};
use crate::literal::{LiteralPrefix, LiteralSpan};
use crate::span::SourceMap;

/// Literal scanner over a source buffer
pub struct Scanner<'a> {
    source: &'a str,
    source_map: SourceMap,
    /// Current position in source
    pos: usize,
}

impl std::fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner").field("pos", &self.pos).finish()
    }
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source code
    pub fn new(source: &'a str) -> Self {
        let source_map = SourceMap::new(source);
        Self {
            source,
            source_map,
            pos: 0,
        }
    }

    /// Get the source code
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the source map
    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Get current position in source
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Find the next literal, or `None` at end of input.
    ///
    /// On an unterminated literal the scanner jumps to end of input, so the
    /// error is reported once and iteration then stops.
    pub fn next_literal(&mut self) -> Option<ScanResult<LiteralSpan>> {
        let bytes = self.source.as_bytes();

        while self.pos < bytes.len() {
            // Hop to the next quote or comment start.
            let offset = memchr::memchr3(b'"', b'\'', b'#', &bytes[self.pos..])?;
            let at = self.pos + offset;

            if bytes[at] == b'#' {
                // Line comment: quotes inside open no literal
                self.pos = match memchr::memchr(b'\n', &bytes[at..]) {
                    Some(nl) => at + nl + 1,
                    None => bytes.len(),
                };
                continue;
            }

            let quote = bytes[at];
            let prefix = LiteralPrefix::leading(bytes, at);
            let triple =
                at + 3 <= bytes.len() && bytes[at + 1] == quote && bytes[at + 2] == quote;
            let content_start = at + if triple { 3 } else { 1 };
            let start = at - prefix.len;

            match self.scan_to_close(content_start, quote, triple) {
                Ok(end) => {
                    self.pos = end;
                    return Some(Ok(LiteralSpan {
                        start,
                        end,
                        quote: quote as char,
                        triple,
                        interpolated: prefix.interpolated,
                        raw: prefix.raw,
                        bytes: prefix.bytes,
                        prefix_len: prefix.len,
                    }));
                }
                Err(e) => {
                    self.pos = bytes.len();
                    return Some(Err(e));
                }
            }
        }

        None
    }

    /// Scan literal content to find the closing quote sequence.
    /// Uses memchr for SIMD-accelerated scanning.
    ///
    /// A backslash always consumes the following byte, so an escaped quote
    /// never closes the literal. This holds for raw literals too: the
    /// dialect does not let a raw literal end in an odd number of
    /// backslashes.
    fn scan_to_close(&self, start: usize, quote: u8, triple: bool) -> ScanResult<usize> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while pos < bytes.len() {
            match memchr::memchr2(b'\\', quote, &bytes[pos..]) {
                None => break,
                Some(offset) => {
                    pos += offset;
                    if bytes[pos] == b'\\' {
                        pos += 2;
                        continue;
                    }
                    if triple {
                        if pos + 3 <= bytes.len()
                            && bytes[pos + 1] == quote
                            && bytes[pos + 2] == quote
                        {
                            return Ok(pos + 3);
                        }
                        pos += 1;
                    } else {
                        return Ok(pos + 1);
                    }
                }
            }
        }

        let opener = start - if triple { 3 } else { 1 };
        Err(ScanError::UnterminatedLiteral {
            span: self.source_map.span(opener, bytes.len()),
        })
    }

    /// Collect all literal spans (for debugging)
    pub fn collect_all(mut self) -> Vec<ScanResult<LiteralSpan>> {
        let mut spans = Vec::new();
        while let Some(span) = self.next_literal() {
            spans.push(span);
        }
        spans
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanResult<LiteralSpan>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_literal()
    }
}

/// Scan source code into an ordered list of literal spans.
///
/// Returns an error if the buffer ends inside a literal; callers that need
/// the spans found before the error can use [`scan_with_errors`].
pub fn scan(source: &str) -> ScanResult<Vec<LiteralSpan>> {
    let mut spans = Vec::new();
    for result in Scanner::new(source) {
        spans.push(result?);
    }
    Ok(spans)
}

/// Scan source code, collecting errors instead of stopping at the first.
pub fn scan_with_errors(source: &str) -> (Vec<LiteralSpan>, ScanErrors) {
    let mut spans = Vec::new();
    let mut errors = ScanErrors::new();
    for result in Scanner::new(source) {
        match result {
            Ok(span) => spans.push(span),
            Err(e) => errors.push(e),
        }
    }
    (spans, errors)
}
