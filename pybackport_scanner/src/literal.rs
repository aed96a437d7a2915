//! Literal span model
//!
//! A `LiteralSpan` records where a string literal lives in the source
//! buffer, which quote character delimits it, and which prefix flags it
//! carries. The span list produced by the scanner is the single source of
//! truth for every rewrite stage; no stage re-parses quoting on its own.

use serde::{Deserialize, Serialize};

/// A string literal recognized in the source buffer.
///
/// `start` addresses the first prefix character (or the opening quote when
/// there is no prefix); `end` points strictly after the closing quote
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralSpan {
    /// Byte offset of the first prefix character or opening quote
    pub start: usize,
    /// Byte offset just past the closing quote sequence
    pub end: usize,
    /// The quote character (`'` or `"`)
    pub quote: char,
    /// Triple-quoted (`'''` / `"""`)
    pub triple: bool,
    /// Prefix contains the interpolation marker `f`
    pub interpolated: bool,
    /// Prefix contains `r`
    pub raw: bool,
    /// Prefix contains `b`
    pub bytes: bool,
    /// Number of prefix characters (0..=2)
    pub prefix_len: usize,
}

impl LiteralSpan {
    /// Length of the quote run on each side (3 for triple-quoted, else 1)
    pub fn quote_run(&self) -> usize {
        if self.triple {
            3
        } else {
            1
        }
    }

    /// Byte offset of the opening quote
    pub fn quote_start(&self) -> usize {
        self.start + self.prefix_len
    }

    /// Byte offset of the first content byte (past prefix and opening quotes)
    pub fn content_start(&self) -> usize {
        self.quote_start() + self.quote_run()
    }

    /// Byte offset just past the last content byte (before the closing quotes)
    pub fn content_end(&self) -> usize {
        self.end - self.quote_run()
    }

    /// Total length of the literal in bytes, prefix and quotes included
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True only for a degenerate zero-length span
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if a byte offset falls inside this literal
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Prefix flags recognized immediately before an opening quote.
///
/// Any case-insensitive one- or two-character combination of `f`, `r` and
/// `b` is accepted, except the combinations the dialect itself rejects
/// (`fb`, doubled letters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiteralPrefix {
    /// Number of prefix characters (0..=2)
    pub len: usize,
    /// Contains `f` / `F`
    pub interpolated: bool,
    /// Contains `r` / `R`
    pub raw: bool,
    /// Contains `b` / `B`
    pub bytes: bool,
}

impl LiteralPrefix {
    /// Recognize the prefix ending just before `quote_pos`.
    ///
    /// The prefix must be preceded by a non-identifier byte (or the start
    /// of the buffer), so `shelf"x"` carries no prefix while `rf"x"` does.
    /// An invalid two-character window falls back to the single character
    /// adjacent to the quote, then to no prefix at all.
    pub fn leading(bytes: &[u8], quote_pos: usize) -> Self {
        let mut n = 0;
        while n < 2 && quote_pos > n && is_prefix_byte(bytes[quote_pos - n - 1]) {
            n += 1;
        }
        while n > 0 {
            let first = quote_pos - n;
            let bounded = first == 0 || !is_ident_continue(bytes[first - 1]);
            if bounded {
                if let Some(prefix) = Self::from_window(&bytes[first..quote_pos]) {
                    return prefix;
                }
            }
            n -= 1;
        }
        Self::default()
    }

    fn from_window(window: &[u8]) -> Option<Self> {
        let mut prefix = Self {
            len: window.len(),
            ..Self::default()
        };
        for &b in window {
            match b.to_ascii_lowercase() {
                b'f' if !prefix.interpolated => prefix.interpolated = true,
                b'r' if !prefix.raw => prefix.raw = true,
                b'b' if !prefix.bytes => prefix.bytes = true,
                _ => return None, // doubled letter
            }
        }
        if prefix.interpolated && prefix.bytes {
            return None; // fb / bf is not a literal prefix
        }
        Some(prefix)
    }
}

/// Check if a byte can be part of a literal prefix
pub(crate) fn is_prefix_byte(b: u8) -> bool {
    matches!(b, b'f' | b'F' | b'r' | b'R' | b'b' | b'B')
}

/// Check if a byte continues an identifier
pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leading(src: &str) -> LiteralPrefix {
        // Quote is the last byte of the test input
        LiteralPrefix::leading(src.as_bytes(), src.len() - 1)
    }

    #[test]
    fn test_no_prefix() {
        let p = leading("x = \"");
        assert_eq!(p.len, 0);
        assert!(!p.interpolated);
    }

    #[test]
    fn test_f_prefix() {
        let p = leading("x = f\"");
        assert_eq!(p.len, 1);
        assert!(p.interpolated);
        assert!(!p.raw);
    }

    #[test]
    fn test_two_char_prefixes() {
        let p = leading("rf\"");
        assert_eq!(p.len, 2);
        assert!(p.interpolated);
        assert!(p.raw);

        let p = leading("bR'");
        assert_eq!(p.len, 2);
        assert!(p.bytes);
        assert!(p.raw);
        assert!(!p.interpolated);
    }

    #[test]
    fn test_identifier_is_not_prefix() {
        // `shelf"` ends in an `f` that belongs to the identifier
        let p = leading("shelf\"");
        assert_eq!(p.len, 0);
    }

    #[test]
    fn test_invalid_combination_falls_back() {
        // `fb` is rejected outright; the `b` adjacent to the quote is also
        // preceded by an identifier byte, so no prefix survives
        let p = leading("x = fb\"");
        assert_eq!(p.len, 0);

        // `ff` is rejected, but here nothing saves the inner `f` either
        let p = leading("ff\"");
        assert_eq!(p.len, 0);
    }

    #[test]
    fn test_span_offsets() {
        let span = LiteralSpan {
            start: 4,
            end: 15,
            quote: '"',
            triple: false,
            interpolated: true,
            raw: false,
            bytes: false,
            prefix_len: 1,
        };
        assert_eq!(span.quote_start(), 5);
        assert_eq!(span.content_start(), 6);
        assert_eq!(span.content_end(), 14);
        assert_eq!(span.len(), 11);
    }
}
