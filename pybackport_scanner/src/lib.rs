//! pybackport_scanner
//!
//! Escape-aware string-literal scanner for the pybackport transcoder.
//!
//! This crate walks a source buffer once, left to right, and produces an
//! ordered list of [`LiteralSpan`]s: the offset-indexed span list every
//! rewrite stage consumes instead of re-deriving quoting on its own.
//!
//! # Example
//!
//! ```
//! use pybackport_scanner::scan;
//!
//! let spans = scan("msg = f\"hi {name}\"").expect("scan failed");
//!
//! assert_eq!(spans.len(), 1);
//! assert!(spans[0].interpolated);
//! ```

pub mod error;
pub mod literal;
pub mod scanner;
pub mod span;

// Re-exports
pub use error::{ScanError, ScanErrors, ScanResult};
pub use literal::{LiteralPrefix, LiteralSpan};
pub use scanner::{scan, scan_with_errors, Scanner};
pub use span::{SourceMap, Span};

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_empty() {
        assert!(scan("").unwrap().is_empty());
    }

    #[test]
    fn test_scan_with_errors() {
        let (spans, errors) = scan_with_errors("x = 'done");
        assert!(spans.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
