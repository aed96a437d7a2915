//! Scan error types

use crate::span::Span;
use thiserror::Error;

/// Scan error type
#[derive(Error, Debug, Clone)]
pub enum ScanError {
    /// Scanner reached end of input still inside a literal
    #[error("unterminated string literal starting at line {}, column {}", .span.line, .span.column)]
    UnterminatedLiteral { span: Span },
}

impl ScanError {
    /// Get the span of the error
    pub fn span(&self) -> &Span {
        match self {
            ScanError::UnterminatedLiteral { span } => span,
        }
    }

    /// Format error with source context
    ///
    /// Returns a string showing the source line with an error marker.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();

        let lines: Vec<&str> = source.lines().collect();
        let line_idx = span.line.saturating_sub(1);

        if line_idx >= lines.len() {
            return String::new();
        }

        let line = lines[line_idx];
        let col = span.column.saturating_sub(1);

        let spaces = " ".repeat(col.min(line.len()));
        format!(
            "  {} | {}\n  {} | {}^",
            span.line,
            line,
            " ".repeat(span.line.to_string().len()),
            spaces
        )
    }
}

/// Result type for scanning operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Collection of scan errors for error recovery
#[derive(Debug, Default)]
pub struct ScanErrors {
    errors: Vec<ScanError>,
}

impl ScanErrors {
    /// Create a new empty error collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error
    pub fn push(&mut self, error: ScanError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Take all errors
    pub fn take(self) -> Vec<ScanError> {
        self.errors
    }

    /// Iterate over errors
    pub fn iter(&self) -> impl Iterator<Item = &ScanError> {
        self.errors.iter()
    }

    /// Get the first error
    pub fn first(&self) -> Option<&ScanError> {
        self.errors.first()
    }

    /// Format all errors as a single message
    pub fn format_all(&self, source: &str) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        self.errors
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let context = e.format_with_context(source);
                format!("Error {}: {}\n{}", i + 1, e, context)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl IntoIterator for ScanErrors {
    type Item = ScanError;
    type IntoIter = std::vec::IntoIter<ScanError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanErrors {
    type Item = &'a ScanError;
    type IntoIter = std::slice::Iter<'a, ScanError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
