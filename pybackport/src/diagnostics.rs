//! Recovered-condition diagnostics.
//!
//! No condition here is fatal: each one records a span the pipeline left
//! unchanged instead of risking a bad rewrite. The string API stays
//! silent; callers that want the details use
//! [`transcode_with_diagnostics`](crate::api::transcode_with_diagnostics).

use pybackport_scanner::{ScanError, SourceMap, Span};
use serde::Serialize;
use thiserror::Error;

/// A condition a pipeline stage recovered from by leaving text unchanged
#[derive(Error, Debug, Clone, Serialize)]
pub enum Diagnostic {
    /// Scanner reached end of input still inside a literal; the whole
    /// buffer was returned unchanged
    #[error("unterminated literal at line {}, column {}: buffer left unchanged", .span.line, .span.column)]
    UnterminatedLiteral { span: Span },

    /// Unmatched brace count in an interpolated literal; that literal was
    /// left unrewritten
    #[error("unmatched braces in interpolated literal at line {}, column {}: literal left unrewritten", .span.line, .span.column)]
    AmbiguousInterpolation { span: Span },

    /// Annotation stripper could not balance bracket nesting; that
    /// signature was left unchanged
    #[error("unbalanced signature at line {}, column {}: signature left unchanged", .span.line, .span.column)]
    UnbalancedSignature { span: Span },
}

impl Diagnostic {
    /// Get the span of the diagnostic
    pub fn span(&self) -> &Span {
        match self {
            Diagnostic::UnterminatedLiteral { span } => span,
            Diagnostic::AmbiguousInterpolation { span } => span,
            Diagnostic::UnbalancedSignature { span } => span,
        }
    }

    /// Fill in line/column from the text the span's offsets refer to
    pub(crate) fn located(self, map: &SourceMap) -> Self {
        let locate = |span: Span| map.span(span.start, span.end);
        match self {
            Diagnostic::UnterminatedLiteral { span } => Diagnostic::UnterminatedLiteral {
                span: locate(span),
            },
            Diagnostic::AmbiguousInterpolation { span } => Diagnostic::AmbiguousInterpolation {
                span: locate(span),
            },
            Diagnostic::UnbalancedSignature { span } => Diagnostic::UnbalancedSignature {
                span: locate(span),
            },
        }
    }
}

impl From<ScanError> for Diagnostic {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::UnterminatedLiteral { span } => Diagnostic::UnterminatedLiteral { span },
        }
    }
}

/// Collection of diagnostics from one transcoding call
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the number of diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take all diagnostics
    pub fn take(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Iterate over diagnostics
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Get the first diagnostic
    pub fn first(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }

    /// Format all diagnostics as a single message
    pub fn format_all(&self) -> String {
        self.diagnostics
            .iter()
            .enumerate()
            .map(|(i, d)| format!("Diagnostic {}: {}", i + 1, d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
