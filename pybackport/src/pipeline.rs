//! Pipeline logic for transcoding script text.
//!
//! This module runs the fixed stage order:
//! scan → interpolation rewrite → annotation strip → statement downgrade.
//!
//! Every stage consumes the previous stage's output and re-scans it before
//! touching anything, so literal positions are always current. No stage
//! ever fails the pipeline: a span that cannot be rewritten confidently is
//! left unchanged and reported as a diagnostic.

use pybackport_scanner::{scan, SourceMap};

use crate::config::TranscoderConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::stages::annotations::strip_annotations;
use crate::stages::interpolation::rewrite_interpolations;
use crate::stages::statement::downgrade_statements;

/// Result of one transcoding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// Transcoded text
    pub text: String,
    /// Indices into the initial scan's span list of literals the
    /// interpolation stage rewrote
    pub rewritten_spans: Vec<usize>,
    /// True when the pipeline changed nothing; running the pipeline on its
    /// own output always yields an idempotent result
    pub idempotent: bool,
}

/// Run the full pipeline over `source`.
///
/// Total: always returns a result. The most conservative outcome is the
/// input unchanged (an unterminated literal fails the scan, and rewriting
/// a partially scanned buffer is never safe).
pub fn run(source: &str, config: &TranscoderConfig) -> (RewriteResult, Diagnostics) {
    let mut diagnostics = Diagnostics::new();

    let spans = match scan(source) {
        Ok(spans) => spans,
        Err(error) => {
            diagnostics.push(Diagnostic::from(error));
            return (
                RewriteResult {
                    text: source.to_string(),
                    rewritten_spans: Vec::new(),
                    idempotent: true,
                },
                diagnostics,
            );
        }
    };

    // Interpolation rewrite
    let outcome = rewrite_interpolations(source, &spans, &config.composition_method);
    locate_all(&mut diagnostics, outcome.diagnostics, source);
    let rewritten_spans = outcome.rewritten;
    let mut text = outcome.text;

    // Annotation strip; the rewritten text is re-scanned first
    if let Ok(spans) = scan(&text) {
        let outcome = strip_annotations(&text, &spans);
        locate_all(&mut diagnostics, outcome.diagnostics, &text);
        text = outcome.text;
    }

    // Statement downgrade
    if let Ok(spans) = scan(&text) {
        text = downgrade_statements(&text, &spans, &config.statement_routines);
    }

    let idempotent = text == source;
    (
        RewriteResult {
            text,
            rewritten_spans,
            idempotent,
        },
        diagnostics,
    )
}

/// Attach line/column information to stage diagnostics, whose spans carry
/// offsets into `stage_input`
fn locate_all(diagnostics: &mut Diagnostics, raw: Vec<Diagnostic>, stage_input: &str) {
    if raw.is_empty() {
        return;
    }
    let map = SourceMap::new(stage_input);
    for diagnostic in raw {
        diagnostics.push(diagnostic.located(&map));
    }
}
