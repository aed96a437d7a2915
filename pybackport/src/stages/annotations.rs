//! Annotation stripping.
//!
//! Removes the type syntax the legacy dialect rejects: return annotations
//! (`-> type`), parameter annotations (`name: type`), and statement-level
//! variable declarations (`name: type = value`). Default values and
//! punctuation balance are preserved; bracket nesting inside a type
//! expression is balanced-matched, never scanned to the first comma.

use std::ops::Range;

use pybackport_scanner::{LiteralSpan, Span};

use super::{
    apply_deletions, ident_end, is_ident_continue, is_ident_start, is_keyword, next_code_pos,
    overlaps_literal, skip_comment, trim_back,
};
use crate::diagnostics::Diagnostic;

/// Output of the annotation stage
#[derive(Debug)]
pub struct AnnotationOutcome {
    /// Rewritten text
    pub text: String,
    /// Signatures left unchanged, with offsets into the stage's input text
    pub diagnostics: Vec<Diagnostic>,
}

/// Strip annotations from code regions of `source`.
///
/// `spans` must be the scan of `source`; literal bytes pass through
/// verbatim. A deletion that would touch a literal (a quoted forward
/// reference in a type) is discarded rather than applied.
pub fn strip_annotations(source: &str, spans: &[LiteralSpan]) -> AnnotationOutcome {
    let mut deletions: Vec<Range<usize>> = Vec::new();
    let mut diagnostics = Vec::new();

    collect_signature_deletions(source, spans, &mut deletions, &mut diagnostics);
    collect_declaration_deletions(source, spans, &mut deletions, &mut diagnostics);

    deletions.retain(|r| !overlaps_literal(spans, r.start, r.end));
    deletions.sort_by_key(|r| r.start);

    AnnotationOutcome {
        text: apply_deletions(source, &deletions),
        diagnostics,
    }
}

/// Find every `def` signature and strip its parameter and return
/// annotations.
fn collect_signature_deletions(
    source: &str,
    spans: &[LiteralSpan],
    deletions: &mut Vec<Range<usize>>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let bytes = source.as_bytes();
    let mut span_idx = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            break;
        }
        if bytes[pos] == b'#' {
            pos = skip_comment(bytes, pos);
            continue;
        }
        if is_def_at(bytes, pos) {
            pos = strip_one_signature(source, spans, pos, deletions, diagnostics);
        } else {
            pos += 1;
        }
    }
}

fn is_def_at(bytes: &[u8], pos: usize) -> bool {
    bytes[pos..].starts_with(b"def")
        && (pos == 0 || !is_ident_continue(bytes[pos - 1]))
        && (pos + 3 >= bytes.len() || !is_ident_continue(bytes[pos + 3]))
}

/// Strip one signature starting at the `def` keyword; returns the resume
/// position.
fn strip_one_signature(
    source: &str,
    spans: &[LiteralSpan],
    def_pos: usize,
    deletions: &mut Vec<Range<usize>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let bytes = source.as_bytes();
    let mut span_idx = spans.partition_point(|s| s.end <= def_pos);
    let mut pos = def_pos + 3;

    // Opening delimiter of the parameter list
    let open = loop {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            return pos;
        }
        match bytes[pos] {
            b'#' => pos = skip_comment(bytes, pos),
            b'(' => break pos,
            b':' | b'\n' => return pos, // no parameter list here
            _ => pos += 1,
        }
    };

    // Balanced walk to the closing delimiter
    let mut depth = 1usize;
    pos = open + 1;
    let close = loop {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            diagnostics.push(Diagnostic::UnbalancedSignature {
                span: Span::from_offsets(def_pos, bytes.len()),
            });
            return pos;
        }
        match bytes[pos] {
            b'#' => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth -= 1;
                if depth == 0 {
                    break pos;
                }
            }
            _ => {}
        }
        pos += 1;
    };

    collect_param_deletions(source, spans, open + 1, close, deletions);

    // Return annotation, if any
    pos = close + 1;
    loop {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            return pos;
        }
        match bytes[pos] {
            b'#' => pos = skip_comment(bytes, pos),
            b' ' | b'\t' | b'\r' | b'\\' | b'\n' => pos += 1,
            b'-' if bytes.get(pos + 1) == Some(&b'>') => break,
            _ => return pos,
        }
    }

    // Scan past the arrow to the block-opening colon
    let mut depth = 0usize;
    pos += 2;
    let colon = loop {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            diagnostics.push(Diagnostic::UnbalancedSignature {
                span: Span::from_offsets(def_pos, bytes.len()),
            });
            return pos;
        }
        match bytes[pos] {
            b'#' => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                if depth == 0 {
                    return pos; // not a signature header after all
                }
                depth -= 1;
            }
            b':' if depth == 0 => break pos,
            b'\n' if depth == 0 => return pos, // header never closed on this line
            _ => {}
        }
        pos += 1;
    };

    deletions.push(close + 1..colon);
    colon
}

/// Strip `name: type` annotations inside one parameter list, preserving
/// default values.
fn collect_param_deletions(
    source: &str,
    spans: &[LiteralSpan],
    start: usize,
    end: usize,
    deletions: &mut Vec<Range<usize>>,
) {
    let bytes = source.as_bytes();
    let mut span_idx = spans.partition_point(|s| s.end <= start);
    let mut depth = 0usize;
    let mut colon: Option<usize> = None;
    let mut past_default = false;
    let mut pos = start;

    while pos < end {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= end {
            break;
        }
        match bytes[pos] {
            b'#' => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                if let Some(ci) = colon.take() {
                    deletions.push(ci..trim_back(bytes, pos, ci));
                }
                past_default = false;
            }
            b':' if depth == 0 && !past_default && colon.is_none() => colon = Some(pos),
            b'=' if depth == 0 => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    continue;
                }
                if let Some(ci) = colon.take() {
                    deletions.push(ci..trim_back(bytes, pos, ci));
                }
                past_default = true;
            }
            _ => {}
        }
        pos += 1;
    }

    if let Some(ci) = colon.take() {
        deletions.push(ci..trim_back(bytes, end, ci));
    }
}

/// Find statement-level `name: type [= value]` declarations and strip the
/// annotation.
fn collect_declaration_deletions(
    source: &str,
    spans: &[LiteralSpan],
    deletions: &mut Vec<Range<usize>>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let bytes = source.as_bytes();
    let mut span_idx = 0;
    let mut depth = 0usize;
    let mut at_stmt_start = true;
    let mut pos = 0;

    while pos < bytes.len() {
        let advanced = next_code_pos(spans, &mut span_idx, pos);
        if advanced != pos {
            // A literal opened the statement; what follows is not a target
            at_stmt_start = false;
            pos = advanced;
        }
        if pos >= bytes.len() {
            break;
        }
        let b = bytes[pos];

        if at_stmt_start && depth == 0 && is_ident_start(b) {
            at_stmt_start = false;
            let first_end = ident_end(bytes, pos);
            if is_keyword(&source[pos..first_end]) {
                pos = first_end;
                continue;
            }
            // Dotted targets (`self.height: float = h`) count too
            let mut name_end = first_end;
            while bytes.get(name_end) == Some(&b'.')
                && name_end + 1 < bytes.len()
                && is_ident_start(bytes[name_end + 1])
            {
                name_end = ident_end(bytes, name_end + 1);
            }
            let mut q = name_end;
            while q < bytes.len() && (bytes[q] == b' ' || bytes[q] == b'\t') {
                q += 1;
            }
            if q < bytes.len() && bytes[q] == b':' && bytes.get(q + 1) != Some(&b'=') {
                pos = strip_declaration(source, spans, q, deletions, diagnostics);
            } else {
                pos = name_end;
            }
            continue;
        }

        match b {
            b'#' => pos = skip_comment(bytes, pos),
            b'\n' | b';' => {
                if depth == 0 {
                    at_stmt_start = true;
                }
                pos += 1;
            }
            b' ' | b'\t' | b'\r' => pos += 1,
            b'(' | b'[' | b'{' => {
                depth += 1;
                at_stmt_start = false;
                pos += 1;
            }
            b')' | b']' | b'}' => {
                depth = depth.saturating_sub(1);
                at_stmt_start = false;
                pos += 1;
            }
            _ => {
                at_stmt_start = false;
                pos += 1;
            }
        }
    }
}

/// Strip one declaration's `: type`, keeping a `= value` that follows;
/// returns the resume position.
fn strip_declaration(
    source: &str,
    spans: &[LiteralSpan],
    colon: usize,
    deletions: &mut Vec<Range<usize>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let bytes = source.as_bytes();
    let mut span_idx = spans.partition_point(|s| s.end <= colon);
    let mut depth = 0usize;
    let mut pos = colon + 1;

    loop {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            if depth > 0 {
                diagnostics.push(Diagnostic::UnbalancedSignature {
                    span: Span::from_offsets(colon, bytes.len()),
                });
                return pos;
            }
            deletions.push(colon..trim_back(bytes, pos, colon));
            return pos;
        }
        match bytes[pos] {
            b'#' if depth == 0 => {
                // Rest of the line is a comment; the type ends here
                deletions.push(colon..trim_back(bytes, pos, colon));
                return pos;
            }
            b'#' => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                if depth == 0 {
                    diagnostics.push(Diagnostic::UnbalancedSignature {
                        span: Span::from_offsets(colon, pos),
                    });
                    return pos;
                }
                depth -= 1;
            }
            b'=' if depth == 0 => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    continue;
                }
                deletions.push(colon..trim_back(bytes, pos, colon));
                return pos;
            }
            b'\n' | b';' if depth == 0 => {
                deletions.push(colon..trim_back(bytes, pos, colon));
                return pos;
            }
            _ => {}
        }
        pos += 1;
    }
}
