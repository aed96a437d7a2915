//! Statement-form downgrading.
//!
//! The legacy dialect spells single-argument output as a statement:
//! `print("hello")` becomes `print "hello"`. Only an invocation standing
//! alone at statement level, with exactly one top-level, comma-free,
//! keyword-free argument, is rewritten; every other call form is accepted
//! by the legacy interpreter as-is and left alone.

use pybackport_scanner::LiteralSpan;

use super::{ident_end, is_ident_start, next_code_pos, skip_comment};

/// Downgrade designated routine invocations in code regions of `source`.
///
/// `spans` must be the scan of `source`; `routines` lists the bare-word
/// names to rewrite.
pub fn downgrade_statements(source: &str, spans: &[LiteralSpan], routines: &[String]) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut span_idx = 0;
    let mut depth = 0usize;
    let mut at_stmt_start = true;
    let mut pos = 0;

    while pos < bytes.len() {
        let advanced = next_code_pos(spans, &mut span_idx, pos);
        if advanced != pos {
            at_stmt_start = false;
            pos = advanced;
        }
        if pos >= bytes.len() {
            break;
        }
        let b = bytes[pos];

        if at_stmt_start && depth == 0 && is_ident_start(b) {
            at_stmt_start = false;
            let name_end = ident_end(bytes, pos);
            let name = &source[pos..name_end];
            if routines.iter().any(|r| r == name) && bytes.get(name_end) == Some(&b'(') {
                if let Some((close, argument)) = single_argument(source, spans, name_end) {
                    if statement_ends_after(bytes, spans, close + 1) {
                        out.push_str(&source[cursor..name_end]);
                        out.push(' ');
                        out.push_str(argument.trim());
                        cursor = close + 1;
                        pos = close + 1;
                        continue;
                    }
                }
            }
            pos = name_end;
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

    out.push_str(&source[cursor..]);
    out
}

/// Check that the argument list opening at `open` holds exactly one
/// top-level, comma-free, keyword-free argument; returns the closing paren
/// position and the argument text.
fn single_argument<'a>(
    source: &'a str,
    spans: &[LiteralSpan],
    open: usize,
) -> Option<(usize, &'a str)> {
    let bytes = source.as_bytes();
    let mut span_idx = spans.partition_point(|s| s.end <= open);
    let mut depth = 0usize;
    let mut pos = open + 1;

    loop {
        pos = next_code_pos(spans, &mut span_idx, pos);
        if pos >= bytes.len() {
            return None;
        }
        match bytes[pos] {
            b'#' => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b')' if depth == 0 => {
                let argument = &source[open + 1..pos];
                let trimmed = argument.trim();
                // An empty or starred argument has no statement form
                if trimmed.is_empty() || trimmed.starts_with('*') {
                    return None;
                }
                return Some((pos, argument));
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return None,
            b'=' if depth == 0 => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    continue;
                }
                // Comparison tails are arguments; a bare `=` is keyword form
                if !matches!(bytes[pos - 1], b'!' | b'<' | b'>') {
                    return None;
                }
            }
            _ => {}
        }
        pos += 1;
    }
}

/// Check that only blanks or a comment sit between `pos` and the end of
/// the statement
fn statement_ends_after(bytes: &[u8], spans: &[LiteralSpan], pos: usize) -> bool {
    let mut span_idx = spans.partition_point(|s| s.end <= pos);
    let mut pos = pos;
    loop {
        let advanced = next_code_pos(spans, &mut span_idx, pos);
        if advanced != pos {
            return false; // a literal follows the call
        }
        if pos >= bytes.len() {
            return true;
        }
        match bytes[pos] {
            b' ' | b'\t' | b'\r' => pos += 1,
            b'\n' | b';' | b'#' => return true,
            _ => return false,
        }
    }
}
