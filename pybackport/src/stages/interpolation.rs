//! Interpolation rewriting.
//!
//! Turns an interpolated literal into a plain literal with positional
//! placeholders plus a trailing composition call:
//!
//! ```text
//! f"Door {door_id} analyzed"  =>  "Door {0} analyzed".format(door_id)
//! ```
//!
//! Expression text is passed through verbatim. A literal whose braces do
//! not pair up is left completely unrewritten.

use pybackport_scanner::{LiteralSpan, Span};

use crate::diagnostics::Diagnostic;

/// Output of the interpolation stage
#[derive(Debug)]
pub struct InterpolationOutcome {
    /// Rewritten text
    pub text: String,
    /// Indices (into the scan's span list) of literals that were rewritten
    pub rewritten: Vec<usize>,
    /// Literals left unrewritten, with offsets into the stage's input text
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrite every interpolated literal in `source`.
///
/// `spans` must be the scan of `source`. `method` is the composition-call
/// method name appended after the closing quote.
pub fn rewrite_interpolations(
    source: &str,
    spans: &[LiteralSpan],
    method: &str,
) -> InterpolationOutcome {
    let mut text = String::with_capacity(source.len());
    let mut rewritten = Vec::new();
    let mut diagnostics = Vec::new();
    let mut cursor = 0;

    for (idx, span) in spans.iter().enumerate() {
        text.push_str(&source[cursor..span.start]);
        let original = &source[span.start..span.end];
        if span.interpolated {
            match rewrite_literal(source, span, method) {
                Some(replacement) => {
                    text.push_str(&replacement);
                    rewritten.push(idx);
                }
                None => {
                    diagnostics.push(Diagnostic::AmbiguousInterpolation {
                        span: Span::from_offsets(span.start, span.end),
                    });
                    text.push_str(original);
                }
            }
        } else {
            text.push_str(original);
        }
        cursor = span.end;
    }
    text.push_str(&source[cursor..]);

    InterpolationOutcome {
        text,
        rewritten,
        diagnostics,
    }
}

/// Rewrite one interpolated literal, or `None` if its braces are ambiguous
fn rewrite_literal(source: &str, span: &LiteralSpan, method: &str) -> Option<String> {
    let body = &source[span.content_start()..span.content_end()];
    let (new_body, exprs) = extract_groups(body)?;

    let mut out = String::with_capacity(span.len() + 16);
    // Keep the prefix minus the interpolation marker
    for c in source[span.start..span.quote_start()].chars() {
        if c != 'f' && c != 'F' {
            out.push(c);
        }
    }
    out.push_str(&source[span.quote_start()..span.content_start()]);
    out.push_str(&new_body);
    out.push_str(&source[span.content_end()..span.end]);

    if !exprs.is_empty() {
        out.push('.');
        out.push_str(method);
        out.push('(');
        out.push_str(&exprs.join(", "));
        out.push(')');
    }
    Some(out)
}

/// Replace `{expr}` groups with `{N}` placeholders, collecting the
/// expressions in appearance order.
///
/// Returns `None` when the braces cannot be paired confidently: an
/// unmatched opener or closer, a nested group, or an empty expression.
fn extract_groups(body: &str) -> Option<(String, Vec<String>)> {
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    let mut exprs = Vec::new();
    // Order index threaded through the scan, one per group
    let mut order = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let Some(offset) = body[i..].find(['{', '}']) else {
            out.push_str(&body[i..]);
            break;
        };
        out.push_str(&body[i..i + offset]);
        i += offset;

        if bytes[i] == b'{' {
            if bytes.get(i + 1) == Some(&b'{') {
                out.push_str("{{");
                i += 2;
                continue;
            }
            let group_start = i + 1;
            let mut j = group_start;
            let close = loop {
                if j >= bytes.len() {
                    return None; // opener never closes
                }
                match bytes[j] {
                    b'{' => return None, // nested group
                    b'}' => break j,
                    _ => j += 1,
                }
            };
            let (expr, suffix) = split_group(&body[group_start..close]);
            if expr.trim().is_empty() {
                return None;
            }
            out.push('{');
            out.push_str(&order.to_string());
            out.push_str(suffix);
            out.push('}');
            exprs.push(expr.to_string());
            order += 1;
            i = close + 1;
        } else {
            if bytes.get(i + 1) == Some(&b'}') {
                out.push_str("}}");
                i += 2;
                continue;
            }
            return None; // stray closer
        }
    }

    Some((out, exprs))
}

/// Split a group into expression text and a format-spec/conversion suffix.
///
/// The suffix starts at the first top-level `:` (a format spec) or at a
/// `!r` / `!s` / `!a` conversion sitting at the end of the expression.
/// Colons inside brackets (`x[1:2]`) or quotes (`d['a:b']`) stay with the
/// expression.
fn split_group(group: &str) -> (&str, &str) {
    let bytes = group.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => return (&group[..i], &group[i..]),
            b'!' if depth == 0 => {
                let conversion = matches!(bytes.get(i + 1), Some(b'r') | Some(b's') | Some(b'a'))
                    && matches!(bytes.get(i + 2), None | Some(b':'));
                if conversion {
                    return (&group[..i], &group[i..]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    (group, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pybackport_scanner::scan;

    fn rewrite(source: &str) -> InterpolationOutcome {
        let spans = scan(source).unwrap();
        rewrite_interpolations(source, &spans, "format")
    }

    #[test]
    fn test_single_group() {
        let out = rewrite("print(f\"Door {door_id} analyzed\")");
        assert_eq!(out.text, "print(\"Door {0} analyzed\".format(door_id))");
        assert_eq!(out.rewritten, vec![0]);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let out = rewrite("f'{b} then {a} then {b}'");
        assert_eq!(out.text, "'{0} then {1} then {2}'.format(b, a, b)");
    }

    #[test]
    fn test_no_groups_drops_prefix_only() {
        let out = rewrite("x = f'plain'");
        assert_eq!(out.text, "x = 'plain'");
        assert_eq!(out.rewritten, vec![0]);
    }

    #[test]
    fn test_doubled_braces_kept() {
        let out = rewrite("f\"{{literal}} and {x}\"");
        assert_eq!(out.text, "\"{{literal}} and {0}\".format(x)");
    }

    #[test]
    fn test_unmatched_brace_left_alone() {
        let out = rewrite("a = f\"broken {x\"");
        assert_eq!(out.text, "a = f\"broken {x\"");
        assert!(out.rewritten.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn test_stray_closer_left_alone() {
        let out = rewrite("a = f\"odd } brace\"");
        assert_eq!(out.text, "a = f\"odd } brace\"");
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn test_non_interpolated_untouched() {
        let out = rewrite("x = \"keep {this}\"");
        assert_eq!(out.text, "x = \"keep {this}\"");
        assert!(out.rewritten.is_empty());
    }

    #[test]
    fn test_escaped_quote_in_literal() {
        let out = rewrite("f\"a \\\" b {x}\"");
        assert_eq!(out.text, "\"a \\\" b {0}\".format(x)");
    }

    #[test]
    fn test_format_spec_carried() {
        let out = rewrite("f'{x:>8}'");
        assert_eq!(out.text, "'{0:>8}'.format(x)");
    }

    #[test]
    fn test_conversion_carried() {
        let out = rewrite("f'{y!r} and {z!s:^4}'");
        assert_eq!(out.text, "'{0!r} and {1!s:^4}'.format(y, z)");
    }

    #[test]
    fn test_bang_operator_not_conversion() {
        let out = rewrite("f'{a != b}'");
        assert_eq!(out.text, "'{0}'.format(a != b)");
    }

    #[test]
    fn test_slice_colon_stays_in_expression() {
        let out = rewrite("f'{items[1:3]}'");
        assert_eq!(out.text, "'{0}'.format(items[1:3])");
    }

    #[test]
    fn test_raw_prefix_survives() {
        let out = rewrite("rf'path {p}'");
        assert_eq!(out.text, "r'path {0}'.format(p)");
    }

    #[test]
    fn test_triple_quoted_rewritten_uniformly() {
        let out = rewrite("doc = f'''line {a}\nline {b}'''");
        assert_eq!(out.text, "doc = '''line {0}\nline {1}'''.format(a, b)");
    }

    #[test]
    fn test_verbatim_expression_text() {
        let out = rewrite("f'{ door.id }'");
        assert_eq!(out.text, "'{0}'.format( door.id )");
    }

    #[test]
    fn test_method_name() {
        let spans = scan("f'{x}'").unwrap();
        let out = rewrite_interpolations("f'{x}'", &spans, "compose");
        assert_eq!(out.text, "'{0}'.compose(x)");
    }
}
