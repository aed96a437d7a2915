//! End-to-end transcoding tests
//!
//! Exercises the full pipeline contract: idempotence, literal
//! preservation, ordering, escapes, annotation removal, statement
//! downgrade, and fail-soft recovery.

use pretty_assertions::assert_eq;
use pybackport::{transcode_str, transcode_with_diagnostics, Diagnostic, TranscoderConfig};

fn assert_transcodes(source: &str, expected: &str) {
    let out = transcode_str(source);
    assert_eq!(out, expected, "for source: {}", source);
    // Idempotence is a hard contract, not an optimization
    assert_eq!(transcode_str(&out), out, "second pass changed: {}", out);
}

fn assert_unchanged(source: &str) {
    assert_transcodes(source, source);
}

// =============================================================================
// Scenario
// =============================================================================

#[test]
fn test_door_scenario() {
    assert_transcodes(
        "print(f\"Door {door_id} analyzed\")\n",
        "print \"Door {0} analyzed\".format(door_id)\n",
    );
}

#[test]
fn test_realistic_script() {
    let source = "\
import math

def analyze_door(door_id: int, height: float = 2.1) -> str:
    ratio: float = height / 2.0
    print(f\"Door {door_id} analyzed\")
    print(f\"ratio = {ratio:.2f}\")
    return f\"{door_id}: {ratio}\"

print(analyze_door(42))
";
    let expected = "\
import math

def analyze_door(door_id, height = 2.1):
    ratio = height / 2.0
    print \"Door {0} analyzed\".format(door_id)
    print \"ratio = {0:.2f}\".format(ratio)
    return \"{0}: {1}\".format(door_id, ratio)

print analyze_door(42)
";
    assert_transcodes(source, expected);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_idempotence_corpus() {
    let inputs = [
        "",
        "x = 1\n",
        "print(f\"{a}, {b}\")\n",
        "def f(a: int) -> int:\n    return a\n",
        "s = \"already {0}\".format(x)\n",
        "print \"legacy already\"\n",
        "t = f'''multi\nline {v}'''\n",
        "u = rb'raw bytes'\n",
        "broken = f\"{oops\"\n",
        "# just a comment with 'quotes' and f\" markers\n",
    ];
    for source in inputs {
        let once = transcode_str(source);
        let twice = transcode_str(&once);
        assert_eq!(twice, once, "not idempotent for: {}", source);
    }
}

#[test]
fn test_already_legacy_text_is_untouched() {
    assert_unchanged("print \"Door {0} analyzed\".format(door_id)\n");
    assert_unchanged("def f(a, b = 2):\n    return a + b\n");
}

// =============================================================================
// Literal preservation
// =============================================================================

#[test]
fn test_non_interpolated_literals_byte_identical() {
    assert_unchanged("x = \"keep {this} and \\\" that\"\n");
    assert_unchanged("y = r'C:\\temp'\n");
    assert_unchanged("z = b'\\x00\\x01'\n");
    assert_unchanged("doc = '''no change\nacross lines'''\n");
}

#[test]
fn test_code_outside_literals_untouched() {
    assert_unchanged("total = a + b * c  # arithmetic only\n");
}

// =============================================================================
// Interpolation
// =============================================================================

#[test]
fn test_order_preservation() {
    assert_transcodes(
        "msg = f\"{last}, {first} ({last})\"\n",
        "msg = \"{0}, {1} ({2})\".format(last, first, last)\n",
    );
}

#[test]
fn test_escape_correctness() {
    assert_transcodes(
        "m = f\"a \\\" b {x}\"\n",
        "m = \"a \\\" b {0}\".format(x)\n",
    );
}

#[test]
fn test_prefix_only_drop() {
    assert_transcodes("s = f'no groups here'\n", "s = 'no groups here'\n");
}

#[test]
fn test_doubled_braces() {
    assert_transcodes(
        "s = f\"{{n}} = {n}\"\n",
        "s = \"{{n}} = {0}\".format(n)\n",
    );
}

#[test]
fn test_multiline_interpolated_literal() {
    assert_transcodes(
        "report = f'''Door {door_id}\nheight {height}'''\n",
        "report = '''Door {0}\nheight {1}'''.format(door_id, height)\n",
    );
}

#[test]
fn test_unmatched_braces_left_unrewritten() {
    let source = "ok = f'{x}'\nbad = f'{broken'\n";
    let (result, diagnostics) =
        transcode_with_diagnostics(source, TranscoderConfig::shared_default());
    assert_eq!(result.text, "ok = '{0}'.format(x)\nbad = f'{broken'\n");
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics.first().unwrap(),
        Diagnostic::AmbiguousInterpolation { .. }
    ));
}

// =============================================================================
// Annotations
// =============================================================================

#[test]
fn test_annotation_removal() {
    assert_transcodes(
        "def f(a: int, b: List[str] = []) -> Dict[str, int]:\n    pass\n",
        "def f(a, b = []):\n    pass\n",
    );
}

#[test]
fn test_variable_declarations() {
    assert_transcodes("width: float = 0.9\n", "width = 0.9\n");
    assert_transcodes("label: str\n", "label\n");
}

#[test]
fn test_defaults_survive() {
    assert_transcodes(
        "def f(p: Point = Point(1, 2), s: str = \"a,b\"):\n    pass\n",
        "def f(p = Point(1, 2), s = \"a,b\"):\n    pass\n",
    );
}

// =============================================================================
// Statement downgrade
// =============================================================================

#[test]
fn test_statement_downgrade() {
    assert_transcodes("print(\"hello\")\n", "print \"hello\"\n");
}

#[test]
fn test_multi_argument_call_kept() {
    assert_unchanged("print(\"a\", \"b\")\n");
}

#[test]
fn test_keyword_call_kept() {
    assert_unchanged("print(\"a\", sep=\", \")\n");
}

// =============================================================================
// Fail-soft
// =============================================================================

#[test]
fn test_unterminated_literal_returns_input() {
    let source = "before = 1\nx = f\"open\nafter = 2\n";
    let (result, diagnostics) =
        transcode_with_diagnostics(source, TranscoderConfig::shared_default());
    assert_eq!(result.text, source);
    assert!(matches!(
        diagnostics.first().unwrap(),
        Diagnostic::UnterminatedLiteral { .. }
    ));
}

#[test]
fn test_never_panics_on_junk() {
    // Total function: any byte soup in, some text out
    for source in [
        "}{",
        "f\"",
        "def def def",
        "((((((",
        ")\n->:",
        "x = f\"{a{b}}\"",
        "\u{1F512} = f'{\u{1F511}}'\n",
    ] {
        let _ = transcode_str(source);
    }
}
