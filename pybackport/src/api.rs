//! Rust API for transcoding script text.
//!
//! This module provides ergonomic functions for programmatic use.

use crate::config::TranscoderConfig;
use crate::diagnostics::Diagnostics;
use crate::pipeline::{self, RewriteResult};
use crate::source::SourceUnit;

/// Transcode modern-dialect source (Rust string API).
///
/// Total and never panics: on any internal ambiguity the most conservative
/// rewrite is returned, up to the original text unchanged for the affected
/// span.
pub fn transcode_str(src: &str) -> String {
    pipeline::run(src, TranscoderConfig::shared_default()).0.text
}

/// Transcode with an explicit configuration.
pub fn transcode_str_with_config(src: &str, config: &TranscoderConfig) -> String {
    pipeline::run(src, config).0.text
}

/// Transcode, returning the full rewrite result and the conditions the
/// pipeline recovered from.
pub fn transcode_with_diagnostics(
    src: &str,
    config: &TranscoderConfig,
) -> (RewriteResult, Diagnostics) {
    pipeline::run(src, config)
}

/// Transcode a source unit into its target dialect.
pub fn transcode(unit: &SourceUnit) -> SourceUnit {
    let (result, _) = pipeline::run(unit.text(), TranscoderConfig::shared_default());
    unit.transcoded(result.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Dialect;

    #[test]
    fn test_transcode_str() {
        assert_eq!(
            transcode_str("print(f\"hi {name}\")\n"),
            "print \"hi {0}\".format(name)\n"
        );
    }

    #[test]
    fn test_transcode_str_total_on_bad_input() {
        let source = "x = \"open";
        assert_eq!(transcode_str(source), source);
    }

    #[test]
    fn test_transcode_unit() {
        let unit = SourceUnit::new("v: int = f\"{n}\"\n");
        let out = transcode(&unit);
        assert_eq!(out.text(), "v = \"{0}\".format(n)\n");
        assert_eq!(out.source_dialect(), Dialect::Legacy);
    }

    #[test]
    fn test_custom_routine() {
        let config = TranscoderConfig {
            statement_routines: vec!["emit".to_string()],
            ..TranscoderConfig::default()
        };
        assert_eq!(
            transcode_str_with_config("emit(\"x\")\n", &config),
            "emit \"x\"\n"
        );
        // `print` is no longer designated
        assert_eq!(
            transcode_str_with_config("print(\"x\")\n", &config),
            "print(\"x\")\n"
        );
    }
}
