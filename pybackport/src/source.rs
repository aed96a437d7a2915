//! Source units flowing through the transcoding pipeline.

use serde::{Deserialize, Serialize};

/// Script dialect tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// Modern dialect, as emitted by the text generator
    Modern,
    /// Restricted dialect accepted by the embedded host interpreter
    Legacy,
}

/// Immutable text buffer plus source/target dialect tags.
///
/// A unit is never mutated; each pipeline stage produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    text: String,
    source_dialect: Dialect,
    target_dialect: Dialect,
}

impl SourceUnit {
    /// Create a unit holding modern-dialect text to be transcoded to legacy
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_dialect: Dialect::Modern,
            target_dialect: Dialect::Legacy,
        }
    }

    /// Create a unit with explicit dialect tags
    pub fn with_dialects(text: impl Into<String>, source: Dialect, target: Dialect) -> Self {
        Self {
            text: text.into(),
            source_dialect: source,
            target_dialect: target,
        }
    }

    /// The unit's text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Dialect the text is written in
    pub fn source_dialect(&self) -> Dialect {
        self.source_dialect
    }

    /// Dialect the text is to be transcoded to
    pub fn target_dialect(&self) -> Dialect {
        self.target_dialect
    }

    /// Consume the unit, returning its text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Build the successor unit holding transcoded text.
    /// The new unit's text is already in the target dialect.
    pub(crate) fn transcoded(&self, text: String) -> Self {
        Self {
            text,
            source_dialect: self.target_dialect,
            target_dialect: self.target_dialect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialects() {
        let unit = SourceUnit::new("x = 1");
        assert_eq!(unit.source_dialect(), Dialect::Modern);
        assert_eq!(unit.target_dialect(), Dialect::Legacy);
        assert_eq!(unit.text(), "x = 1");
    }

    #[test]
    fn test_transcoded_tags() {
        let unit = SourceUnit::new("x = 1");
        let next = unit.transcoded("x = 1".to_string());
        assert_eq!(next.source_dialect(), Dialect::Legacy);
        assert_eq!(next.target_dialect(), Dialect::Legacy);
    }
}
