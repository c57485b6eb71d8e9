//! Rule presets for common configurations.

use crate::{AdditionalMessage, EmptyPattern, MissingMessage, UntranslatedMessage};
use locale_lint_core::RuleBox;

/// Preset configurations for locale-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Key consistency between languages.
    Recommended,
    /// Every built-in rule.
    Strict,
    /// Missing translations only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Looks up a preset by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `missing-message` - Reference messages absent from a translation
/// - `additional-message` - Translated messages absent from the reference
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MissingMessage::new()),
        Box::new(AdditionalMessage::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Includes all recommended rules plus:
/// - `empty-pattern` - Blank message texts
/// - `untranslated-message` - Texts copied verbatim from the reference
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MissingMessage::new()),
        Box::new(AdditionalMessage::new()),
        Box::new(EmptyPattern::new()),
        Box::new(UntranslatedMessage::new()),
    ]
}

/// Returns the minimal set of rules.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![Box::new(MissingMessage::new())]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    strict_rules()
}
