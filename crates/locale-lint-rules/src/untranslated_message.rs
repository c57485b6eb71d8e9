//! Rule to detect translations identical to the reference text.
//!
//! # Rationale
//!
//! A translated pattern equal to the reference pattern was most likely
//! copied over and never translated.
//!
//! # Configuration
//!
//! - `min_length`: Ignore texts shorter than this many characters (default: 1)
//! - `ignore`: Texts that are legitimately identical across languages,
//!   e.g. brand names (default: empty)

use locale_lint_core::{
    async_trait, InitContext, Pattern, Resource, Rule, RuleError, Severity, Visit, VisitContext,
    VisitResult,
};
use std::collections::HashSet;

/// Rule name for untranslated-message.
pub const NAME: &str = "untranslated-message";

/// Reports target patterns identical to their reference pattern.
#[derive(Debug, Clone)]
pub struct UntranslatedMessage {
    /// Minimum text length, in characters, to check.
    pub min_length: usize,
    /// Texts that are never reported.
    pub ignore: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UntranslatedMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl UntranslatedMessage {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: 1,
            ignore: Vec::new(),
            severity: Severity::Warning,
        }
    }

    /// Sets the minimum text length to check.
    #[must_use]
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Adds texts that are never reported.
    #[must_use]
    pub fn ignore<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Effective settings for one run, merged from the rule and its config.
#[derive(Debug)]
pub struct Settings {
    min_length: usize,
    ignore: HashSet<String>,
}

#[async_trait]
impl Rule for UntranslatedMessage {
    type State = Settings;

    fn id(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects translations identical to the reference text"
    }

    async fn initialize(&self, cx: &InitContext<'_>) -> Result<Settings, RuleError> {
        let mut settings = Settings {
            min_length: self.min_length,
            ignore: self.ignore.iter().cloned().collect(),
        };

        if let Some(options) = cx.options {
            let default = i64::try_from(self.min_length).unwrap_or(i64::MAX);
            let min_length = options.get_int("min_length", default);
            settings.min_length =
                usize::try_from(min_length).map_err(|_| RuleError::InvalidOption {
                    option: "min_length".to_string(),
                    message: format!("expected a non-negative integer, got {min_length}"),
                })?;
            settings.ignore.extend(options.get_str_array("ignore"));
        }

        Ok(settings)
    }

    async fn enter_resource(
        &self,
        _settings: &mut Settings,
        cx: &mut VisitContext<'_, Resource>,
    ) -> VisitResult {
        if cx.is_reference() {
            return Ok(Visit::Skip);
        }
        Ok(Visit::Continue)
    }

    async fn enter_pattern(
        &self,
        settings: &mut Settings,
        cx: &mut VisitContext<'_, Pattern>,
    ) -> VisitResult {
        let (Some(target), Some(reference)) = (&cx.target, &cx.reference) else {
            return Ok(Visit::Skip);
        };
        if target.elements != reference.elements {
            return Ok(Visit::Skip);
        }

        let text = target.to_text();
        let checked = text.chars().count() >= settings.min_length
            && text.chars().any(char::is_alphabetic)
            && !settings.ignore.contains(text.trim());
        if checked {
            cx.reporter.report(
                self.severity,
                target,
                format!("Translation is identical to the reference: '{text}'"),
            );
        }
        Ok(Visit::Skip)
    }
}
