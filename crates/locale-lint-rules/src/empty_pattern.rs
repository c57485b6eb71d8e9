//! Rule to detect messages whose pattern renders nothing.
//!
//! # Rationale
//!
//! A message with no elements, or with whitespace-only text, shows up as a
//! blank label in the UI. Unlike the key rules this also checks the
//! reference language, since an empty source text is just as broken.

use locale_lint_core::{
    async_trait, InitContext, Message, Rule, RuleError, Severity, Visit, VisitContext, VisitResult,
};

/// Rule name for empty-pattern.
pub const NAME: &str = "empty-pattern";

/// Reports messages with a blank pattern.
#[derive(Debug, Clone)]
pub struct EmptyPattern {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for EmptyPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyPattern {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

#[async_trait]
impl Rule for EmptyPattern {
    type State = ();

    fn id(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects messages with an empty translation"
    }

    async fn initialize(&self, _cx: &InitContext<'_>) -> Result<(), RuleError> {
        Ok(())
    }

    async fn enter_message(&self, _state: &mut (), cx: &mut VisitContext<'_, Message>) -> VisitResult {
        if let Some(target) = &cx.target {
            if target.pattern.is_blank() {
                cx.reporter.report(
                    self.severity,
                    &target.pattern(),
                    format!("Message with id '{}' has an empty pattern", target.id()),
                );
            }
        }
        Ok(Visit::Skip)
    }
}
