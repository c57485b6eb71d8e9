//! Rule to detect translated messages unknown to the reference language.
//!
//! # Rationale
//!
//! A message present in a translation but absent from the reference is
//! usually left over from a renamed or deleted key and is never displayed.

use locale_lint_core::{
    async_trait, InitContext, Message, Resource, Rule, RuleError, Severity, Visit, VisitContext,
    VisitResult,
};
use tracing::debug;

/// Rule name for additional-message.
pub const NAME: &str = "additional-message";

/// Reports target messages absent from the reference resource.
#[derive(Debug, Clone)]
pub struct AdditionalMessage {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for AdditionalMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl AdditionalMessage {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
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
impl Rule for AdditionalMessage {
    type State = usize;

    fn id(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects translated messages missing in the reference language"
    }

    async fn initialize(&self, _cx: &InitContext<'_>) -> Result<usize, RuleError> {
        Ok(0)
    }

    async fn teardown(&self, additional: usize) -> Result<(), RuleError> {
        debug!("{}: {} additional message(s)", NAME, additional);
        Ok(())
    }

    async fn enter_resource(
        &self,
        _additional: &mut usize,
        cx: &mut VisitContext<'_, Resource>,
    ) -> VisitResult {
        if cx.is_reference() {
            return Ok(Visit::Skip);
        }
        Ok(Visit::Continue)
    }

    async fn enter_message(
        &self,
        additional: &mut usize,
        cx: &mut VisitContext<'_, Message>,
    ) -> VisitResult {
        if let (Some(target), None) = (&cx.target, &cx.reference) {
            *additional += 1;
            cx.reporter.report(
                self.severity,
                target,
                format!(
                    "Message with id '{}' is specified, but missing in the reference",
                    target.id()
                ),
            );
        }
        Ok(Visit::Skip)
    }
}
