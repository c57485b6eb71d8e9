//! Rule to detect messages missing from a translation.
//!
//! # Rationale
//!
//! Every message of the reference language must be translated. A message
//! that exists in the reference resource but not in a target resource falls
//! back to the reference text, or to nothing, at runtime.
//!
//! The diagnostic is attached to the reference message, since the target
//! message does not exist.

use locale_lint_core::{
    async_trait, InitContext, Message, Resource, Rule, RuleError, Severity, Visit, VisitContext,
    VisitResult,
};
use tracing::debug;

/// Rule name for missing-message.
pub const NAME: &str = "missing-message";

/// Reports reference messages absent from a target resource.
#[derive(Debug, Clone)]
pub struct MissingMessage {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MissingMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl MissingMessage {
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
impl Rule for MissingMessage {
    /// Number of missing messages found.
    type State = usize;

    fn id(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Detects reference messages that are not translated"
    }

    async fn initialize(&self, _cx: &InitContext<'_>) -> Result<usize, RuleError> {
        Ok(0)
    }

    async fn teardown(&self, missing: usize) -> Result<(), RuleError> {
        debug!("{}: {} missing message(s)", NAME, missing);
        Ok(())
    }

    async fn enter_resource(
        &self,
        _missing: &mut usize,
        cx: &mut VisitContext<'_, Resource>,
    ) -> VisitResult {
        if cx.is_reference() {
            return Ok(Visit::Skip);
        }
        Ok(Visit::Continue)
    }

    async fn enter_message(
        &self,
        missing: &mut usize,
        cx: &mut VisitContext<'_, Message>,
    ) -> VisitResult {
        if let (None, Some(reference)) = (&cx.target, &cx.reference) {
            *missing += 1;
            cx.reporter.report(
                self.severity,
                reference,
                format!("Message with id '{}' missing", reference.id()),
            );
        }
        Ok(Visit::Skip)
    }
}
