//! Diagnostic collection for a lint run.

use crate::ast::{lint_list_mut, NodeKey, NodeRef, Resource};
use crate::types::{Diagnostic, Severity};
use std::collections::HashMap;
use tracing::warn;

/// Anything a diagnostic can be attached to.
pub trait Reportable {
    /// Returns the key of the node to annotate.
    fn node_key(&self) -> &NodeKey;
}

impl<N> Reportable for NodeRef<'_, N> {
    fn node_key(&self) -> &NodeKey {
        self.key()
    }
}

impl Reportable for NodeKey {
    fn node_key(&self) -> &NodeKey {
        self
    }
}

/// Run-scoped diagnostic sink.
///
/// Rules never hold the reporter itself; each hook call receives a
/// [`RuleReporter`] borrowed from it.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    overrides: HashMap<String, Severity>,
}

impl Reporter {
    /// Creates a reporter applying per-rule severity `overrides`.
    #[must_use]
    pub(crate) fn new(overrides: HashMap<String, Severity>) -> Self {
        Self {
            diagnostics: Vec::new(),
            overrides,
        }
    }

    /// Returns a handle that reports on behalf of `rule`.
    pub(crate) fn scoped(&mut self, rule: &'static str) -> RuleReporter<'_> {
        RuleReporter {
            rule,
            severity_override: self.overrides.get(rule).copied(),
            sink: &mut self.diagnostics,
        }
    }

    /// Returns the collected diagnostics in report order.
    #[must_use]
    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Reporter handle bound to a single rule for one hook call.
#[derive(Debug)]
pub struct RuleReporter<'r> {
    rule: &'static str,
    severity_override: Option<Severity>,
    sink: &'r mut Vec<Diagnostic>,
}

impl RuleReporter<'_> {
    /// Reports an error on `node`.
    pub fn report_error(&mut self, node: &impl Reportable, message: impl Into<String>) {
        self.report(Severity::Error, node, message);
    }

    /// Reports a warning on `node`.
    pub fn report_warning(&mut self, node: &impl Reportable, message: impl Into<String>) {
        self.report(Severity::Warning, node, message);
    }

    /// Reports a diagnostic with an explicit severity.
    ///
    /// A severity override configured for the rule takes precedence.
    pub fn report(
        &mut self,
        severity: Severity,
        node: &impl Reportable,
        message: impl Into<String>,
    ) {
        let severity = self.severity_override.unwrap_or(severity);
        self.sink.push(Diagnostic::new(
            self.rule,
            severity,
            node.node_key().clone(),
            message,
        ));
    }

    /// Returns the id of the rule this handle reports for.
    #[must_use]
    pub fn rule(&self) -> &'static str {
        self.rule
    }
}

/// Attaches every diagnostic to the `lint` list of its node in `resources`.
pub(crate) fn annotate(resources: &mut [Resource], diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match lint_list_mut(resources, &diagnostic.node) {
            Some(lint) => lint.push(diagnostic.to_report()),
            None => warn!(
                "Rule {} reported on unknown node {}",
                diagnostic.rule, diagnostic.node
            ),
        }
    }
}
