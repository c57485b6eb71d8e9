//! Core types for diagnostics and lint outcomes.

use crate::ast::{NodeKey, Resource};
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Annotation attached to the `lint` list of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// Id of the rule that reported it.
    pub rule: String,
    /// Severity of the report.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl LintReport {
    /// Creates a new report.
    #[must_use]
    pub fn new(rule: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            severity,
            message: message.into(),
        }
    }
}

/// A rule finding bound to the node it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Id of the rule that reported it.
    pub rule: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// The node the finding is attached to.
    pub node: NodeKey,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        node: NodeKey,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            node,
            message: message.into(),
        }
    }

    /// Converts this diagnostic into the annotation stored on its node.
    #[must_use]
    pub fn to_report(&self) -> LintReport {
        LintReport::new(self.rule.clone(), self.severity, self.message.clone())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.node, self.severity, self.rule, self.message
        )
    }
}

/// Where in the rule lifecycle a failure happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "lowercase")]
pub enum FailureStage {
    /// `initialize` failed; the rule was excluded from the run.
    Initialize,
    /// An `enter` visitor failed at `node`.
    Enter {
        /// The node being entered.
        node: NodeKey,
    },
    /// A `leave` visitor failed at `node`.
    Leave {
        /// The node being left.
        node: NodeKey,
    },
    /// `teardown` failed.
    Teardown,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialize => write!(f, "initialize"),
            Self::Enter { node } => write!(f, "enter {} {node}", node.kind()),
            Self::Leave { node } => write!(f, "leave {} {node}", node.kind()),
            Self::Teardown => write!(f, "teardown"),
        }
    }
}

/// An isolated rule failure, reported as an engine-level warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    /// Id of the failing rule.
    pub rule: String,
    /// Lifecycle stage of the failure.
    pub stage: FailureStage,
    /// Description of the cause.
    pub message: String,
}

impl RuleFailure {
    /// Severity of every engine-level failure.
    pub const SEVERITY: Severity = Severity::Warning;
}

impl std::fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: rule '{}' failed during {}: {}",
            Self::SEVERITY,
            self.rule,
            self.stage,
            self.message
        )
    }
}

/// Result of a lint run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintOutcome {
    /// Annotated copy of the input resources.
    pub resources: Vec<Resource>,
    /// Rule diagnostics in report order.
    pub diagnostics: Vec<Diagnostic>,
    /// Rule failures isolated by the engine.
    pub failures: Vec<RuleFailure>,
}

impl LintOutcome {
    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= Severity::Warning)
    }

    /// Checks if any diagnostic meets or exceeds the given severity.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Returns diagnostics filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Counts diagnostics as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        (errors, self.diagnostics.len() - errors)
    }

    /// Returns the diagnostics attached to `node`.
    #[must_use]
    pub fn diagnostics_for(&self, node: &NodeKey) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| &d.node == node).collect()
    }

    /// Returns the annotated resource for `language`.
    #[must_use]
    pub fn resource(&self, language: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.language() == language)
    }
}
