//! Context types passed to rule hooks.

use crate::ast::NodeRef;
use crate::config::RuleConfig;
use crate::reporter::RuleReporter;

/// Context provided to [`Rule::initialize`](crate::Rule::initialize).
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    /// Language treated as the source of truth.
    pub reference_language: &'a str,
    /// Languages selected for the run (empty means all).
    pub languages: &'a [String],
    /// Configuration section of the rule, if present.
    pub options: Option<&'a RuleConfig>,
}

impl<'a> InitContext<'a> {
    /// Creates an init context without rule options.
    #[must_use]
    pub fn new(reference_language: &'a str, languages: &'a [String]) -> Self {
        Self {
            reference_language,
            languages,
            options: None,
        }
    }

    /// Sets the rule options.
    #[must_use]
    pub fn with_options(mut self, options: Option<&'a RuleConfig>) -> Self {
        self.options = options;
        self
    }
}

/// Context provided to every `enter`/`leave` visitor call.
///
/// `target` is the node from the tree under test and `reference` the node
/// at the same id path in the reference-language tree. Either may be absent,
/// including at the resource level when a selected language has no resource.
#[derive(Debug)]
pub struct VisitContext<'a, N> {
    /// Node from the tree under test.
    pub target: Option<NodeRef<'a, N>>,
    /// Matching node from the reference tree.
    pub reference: Option<NodeRef<'a, N>>,
    /// Language of the tree under test.
    pub language: &'a str,
    /// Language treated as the source of truth.
    pub reference_language: &'a str,
    /// Reporter bound to the visiting rule.
    pub reporter: RuleReporter<'a>,
}

impl<N> VisitContext<'_, N> {
    /// Returns true if the target and reference are the same tree, i.e.
    /// the reference language is being checked against itself.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.language == self.reference_language
    }
}
