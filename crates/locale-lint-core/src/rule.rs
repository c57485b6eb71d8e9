//! Rule traits for defining lint rules.

use crate::ast::{Message, NodeKind, Pattern, Resource};
use crate::context::{InitContext, VisitContext};
use async_trait::async_trait;
use std::any::Any;
use thiserror::Error;

/// Signal returned by an `enter` visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Keep visiting the children of this node.
    #[default]
    Continue,
    /// Do not visit the children of this node, nor call the paired `leave`,
    /// for this rule only.
    Skip,
}

/// Errors a rule hook can return.
///
/// Every variant is isolated by the engine and never aborts a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// The hook failed for a rule-specific reason.
    #[error("{0}")]
    Failed(String),

    /// A configured option has an unusable value.
    #[error("invalid option '{option}': {message}")]
    InvalidOption {
        /// Name of the option.
        option: String,
        /// What is wrong with it.
        message: String,
    },

    /// The hook panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// The state handed back to the rule is not the type it created.
    #[error("rule state has an unexpected type")]
    StateMismatch,
}

impl RuleError {
    /// Creates a [`RuleError::Failed`].
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result of an `enter` visitor.
pub type VisitResult = Result<Visit, RuleError>;

/// A lint rule visiting the localization AST.
///
/// A rule creates its per-run [`State`](Rule::State) in `initialize`, gets
/// it back mutably in every visitor, and receives it by value in
/// `teardown`. Visitors it does not override are no-ops: they never skip,
/// so children are still visited.
///
/// # Example
///
/// ```ignore
/// use locale_lint_core::{async_trait, InitContext, Message, Rule, RuleError, Visit, VisitContext, VisitResult};
///
/// pub struct NoTodo;
///
/// #[async_trait]
/// impl Rule for NoTodo {
///     type State = ();
///
///     fn id(&self) -> &'static str { "no-todo" }
///
///     async fn initialize(&self, _cx: &InitContext<'_>) -> Result<(), RuleError> {
///         Ok(())
///     }
///
///     async fn enter_message(&self, _state: &mut (), cx: &mut VisitContext<'_, Message>) -> VisitResult {
///         if let Some(target) = &cx.target {
///             if target.pattern.to_text().contains("TODO") {
///                 cx.reporter.report_warning(target, "unfinished translation");
///             }
///         }
///         Ok(Visit::Continue)
///     }
/// }
/// ```
#[async_trait]
pub trait Rule: Send + Sync {
    /// Per-run state created by `initialize`.
    type State: Send + 'static;

    /// Returns the kebab-case id of this rule (e.g., "missing-message").
    fn id(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Prepares the rule for a run.
    ///
    /// # Errors
    ///
    /// An error excludes the rule from the run.
    async fn initialize(&self, cx: &InitContext<'_>) -> Result<Self::State, RuleError>;

    /// Consumes the state after traversal.
    ///
    /// # Errors
    ///
    /// An error is recorded as a failure; other rules still tear down.
    async fn teardown(&self, _state: Self::State) -> Result<(), RuleError> {
        Ok(())
    }

    /// Called when a resource pairing is entered.
    ///
    /// # Errors
    ///
    /// An error suppresses descent and `leave` for this rule at this node.
    async fn enter_resource(
        &self,
        _state: &mut Self::State,
        _cx: &mut VisitContext<'_, Resource>,
    ) -> VisitResult {
        Ok(Visit::Continue)
    }

    /// Called when a resource pairing is left.
    ///
    /// # Errors
    ///
    /// An error is recorded as a failure.
    async fn leave_resource(
        &self,
        _state: &mut Self::State,
        _cx: &mut VisitContext<'_, Resource>,
    ) -> Result<(), RuleError> {
        Ok(())
    }

    /// Called when a message pairing is entered.
    ///
    /// # Errors
    ///
    /// An error suppresses descent and `leave` for this rule at this node.
    async fn enter_message(
        &self,
        _state: &mut Self::State,
        _cx: &mut VisitContext<'_, Message>,
    ) -> VisitResult {
        Ok(Visit::Continue)
    }

    /// Called when a message pairing is left.
    ///
    /// # Errors
    ///
    /// An error is recorded as a failure.
    async fn leave_message(
        &self,
        _state: &mut Self::State,
        _cx: &mut VisitContext<'_, Message>,
    ) -> Result<(), RuleError> {
        Ok(())
    }

    /// Called when a pattern pairing is entered.
    ///
    /// # Errors
    ///
    /// An error suppresses `leave` for this rule at this node.
    async fn enter_pattern(
        &self,
        _state: &mut Self::State,
        _cx: &mut VisitContext<'_, Pattern>,
    ) -> VisitResult {
        Ok(Visit::Continue)
    }

    /// Called when a pattern pairing is left.
    ///
    /// # Errors
    ///
    /// An error is recorded as a failure.
    async fn leave_pattern(
        &self,
        _state: &mut Self::State,
        _cx: &mut VisitContext<'_, Pattern>,
    ) -> Result<(), RuleError> {
        Ok(())
    }
}

/// Type-erased rule state.
pub type RuleState = Box<dyn Any + Send>;

/// A visitor context for any node kind.
#[derive(Debug)]
pub enum NodeContext<'c, 'a> {
    /// Visiting a resource.
    Resource(&'c mut VisitContext<'a, Resource>),
    /// Visiting a message.
    Message(&'c mut VisitContext<'a, Message>),
    /// Visiting a pattern.
    Pattern(&'c mut VisitContext<'a, Pattern>),
}

impl NodeContext<'_, '_> {
    /// Returns the kind of node being visited.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Resource(_) => NodeKind::Resource,
            Self::Message(_) => NodeKind::Message,
            Self::Pattern(_) => NodeKind::Pattern,
        }
    }
}

/// Object-safe form of [`Rule`], implemented for every rule.
///
/// The linter stores rules as [`RuleBox`] and dispatches through this trait.
#[async_trait]
pub trait DynRule: Send + Sync {
    /// See [`Rule::id`].
    fn id(&self) -> &'static str;

    /// See [`Rule::description`].
    fn description(&self) -> &'static str;

    /// See [`Rule::initialize`].
    ///
    /// # Errors
    ///
    /// Propagates the rule's error.
    async fn initialize(&self, cx: &InitContext<'_>) -> Result<RuleState, RuleError>;

    /// See [`Rule::teardown`].
    ///
    /// # Errors
    ///
    /// Propagates the rule's error, or [`RuleError::StateMismatch`].
    async fn teardown(&self, state: RuleState) -> Result<(), RuleError>;

    /// Dispatches to the `enter_*` visitor for the node kind.
    ///
    /// # Errors
    ///
    /// Propagates the rule's error, or [`RuleError::StateMismatch`].
    async fn enter(&self, state: &mut RuleState, cx: NodeContext<'_, '_>) -> VisitResult;

    /// Dispatches to the `leave_*` visitor for the node kind.
    ///
    /// # Errors
    ///
    /// Propagates the rule's error, or [`RuleError::StateMismatch`].
    async fn leave(&self, state: &mut RuleState, cx: NodeContext<'_, '_>)
        -> Result<(), RuleError>;
}

#[async_trait]
impl<R: Rule> DynRule for R {
    fn id(&self) -> &'static str {
        Rule::id(self)
    }

    fn description(&self) -> &'static str {
        Rule::description(self)
    }

    async fn initialize(&self, cx: &InitContext<'_>) -> Result<RuleState, RuleError> {
        let state = Rule::initialize(self, cx).await?;
        Ok(Box::new(state))
    }

    async fn teardown(&self, state: RuleState) -> Result<(), RuleError> {
        let state = state
            .downcast::<R::State>()
            .map_err(|_| RuleError::StateMismatch)?;
        Rule::teardown(self, *state).await
    }

    async fn enter(&self, state: &mut RuleState, cx: NodeContext<'_, '_>) -> VisitResult {
        let state = state
            .downcast_mut::<R::State>()
            .ok_or(RuleError::StateMismatch)?;
        match cx {
            NodeContext::Resource(cx) => self.enter_resource(state, cx).await,
            NodeContext::Message(cx) => self.enter_message(state, cx).await,
            NodeContext::Pattern(cx) => self.enter_pattern(state, cx).await,
        }
    }

    async fn leave(
        &self,
        state: &mut RuleState,
        cx: NodeContext<'_, '_>,
    ) -> Result<(), RuleError> {
        let state = state
            .downcast_mut::<R::State>()
            .ok_or(RuleError::StateMismatch)?;
        match cx {
            NodeContext::Resource(cx) => self.leave_resource(state, cx).await,
            NodeContext::Message(cx) => self.leave_message(state, cx).await,
            NodeContext::Pattern(cx) => self.leave_pattern(state, cx).await,
        }
    }
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn DynRule>;
