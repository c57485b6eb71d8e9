//! # locale-lint-core
//!
//! Core framework for linting localization resources.
//!
//! This crate provides the AST, the rule contract and the engine that runs
//! rules over it. It includes:
//!
//! - [`Resource`], [`Message`] and [`Pattern`], the three node kinds
//! - [`Rule`] trait with per-kind `enter`/`leave` visitors
//! - [`Linter`] for orchestrating a lint run
//! - [`Diagnostic`] for representing lint findings
//!
//! Every run works on a copy of the input. Diagnostics are attached to the
//! copy's nodes, and a rule that errors or panics is isolated from the
//! others.
//!
//! ## Example
//!
//! ```ignore
//! use locale_lint_core::Linter;
//!
//! let linter = Linter::builder()
//!     .reference_language("en")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let outcome = linter.lint(&resources).await?;
//! for diagnostic in &outcome.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod config;
mod context;
mod linter;
mod reporter;
mod rule;
mod store;
mod traversal;
mod types;

pub use ast::{
    Identifier, LanguageTag, Message, NodeKey, NodeKind, NodeRef, Pattern, PatternElement,
    Resource,
};
pub use config::{Config, ConfigError, LinterConfig, RuleConfig};
pub use context::{InitContext, VisitContext};
pub use linter::{LintError, Linter, LinterBuilder};
pub use reporter::{Reportable, RuleReporter};
pub use rule::{DynRule, NodeContext, Rule, RuleBox, RuleError, RuleState, Visit, VisitResult};
pub use store::{InMemoryStore, ResourceStore, StoreError};
pub use types::{Diagnostic, FailureStage, LintOutcome, LintReport, RuleFailure, Severity};

/// Re-exported for rule implementations.
pub use async_trait::async_trait;
