//! # locale-lint
//!
//! Tree-visitor linter for localization resources.
//!
//! This is the facade crate that re-exports the core framework and the
//! built-in rules, plus a config-driven [`run`] entry point.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use locale_lint::{run, exceeds_fail_on, Config};
//!
//! let config = Config::from_file(Path::new("locale-lint.toml"))?;
//! let outcome = run(&config, &resources).await?;
//! for diagnostic in &outcome.diagnostics {
//!     println!("{diagnostic}");
//! }
//! if exceeds_fail_on(&outcome, &config) {
//!     std::process::exit(1);
//! }
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use locale_lint::Linter;
//! use locale_lint::rules::Preset;
//!
//! let mut builder = Linter::builder().reference_language("en");
//! for rule in Preset::Strict.rules() {
//!     builder = builder.rule_box(rule);
//! }
//! let outcome = builder.build()?.lint(&resources).await?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use locale_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use locale_lint_rules::*;
}

mod runner;

pub use runner::{exceeds_fail_on, run, RunError};
