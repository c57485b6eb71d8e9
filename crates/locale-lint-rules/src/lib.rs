//! # locale-lint-rules
//!
//! Built-in lint rules for locale-lint.
//!
//! ## Available Rules
//!
//! | Name | Default severity | Description |
//! |------|------------------|-------------|
//! | `missing-message` | error | Reference messages absent from a translation |
//! | `additional-message` | error | Translated messages absent from the reference |
//! | `empty-pattern` | warning | Messages whose text is blank |
//! | `untranslated-message` | warning | Translations identical to the reference text |
//!
//! ## Usage
//!
//! ```ignore
//! use locale_lint_core::Linter;
//! use locale_lint_rules::{AdditionalMessage, MissingMessage};
//!
//! let linter = Linter::builder()
//!     .reference_language("en")
//!     .rule(MissingMessage::new())
//!     .rule(AdditionalMessage::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod additional_message;
pub mod empty_pattern;
pub mod missing_message;
mod presets;
pub mod untranslated_message;

pub use additional_message::AdditionalMessage;
pub use empty_pattern::EmptyPattern;
pub use missing_message::MissingMessage;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};
pub use untranslated_message::UntranslatedMessage;
