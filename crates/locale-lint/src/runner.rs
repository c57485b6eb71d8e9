//! Config-driven lint runs.

use locale_lint_core::{Config, LintError, LintOutcome, Linter, Resource};
use locale_lint_rules::Preset;
use thiserror::Error;
use tracing::debug;

/// Preset used when the configuration names none.
const DEFAULT_PRESET: &str = "recommended";

/// Errors raised by [`run`].
#[derive(Debug, Error)]
pub enum RunError {
    /// The configured preset does not exist.
    #[error("Unknown preset `{0}`. Valid presets: recommended, strict, minimal")]
    UnknownPreset(String),

    /// The linter could not be built or failed fatally.
    #[error(transparent)]
    Lint(#[from] LintError),
}

/// Lints `resources` with the rules of the configured preset.
///
/// The preset defaults to `recommended`. Rule severities, options and
/// enablement, the reference language and the language selection all
/// come from `config`.
///
/// # Errors
///
/// Returns an error if the preset is unknown, no reference language is
/// configured, or the input has duplicate languages.
pub async fn run(config: &Config, resources: &[Resource]) -> Result<LintOutcome, RunError> {
    let preset = resolve_preset(config)?;
    debug!("Running preset {:?}", preset);

    let mut builder = Linter::builder().config(config.clone());
    for rule in preset.rules() {
        builder = builder.rule_box(rule);
    }

    let linter = builder.build()?;
    Ok(linter.lint(resources).await?)
}

/// Returns true if `outcome` has a diagnostic at or above the configured
/// `fail_on` severity.
#[must_use]
pub fn exceeds_fail_on(outcome: &LintOutcome, config: &Config) -> bool {
    outcome.has_diagnostics_at(config.fail_on())
}

/// Resolves the effective preset from config > default.
fn resolve_preset(config: &Config) -> Result<Preset, RunError> {
    let name = config.preset.as_deref().unwrap_or(DEFAULT_PRESET);
    Preset::from_name(name).ok_or_else(|| RunError::UnknownPreset(name.to_string()))
}
