//! Lint orchestration: initialize, traverse, tear down.

use crate::ast::Resource;
use crate::config::Config;
use crate::context::InitContext;
use crate::reporter::{annotate, Reporter};
use crate::rule::{Rule, RuleBox};
use crate::store::{ResourceStore, StoreError};
use crate::traversal::{guarded, record_failure, RuleSlot, Traversal};
use crate::types::{FailureStage, LintOutcome};

use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Fatal errors, raised before any rule runs.
#[derive(Debug, Error)]
pub enum LintError {
    /// No reference language was configured.
    #[error("No reference language configured")]
    MissingReferenceLanguage,

    /// Two configured rules share an id.
    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),

    /// Two input resources share a language tag.
    #[error("Duplicate resource for language: {0}")]
    DuplicateLanguage(String),

    /// Two messages of one resource share an id.
    #[error("Duplicate message id '{id}' in language {language}")]
    DuplicateMessage {
        /// Language of the resource.
        language: String,
        /// The repeated id.
        id: String,
    },

    /// Resources could not be read from the store.
    #[error("Failed to read resources: {0}")]
    Store(#[from] StoreError),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    reference_language: Option<String>,
    languages: Vec<String>,
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reference language.
    #[must_use]
    pub fn reference_language(mut self, language: impl Into<String>) -> Self {
        self.reference_language = Some(language.into());
        self
    }

    /// Restricts linting to the given languages.
    #[must_use]
    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages.extend(languages.into_iter().map(Into::into));
        self
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the linter.
    ///
    /// Rules disabled in the configuration are dropped here.
    ///
    /// # Errors
    ///
    /// Returns an error if no reference language is set or two rules share
    /// an id.
    pub fn build(self) -> Result<Linter, LintError> {
        let config = self.config.unwrap_or_default();

        let reference_language = self
            .reference_language
            .or_else(|| config.linter.reference_language.clone())
            .filter(|l| !l.is_empty())
            .ok_or(LintError::MissingReferenceLanguage)?;

        let mut languages = self.languages;
        if languages.is_empty() {
            languages.clone_from(&config.linter.languages);
        }
        let mut selected = HashSet::new();
        languages.retain(|l| selected.insert(l.clone()));

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            if !seen.insert(rule.id()) {
                return Err(LintError::DuplicateRule(rule.id().to_string()));
            }
            if config.is_rule_enabled(rule.id()) {
                rules.push(rule);
            } else {
                debug!("Skipping disabled rule: {}", rule.id());
            }
        }

        Ok(Linter {
            reference_language,
            languages,
            rules,
            config,
        })
    }
}

/// The linter that orchestrates rule execution over resources.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    reference_language: String,
    languages: Vec<String>,
    rules: Vec<RuleBox>,
    config: Config,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the reference language.
    #[must_use]
    pub fn reference_language(&self) -> &str {
        &self.reference_language
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the ids of the registered rules, in run order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Lints `resources` and returns an annotated copy plus diagnostics.
    ///
    /// `resources` is never modified. Rule failures are isolated and
    /// reported in [`LintOutcome::failures`].
    ///
    /// # Errors
    ///
    /// Returns an error if two resources share a language tag, or two
    /// messages of one resource share an id.
    pub async fn lint(&self, resources: &[Resource]) -> Result<LintOutcome, LintError> {
        check_unique_nodes(resources)?;

        let mut copy = resources.to_vec();
        if self.rules.is_empty() {
            debug!("No rules configured, skipping lint");
            return Ok(LintOutcome {
                resources: copy,
                ..LintOutcome::default()
            });
        }

        info!(
            "Linting {} resources with {} rules (reference: {})",
            resources.len(),
            self.rules.len(),
            self.reference_language
        );

        let mut reporter = Reporter::new(self.config.severity_overrides());
        let mut failures = Vec::new();
        let mut slots = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let cx = InitContext::new(&self.reference_language, &self.languages)
                .with_options(self.config.rules.get(rule.id()));
            match guarded(rule.initialize(&cx)).await {
                Ok(state) => slots.push(RuleSlot {
                    rule: rule.as_ref(),
                    state,
                }),
                Err(error) => {
                    record_failure(&mut failures, rule.id(), FailureStage::Initialize, &error);
                }
            }
        }

        {
            let reference = copy
                .iter()
                .find(|r| r.language() == self.reference_language);
            if reference.is_none() {
                debug!(
                    "No resource for reference language {}",
                    self.reference_language
                );
            }

            let mut traversal = Traversal::new(
                &mut slots,
                &mut reporter,
                &mut failures,
                &self.reference_language,
            );
            for (language, target) in self.targets(&copy) {
                if target.is_none() {
                    debug!("No resource for language {}", language);
                }
                traversal.run_resource(language, target, reference).await;
            }
        }

        for slot in slots {
            let rule = slot.rule.id();
            if let Err(error) = guarded(slot.rule.teardown(slot.state)).await {
                record_failure(&mut failures, rule, FailureStage::Teardown, &error);
            }
        }

        // Visitors saw the copy without annotations.
        let diagnostics = reporter.into_diagnostics();
        annotate(&mut copy, &diagnostics);

        info!(
            "Lint complete: {} diagnostics, {} rule failures",
            diagnostics.len(),
            failures.len()
        );

        Ok(LintOutcome {
            resources: copy,
            diagnostics,
            failures,
        })
    }

    /// Reads resources from `store` and lints them.
    ///
    /// The store is never written to.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or [`Linter::lint`] does.
    pub async fn lint_store<S>(&self, store: &S) -> Result<LintOutcome, LintError>
    where
        S: ResourceStore + ?Sized,
    {
        let resources = store.read_resources().await?;
        self.lint(&resources).await
    }

    /// Returns the languages to traverse with their resource, if any.
    ///
    /// Without a language selection every resource is traversed. With one,
    /// every selected language is traversed, even without a resource.
    fn targets<'a>(
        &'a self,
        resources: &'a [Resource],
    ) -> Vec<(&'a str, Option<&'a Resource>)> {
        if self.languages.is_empty() {
            return resources.iter().map(|r| (r.language(), Some(r))).collect();
        }
        self.languages
            .iter()
            .map(|l| {
                let resource = resources.iter().find(|r| r.language() == l.as_str());
                (l.as_str(), resource)
            })
            .collect()
    }
}

fn check_unique_nodes(resources: &[Resource]) -> Result<(), LintError> {
    let mut languages = HashSet::new();
    for resource in resources {
        if !languages.insert(resource.language()) {
            return Err(LintError::DuplicateLanguage(resource.language().to_string()));
        }
        let mut ids = HashSet::new();
        for message in &resource.body {
            if !ids.insert(message.id()) {
                return Err(LintError::DuplicateMessage {
                    language: resource.language().to_string(),
                    id: message.id().to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Message, Pattern};
    use crate::rule::RuleError;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Rule for Named {
        type State = ();

        fn id(&self) -> &'static str {
            self.0
        }

        async fn initialize(&self, _cx: &InitContext<'_>) -> Result<(), RuleError> {
            Ok(())
        }
    }

    #[test]
    fn test_builder() {
        let linter = Linter::builder()
            .reference_language("en")
            .rule(Named("a"))
            .rule(Named("b"))
            .build()
            .expect("Failed to build linter");

        assert_eq!(linter.reference_language(), "en");
        assert_eq!(linter.rule_ids(), vec!["a", "b"]);
    }

    #[test]
    fn reference_language_from_config() {
        let config = Config::parse("[linter]\nreference_language = \"fr\"").unwrap();
        let linter = Linter::builder().config(config).build().unwrap();
        assert_eq!(linter.reference_language(), "fr");
    }

    #[test]
    fn missing_reference_language_is_fatal() {
        let result = Linter::builder().rule(Named("a")).build();
        assert!(matches!(result, Err(LintError::MissingReferenceLanguage)));
    }

    #[test]
    fn duplicate_rule_is_fatal() {
        let result = Linter::builder()
            .reference_language("en")
            .rule(Named("a"))
            .rule(Named("a"))
            .build();
        assert!(matches!(result, Err(LintError::DuplicateRule(id)) if id == "a"));
    }

    #[test]
    fn disabled_rules_are_dropped() {
        let config = Config::parse("[rules.b]\nenabled = false").unwrap();
        let linter = Linter::builder()
            .reference_language("en")
            .config(config)
            .rule(Named("a"))
            .rule(Named("b"))
            .build()
            .unwrap();
        assert_eq!(linter.rule_ids(), vec!["a"]);
    }

    #[tokio::test]
    async fn duplicate_language_is_fatal() {
        let linter = Linter::builder()
            .reference_language("en")
            .rule(Named("a"))
            .build()
            .unwrap();
        let resources = vec![
            Resource::new("en", vec![Message::new("x", Pattern::text("x"))]),
            Resource::new("en", vec![]),
        ];
        let result = linter.lint(&resources).await;
        assert!(matches!(result, Err(LintError::DuplicateLanguage(l)) if l == "en"));
    }

    #[tokio::test]
    async fn duplicate_message_is_fatal() {
        let linter = Linter::builder()
            .reference_language("en")
            .rule(Named("a"))
            .build()
            .unwrap();
        let resources = vec![
            Resource::new("en", vec![Message::new("x", Pattern::text("x"))]),
            Resource::new(
                "de",
                vec![
                    Message::new("x", Pattern::text("eins")),
                    Message::new("x", Pattern::text("zwei")),
                ],
            ),
        ];
        let result = linter.lint(&resources).await;
        assert!(matches!(
            result,
            Err(LintError::DuplicateMessage { language, id }) if language == "de" && id == "x"
        ));
    }

    #[test]
    fn targets_follow_language_selection() {
        let resources = vec![Resource::new("en", vec![]), Resource::new("fr", vec![])];

        let all = Linter::builder().reference_language("en").build().unwrap();
        let languages: Vec<&str> = all.targets(&resources).iter().map(|t| t.0).collect();
        assert_eq!(languages, vec!["en", "fr"]);

        let selected = Linter::builder()
            .reference_language("en")
            .languages(["de", "en", "de"])
            .build()
            .unwrap();
        let targets = selected.targets(&resources);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, "de");
        assert!(targets[0].1.is_none());
        assert_eq!(targets[1].0, "en");
        assert_eq!(targets[1].1.map(Resource::language), Some("en"));
    }
}
