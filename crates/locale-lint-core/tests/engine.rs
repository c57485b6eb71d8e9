//! Integration tests: traversal order, skipping, isolation and annotation.

use locale_lint_core::{
    async_trait, Config, FailureStage, InMemoryStore, InitContext, LintError, LintOutcome,
    LintReport,
    Linter, Message, NodeKey, NodeKind, Pattern, Resource, Rule, RuleError, Severity, Visit,
    VisitContext, VisitResult,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// ── Fixtures ──

fn fixture() -> Vec<Resource> {
    serde_json::from_str(
        r#"[
        {
            "type": "Resource",
            "languageTag": { "type": "LanguageTag", "name": "en" },
            "body": [{
                "type": "Message",
                "id": { "type": "Identifier", "name": "first-message" },
                "pattern": {
                    "type": "Pattern",
                    "elements": [{ "type": "Text", "value": "Welcome to this app." }]
                }
            }]
        },
        {
            "type": "Resource",
            "languageTag": { "type": "LanguageTag", "name": "de" },
            "body": [{
                "type": "Message",
                "id": { "type": "Identifier", "name": "second-message" },
                "pattern": {
                    "type": "Pattern",
                    "elements": [{ "type": "Text", "value": "Test" }]
                }
            }]
        }
    ]"#,
    )
    .expect("fixture should parse")
}

#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn for_rule(&self, id: &str) -> Vec<String> {
        let prefix = format!("{id}:");
        self.events()
            .into_iter()
            .filter(|e| e.starts_with(&prefix))
            .collect()
    }
}

#[derive(Default)]
struct Behavior {
    skip: Vec<NodeKind>,
    fail_enter: Vec<NodeKind>,
    fail_leave: Vec<NodeKind>,
    panic_enter: Vec<NodeKind>,
    fail_init: bool,
    fail_teardown: bool,
    yield_each: bool,
}

/// Records every hook call as `id:hook:Kind:target|reference`.
struct Recorder {
    id: &'static str,
    log: Log,
    behavior: Behavior,
}

impl Recorder {
    fn new(id: &'static str, log: &Log) -> Self {
        Self {
            id,
            log: log.clone(),
            behavior: Behavior::default(),
        }
    }

    fn with(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    async fn on_enter<N: Sync>(
        &self,
        visits: &mut usize,
        kind: NodeKind,
        cx: &VisitContext<'_, N>,
    ) -> VisitResult {
        if self.behavior.yield_each {
            tokio::task::yield_now().await;
        }
        *visits += 1;
        self.log
            .push(format!("{}:enter:{}:{}", self.id, kind, label(cx)));
        if self.behavior.panic_enter.contains(&kind) {
            panic!("{} exploded", self.id);
        }
        if self.behavior.fail_enter.contains(&kind) {
            return Err(RuleError::failed("enter failed"));
        }
        if self.behavior.skip.contains(&kind) {
            return Ok(Visit::Skip);
        }
        Ok(Visit::Continue)
    }

    async fn on_leave<N: Sync>(
        &self,
        kind: NodeKind,
        cx: &VisitContext<'_, N>,
    ) -> Result<(), RuleError> {
        if self.behavior.yield_each {
            tokio::task::yield_now().await;
        }
        self.log
            .push(format!("{}:leave:{}:{}", self.id, kind, label(cx)));
        if self.behavior.fail_leave.contains(&kind) {
            return Err(RuleError::failed("leave failed"));
        }
        Ok(())
    }
}

fn label<N>(cx: &VisitContext<'_, N>) -> String {
    let side = |node: Option<&NodeKey>| node.map_or_else(|| "-".to_string(), ToString::to_string);
    format!(
        "{}|{}",
        side(cx.target.as_ref().map(|t| t.key())),
        side(cx.reference.as_ref().map(|r| r.key()))
    )
}

#[async_trait]
impl Rule for Recorder {
    type State = usize;

    fn id(&self) -> &'static str {
        self.id
    }

    async fn initialize(&self, cx: &InitContext<'_>) -> Result<usize, RuleError> {
        self.log
            .push(format!("{}:init:{}", self.id, cx.reference_language));
        if self.behavior.fail_init {
            return Err(RuleError::failed("init failed"));
        }
        Ok(0)
    }

    async fn teardown(&self, visits: usize) -> Result<(), RuleError> {
        self.log.push(format!("{}:teardown:{visits}", self.id));
        if self.behavior.fail_teardown {
            return Err(RuleError::failed("teardown failed"));
        }
        Ok(())
    }

    async fn enter_resource(
        &self,
        visits: &mut usize,
        cx: &mut VisitContext<'_, Resource>,
    ) -> VisitResult {
        self.on_enter(visits, NodeKind::Resource, cx).await
    }

    async fn leave_resource(
        &self,
        _visits: &mut usize,
        cx: &mut VisitContext<'_, Resource>,
    ) -> Result<(), RuleError> {
        self.on_leave(NodeKind::Resource, cx).await
    }

    async fn enter_message(
        &self,
        visits: &mut usize,
        cx: &mut VisitContext<'_, Message>,
    ) -> VisitResult {
        self.on_enter(visits, NodeKind::Message, cx).await
    }

    async fn leave_message(
        &self,
        _visits: &mut usize,
        cx: &mut VisitContext<'_, Message>,
    ) -> Result<(), RuleError> {
        self.on_leave(NodeKind::Message, cx).await
    }

    async fn enter_pattern(
        &self,
        visits: &mut usize,
        cx: &mut VisitContext<'_, Pattern>,
    ) -> VisitResult {
        self.on_enter(visits, NodeKind::Pattern, cx).await
    }

    async fn leave_pattern(
        &self,
        _visits: &mut usize,
        cx: &mut VisitContext<'_, Pattern>,
    ) -> Result<(), RuleError> {
        self.on_leave(NodeKind::Pattern, cx).await
    }
}

/// Only defines a pattern visitor.
struct PatternCounter {
    log: Log,
}

#[async_trait]
impl Rule for PatternCounter {
    type State = ();

    fn id(&self) -> &'static str {
        "patterns"
    }

    async fn initialize(&self, _cx: &InitContext<'_>) -> Result<(), RuleError> {
        Ok(())
    }

    async fn enter_pattern(&self, _state: &mut (), cx: &mut VisitContext<'_, Pattern>) -> VisitResult {
        self.log.push(format!("patterns:enter:Pattern:{}", label(cx)));
        Ok(Visit::Continue)
    }
}

/// Reports on every target node of the tree under test.
struct ReportEverything;

#[async_trait]
impl Rule for ReportEverything {
    type State = ();

    fn id(&self) -> &'static str {
        "report-everything"
    }

    async fn initialize(&self, _cx: &InitContext<'_>) -> Result<(), RuleError> {
        Ok(())
    }

    async fn enter_resource(&self, _state: &mut (), cx: &mut VisitContext<'_, Resource>) -> VisitResult {
        if let Some(target) = &cx.target {
            cx.reporter.report_error(target, "resource error");
            cx.reporter.report_warning(target, "resource warning");
        }
        Ok(Visit::Continue)
    }

    async fn enter_message(&self, _state: &mut (), cx: &mut VisitContext<'_, Message>) -> VisitResult {
        if let Some(target) = &cx.target {
            cx.reporter.report_warning(target, "message warning");
        }
        Ok(Visit::Continue)
    }

    async fn enter_pattern(&self, _state: &mut (), cx: &mut VisitContext<'_, Pattern>) -> VisitResult {
        if let Some(target) = &cx.target {
            cx.reporter.report_error(target, "pattern error");
        }
        Ok(Visit::Continue)
    }
}

async fn run(rules: Vec<locale_lint_core::RuleBox>) -> LintOutcome {
    let mut builder = Linter::builder().reference_language("en");
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    builder
        .build()
        .expect("linter should build")
        .lint(&fixture())
        .await
        .expect("lint should succeed")
}

fn strip_lint(mut resources: Vec<Resource>) -> Vec<Resource> {
    for resource in &mut resources {
        resource.lint.clear();
        for message in &mut resource.body {
            message.lint.clear();
            message.pattern.lint.clear();
        }
    }
    resources
}

fn enter_events(events: &[String]) -> usize {
    events.iter().filter(|e| e.contains(":enter:")).count()
}

fn leave_events(events: &[String]) -> usize {
    events.iter().filter(|e| e.contains(":leave:")).count()
}

// ── Rules ──

#[tokio::test]
async fn zero_rules_returns_unmodified_copy() {
    let outcome = run(vec![]).await;
    assert!(outcome.diagnostics.is_empty());
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.resources, fixture());
}

#[tokio::test]
async fn visits_all_nodes_in_order() {
    let log = Log::default();
    run(vec![Box::new(Recorder::new("rec", &log))]).await;

    let expected = [
        "rec:init:en",
        "rec:enter:Resource:en|en",
        "rec:enter:Message:en/first-message|en/first-message",
        "rec:enter:Pattern:en/first-message#pattern|en/first-message#pattern",
        "rec:leave:Pattern:en/first-message#pattern|en/first-message#pattern",
        "rec:leave:Message:en/first-message|en/first-message",
        "rec:leave:Resource:en|en",
        "rec:enter:Resource:de|en",
        "rec:enter:Message:de/second-message|-",
        "rec:enter:Pattern:de/second-message#pattern|-",
        "rec:leave:Pattern:de/second-message#pattern|-",
        "rec:leave:Message:de/second-message|-",
        "rec:enter:Message:-|en/first-message",
        "rec:enter:Pattern:-|en/first-message#pattern",
        "rec:leave:Pattern:-|en/first-message#pattern",
        "rec:leave:Message:-|en/first-message",
        "rec:leave:Resource:de|en",
        "rec:teardown:8",
    ];
    assert_eq!(log.events(), expected);
}

#[tokio::test]
async fn every_node_entered_and_left_exactly_once() {
    let log = Log::default();
    run(vec![
        Box::new(Recorder::new("a", &log)),
        Box::new(Recorder::new("b", &log)),
    ])
    .await;

    for rule in ["a", "b"] {
        let events = log.for_rule(rule);
        let enters: Vec<_> = events
            .iter()
            .filter_map(|e| e.split_once(":enter:").map(|(_, node)| node))
            .collect();
        let mut unique = enters.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(enters.len(), unique.len(), "duplicate enter for {rule}");
        assert_eq!(enter_events(&events), 8);
        assert_eq!(leave_events(&events), 8);
    }
}

#[tokio::test]
async fn runs_every_resource_for_every_rule() {
    let log = Log::default();
    run(vec![
        Box::new(Recorder::new("a", &log)),
        Box::new(Recorder::new("b", &log)),
    ])
    .await;

    for rule in ["a", "b"] {
        let resources: Vec<_> = log
            .for_rule(rule)
            .into_iter()
            .filter(|e| e.contains(":enter:Resource:"))
            .collect();
        assert_eq!(resources.len(), 2);
    }
}

#[tokio::test]
async fn initialize_receives_reference_language() {
    let log = Log::default();
    run(vec![Box::new(Recorder::new("a", &log))]).await;
    assert_eq!(log.events()[0], "a:init:en");
}

// ── Skipping ──

#[tokio::test]
async fn missing_visitors_do_not_skip_children() {
    let log = Log::default();
    run(vec![Box::new(PatternCounter { log: log.clone() })]).await;
    assert_eq!(
        log.events(),
        vec![
            "patterns:enter:Pattern:en/first-message#pattern|en/first-message#pattern",
            "patterns:enter:Pattern:de/second-message#pattern|-",
            "patterns:enter:Pattern:-|en/first-message#pattern",
        ]
    );
}

#[tokio::test]
async fn resource_skip_is_per_rule() {
    let log = Log::default();
    run(vec![
        Box::new(Recorder::new("skipper", &log).with(Behavior {
            skip: vec![NodeKind::Resource],
            ..Behavior::default()
        })),
        Box::new(Recorder::new("walker", &log)),
    ])
    .await;

    let skipper = log.for_rule("skipper");
    assert_eq!(
        skipper,
        vec![
            "skipper:init:en",
            "skipper:enter:Resource:en|en",
            "skipper:enter:Resource:de|en",
            "skipper:teardown:2",
        ]
    );

    let walker = log.for_rule("walker");
    assert_eq!(enter_events(&walker), 8);
    assert_eq!(leave_events(&walker), 8);
}

#[tokio::test]
async fn message_skip_suppresses_pattern_and_leave() {
    let log = Log::default();
    run(vec![Box::new(Recorder::new("rec", &log).with(Behavior {
        skip: vec![NodeKind::Message],
        ..Behavior::default()
    }))])
    .await;

    let events = log.events();
    assert!(events.iter().all(|e| !e.contains(":Pattern:")));
    assert!(events.iter().all(|e| !e.contains(":leave:Message:")));
    assert_eq!(
        events.iter().filter(|e| e.contains(":enter:Message:")).count(),
        3
    );
    assert_eq!(
        events.iter().filter(|e| e.contains(":leave:Resource:")).count(),
        2
    );
}

#[tokio::test]
async fn pattern_skip_suppresses_pattern_leave_only() {
    let log = Log::default();
    run(vec![Box::new(Recorder::new("rec", &log).with(Behavior {
        skip: vec![NodeKind::Pattern],
        ..Behavior::default()
    }))])
    .await;

    let events = log.events();
    assert_eq!(
        events.iter().filter(|e| e.contains(":enter:Pattern:")).count(),
        3
    );
    assert!(events.iter().all(|e| !e.contains(":leave:Pattern:")));
    assert_eq!(
        events.iter().filter(|e| e.contains(":leave:Message:")).count(),
        3
    );
}

// ── Ordering ──

#[tokio::test]
async fn awaits_each_rule_in_order() {
    let log = Log::default();
    let yielding = || Behavior {
        yield_each: true,
        ..Behavior::default()
    };
    run(vec![
        Box::new(Recorder::new("a", &log).with(yielding())),
        Box::new(Recorder::new("b", &log).with(yielding())),
    ])
    .await;

    let events = log.events();
    assert_eq!(
        &events[..8],
        &[
            "a:init:en",
            "b:init:en",
            "a:enter:Resource:en|en",
            "b:enter:Resource:en|en",
            "a:enter:Message:en/first-message|en/first-message",
            "b:enter:Message:en/first-message|en/first-message",
            "a:enter:Pattern:en/first-message#pattern|en/first-message#pattern",
            "b:enter:Pattern:en/first-message#pattern|en/first-message#pattern",
        ]
    );
    assert_eq!(
        &events[8..10],
        &[
            "b:leave:Pattern:en/first-message#pattern|en/first-message#pattern",
            "a:leave:Pattern:en/first-message#pattern|en/first-message#pattern",
        ]
    );
}

// ── Failure isolation ──

#[tokio::test]
async fn failing_enter_is_isolated() {
    let log = Log::default();
    let outcome = run(vec![
        Box::new(Recorder::new("broken", &log).with(Behavior {
            fail_enter: vec![NodeKind::Message],
            ..Behavior::default()
        })),
        Box::new(Recorder::new("healthy", &log)),
    ])
    .await;

    let broken = log.for_rule("broken");
    assert!(broken.iter().all(|e| !e.contains(":Pattern:")));
    assert!(broken.iter().all(|e| !e.contains(":leave:Message:")));
    assert_eq!(
        broken.iter().filter(|e| e.contains(":enter:Message:")).count(),
        3
    );
    assert!(broken.contains(&"broken:teardown:5".to_string()));

    let healthy = log.for_rule("healthy");
    assert_eq!(enter_events(&healthy), 8);
    assert_eq!(leave_events(&healthy), 8);

    assert_eq!(outcome.failures.len(), 3);
    assert!(outcome.failures.iter().all(|f| f.rule == "broken"));
    assert_eq!(
        outcome.failures[0].stage,
        FailureStage::Enter {
            node: NodeKey::Message {
                language: "en".into(),
                id: "first-message".into()
            }
        }
    );
    assert_eq!(outcome.failures[0].message, "enter failed");
}

#[tokio::test]
async fn failing_resource_enter_still_tears_down() {
    let log = Log::default();
    let outcome = run(vec![Box::new(Recorder::new("broken", &log).with(
        Behavior {
            fail_enter: vec![NodeKind::Resource],
            ..Behavior::default()
        },
    ))])
    .await;

    assert_eq!(
        log.events(),
        vec![
            "broken:init:en",
            "broken:enter:Resource:en|en",
            "broken:enter:Resource:de|en",
            "broken:teardown:2",
        ]
    );
    assert_eq!(outcome.failures.len(), 2);
}

#[tokio::test]
async fn failing_leave_is_isolated() {
    let log = Log::default();
    let outcome = run(vec![
        Box::new(Recorder::new("broken", &log).with(Behavior {
            fail_leave: vec![NodeKind::Pattern, NodeKind::Resource],
            ..Behavior::default()
        })),
        Box::new(Recorder::new("healthy", &log)),
    ])
    .await;

    assert_eq!(enter_events(&log.for_rule("broken")), 8);
    assert_eq!(leave_events(&log.for_rule("healthy")), 8);
    assert_eq!(outcome.failures.len(), 5);
    assert!(outcome
        .failures
        .iter()
        .all(|f| matches!(f.stage, FailureStage::Leave { .. })));
}

#[tokio::test]
async fn panicking_visitor_is_isolated() {
    let log = Log::default();
    let outcome = run(vec![
        Box::new(Recorder::new("panicky", &log).with(Behavior {
            panic_enter: vec![NodeKind::Pattern],
            ..Behavior::default()
        })),
        Box::new(Recorder::new("healthy", &log)),
    ])
    .await;

    assert_eq!(outcome.failures.len(), 3);
    assert_eq!(outcome.failures[0].message, "panicked: panicky exploded");
    assert!(log
        .for_rule("panicky")
        .iter()
        .all(|e| !e.contains(":leave:Pattern:")));
    assert_eq!(leave_events(&log.for_rule("healthy")), 8);
    assert!(log
        .events()
        .contains(&"panicky:teardown:8".to_string()));
}

#[tokio::test]
async fn failed_initialize_excludes_rule() {
    let log = Log::default();
    let outcome = run(vec![
        Box::new(Recorder::new("broken", &log).with(Behavior {
            fail_init: true,
            ..Behavior::default()
        })),
        Box::new(Recorder::new("healthy", &log)),
    ])
    .await;

    assert_eq!(log.for_rule("broken"), vec!["broken:init:en"]);
    assert!(log.events().contains(&"healthy:teardown:8".to_string()));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].stage, FailureStage::Initialize);
}

#[tokio::test]
async fn failed_teardown_does_not_block_others() {
    let log = Log::default();
    let outcome = run(vec![
        Box::new(Recorder::new("broken", &log).with(Behavior {
            fail_teardown: true,
            ..Behavior::default()
        })),
        Box::new(Recorder::new("healthy", &log)),
    ])
    .await;

    assert!(log.events().contains(&"healthy:teardown:8".to_string()));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].stage, FailureStage::Teardown);
    assert_eq!(outcome.failures[0].rule, "broken");
}

// ── Reporter ──

#[tokio::test]
async fn leaves_input_untouched_and_annotates_copy() {
    let input = fixture();
    let linter = Linter::builder()
        .reference_language("en")
        .rule(ReportEverything)
        .build()
        .unwrap();
    let outcome = linter.lint(&input).await.unwrap();

    assert_eq!(input, fixture());

    let de = outcome.resource("de").unwrap();
    assert_eq!(
        de.lint,
        vec![
            LintReport::new("report-everything", Severity::Error, "resource error"),
            LintReport::new("report-everything", Severity::Warning, "resource warning"),
        ]
    );
    assert_eq!(
        de.body[0].lint,
        vec![LintReport::new(
            "report-everything",
            Severity::Warning,
            "message warning"
        )]
    );
    assert_eq!(
        de.body[0].pattern.lint,
        vec![LintReport::new(
            "report-everything",
            Severity::Error,
            "pattern error"
        )]
    );

    // 2 resources x 2 + 2 messages + 2 patterns
    assert_eq!(outcome.diagnostics.len(), 8);
    assert_eq!(outcome.count_by_severity(), (4, 4));
}

#[tokio::test]
async fn annotation_preserves_structure() {
    let outcome = run(vec![Box::new(ReportEverything)]).await;
    assert_eq!(strip_lint(outcome.resources), fixture());
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let linter = Linter::builder()
        .reference_language("en")
        .rule(ReportEverything)
        .build()
        .unwrap();
    let first = linter.lint(&fixture()).await.unwrap();
    let second = linter.lint(&fixture()).await.unwrap();
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.resources, second.resources);
}

#[tokio::test]
async fn severity_override_applies_to_reports_and_annotations() {
    let config = Config::parse(
        r#"
[rules.report-everything]
severity = "warning"
"#,
    )
    .unwrap();
    let outcome = Linter::builder()
        .reference_language("en")
        .config(config)
        .rule(ReportEverything)
        .build()
        .unwrap()
        .lint(&fixture())
        .await
        .unwrap();

    assert!(!outcome.has_errors());
    assert!(outcome
        .resource("de")
        .unwrap()
        .lint
        .iter()
        .all(|r| r.severity == Severity::Warning));
}

// ── Selection and stores ──

#[tokio::test]
async fn language_selection_limits_traversal() {
    let log = Log::default();
    let outcome = Linter::builder()
        .reference_language("en")
        .languages(["de"])
        .rule(Recorder::new("rec", &log))
        .build()
        .unwrap()
        .lint(&fixture())
        .await
        .unwrap();

    let resources: Vec<_> = log
        .events()
        .into_iter()
        .filter(|e| e.contains(":enter:Resource:"))
        .collect();
    assert_eq!(resources, vec!["rec:enter:Resource:de|en"]);
    assert_eq!(outcome.resources.len(), 2);
}

#[tokio::test]
async fn selected_language_without_resource_is_traversed() {
    let log = Log::default();
    let reference_only: Vec<Resource> = fixture()
        .into_iter()
        .filter(|r| r.language() == "en")
        .collect();

    let outcome = Linter::builder()
        .reference_language("en")
        .languages(["en", "de"])
        .rule(Recorder::new("rec", &log))
        .build()
        .unwrap()
        .lint(&reference_only)
        .await
        .unwrap();

    let entered: Vec<String> = log
        .events()
        .into_iter()
        .filter(|e| e.contains(":enter:"))
        .collect();
    assert_eq!(
        entered,
        vec![
            "rec:enter:Resource:en|en",
            "rec:enter:Message:en/first-message|en/first-message",
            "rec:enter:Pattern:en/first-message#pattern|en/first-message#pattern",
            "rec:enter:Resource:-|en",
            "rec:enter:Message:-|en/first-message",
            "rec:enter:Pattern:-|en/first-message#pattern",
        ]
    );
    assert_eq!(leave_events(&log.events()), 6);
    assert_eq!(outcome.resources, reference_only);
}

#[tokio::test]
async fn duplicate_message_ids_are_rejected() {
    let log = Log::default();
    let mut resources = fixture();
    resources[1]
        .body
        .push(Message::new("second-message", Pattern::text("Noch einmal")));

    let result = Linter::builder()
        .reference_language("en")
        .rule(Recorder::new("rec", &log))
        .build()
        .unwrap()
        .lint(&resources)
        .await;

    assert!(matches!(
        result,
        Err(LintError::DuplicateMessage { ref language, ref id })
            if language == "de" && id == "second-message"
    ));
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn lints_resources_from_store() {
    let store = InMemoryStore::new(fixture());
    let outcome = Linter::builder()
        .reference_language("en")
        .rule(ReportEverything)
        .build()
        .unwrap()
        .lint_store(&store)
        .await
        .unwrap();

    assert_eq!(outcome.resources.len(), 2);
    assert!(outcome.has_errors());
}
