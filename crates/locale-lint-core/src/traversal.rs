//! Depth-first traversal of resource pairings.
//!
//! Each `enter`/`leave` call is awaited before the next one starts, in
//! configured rule order for `enter` and reverse order for `leave`. A rule
//! that skips or fails at a node sees neither the node's descendants nor its
//! `leave`; the other rules are unaffected.

use crate::ast::{Message, NodeKey, NodeRef, Pattern, Resource};
use crate::context::VisitContext;
use crate::reporter::Reporter;
use crate::rule::{DynRule, NodeContext, RuleError, RuleState, Visit};
use crate::types::{FailureStage, RuleFailure};
use futures::FutureExt;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

/// A rule that completed `initialize`, with its state.
pub(crate) struct RuleSlot<'r> {
    pub(crate) rule: &'r dyn DynRule,
    pub(crate) state: RuleState,
}

/// Target/reference pairing of one node kind.
struct Pair<'a, N> {
    language: &'a str,
    target: Option<NodeRef<'a, N>>,
    reference: Option<NodeRef<'a, N>>,
}

impl<N> Pair<'_, N> {
    fn key(&self) -> Option<&NodeKey> {
        self.target
            .as_ref()
            .or(self.reference.as_ref())
            .map(NodeRef::key)
    }
}

/// Node types the traversal can hand to a rule.
trait Visitable: Sized {
    fn wrap<'c, 'a>(cx: &'c mut VisitContext<'a, Self>) -> NodeContext<'c, 'a>;
}

impl Visitable for Resource {
    fn wrap<'c, 'a>(cx: &'c mut VisitContext<'a, Self>) -> NodeContext<'c, 'a> {
        NodeContext::Resource(cx)
    }
}

impl Visitable for Message {
    fn wrap<'c, 'a>(cx: &'c mut VisitContext<'a, Self>) -> NodeContext<'c, 'a> {
        NodeContext::Message(cx)
    }
}

impl Visitable for Pattern {
    fn wrap<'c, 'a>(cx: &'c mut VisitContext<'a, Self>) -> NodeContext<'c, 'a> {
        NodeContext::Pattern(cx)
    }
}

/// Awaits a rule hook, turning a panic into [`RuleError::Panicked`].
pub(crate) async fn guarded<T, F>(hook: F) -> Result<T, RuleError>
where
    F: Future<Output = Result<T, RuleError>>,
{
    match AssertUnwindSafe(hook).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(RuleError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Records an isolated rule failure.
pub(crate) fn record_failure(
    failures: &mut Vec<RuleFailure>,
    rule: &str,
    stage: FailureStage,
    error: &RuleError,
) {
    warn!("Rule {} failed during {}: {}", rule, stage, error);
    failures.push(RuleFailure {
        rule: rule.to_string(),
        stage,
        message: error.to_string(),
    });
}

/// Walks resource pairings on behalf of a set of initialized rules.
pub(crate) struct Traversal<'t, 'r> {
    slots: &'t mut [RuleSlot<'r>],
    reporter: &'t mut Reporter,
    failures: &'t mut Vec<RuleFailure>,
    reference_language: &'t str,
}

impl<'t, 'r> Traversal<'t, 'r> {
    pub(crate) fn new(
        slots: &'t mut [RuleSlot<'r>],
        reporter: &'t mut Reporter,
        failures: &'t mut Vec<RuleFailure>,
        reference_language: &'t str,
    ) -> Self {
        Self {
            slots,
            reporter,
            failures,
            reference_language,
        }
    }

    /// Visits the resource of `language`, paired with the reference
    /// resource. Either side may be absent.
    pub(crate) async fn run_resource(
        &mut self,
        language: &str,
        target: Option<&Resource>,
        reference: Option<&Resource>,
    ) {
        if target.is_none() && reference.is_none() {
            debug!("Nothing to traverse for {}", language);
            return;
        }
        debug!(
            "Traversing resource {} against {}",
            language,
            reference.map_or("<none>", Resource::language)
        );

        let all: Vec<usize> = (0..self.slots.len()).collect();
        let pair = Pair {
            language,
            target: target.map(NodeRef::resource),
            reference: reference.map(NodeRef::resource),
        };

        let entered = self.enter_all(&all, &pair).await;
        if !entered.is_empty() {
            for (target_message, reference_message) in pair_messages(target, reference) {
                let messages = Pair {
                    language,
                    target: target_message.map(|m| NodeRef::message(language, m)),
                    reference: reference
                        .zip(reference_message)
                        .map(|(r, m)| NodeRef::message(r.language(), m)),
                };
                self.run_message(&entered, &messages).await;
            }
        }
        self.leave_all(&entered, &pair).await;
    }

    async fn run_message(&mut self, active: &[usize], pair: &Pair<'_, Message>) {
        let entered = self.enter_all(active, pair).await;
        if !entered.is_empty() {
            let patterns = Pair {
                language: pair.language,
                target: pair.target.as_ref().map(NodeRef::pattern),
                reference: pair.reference.as_ref().map(NodeRef::pattern),
            };
            let entered_patterns = self.enter_all(&entered, &patterns).await;
            self.leave_all(&entered_patterns, &patterns).await;
        }
        self.leave_all(&entered, pair).await;
    }

    /// Calls `enter` for every active rule and returns the rules that may
    /// descend, in configured order.
    async fn enter_all<N: Visitable + Sync>(
        &mut self,
        active: &[usize],
        pair: &Pair<'_, N>,
    ) -> Vec<usize> {
        let mut entered = Vec::with_capacity(active.len());

        for &index in active {
            let slot = &mut self.slots[index];
            let rule = slot.rule.id();
            let mut cx = VisitContext {
                target: pair.target.clone(),
                reference: pair.reference.clone(),
                language: pair.language,
                reference_language: self.reference_language,
                reporter: self.reporter.scoped(rule),
            };

            match guarded(slot.rule.enter(&mut slot.state, N::wrap(&mut cx))).await {
                Ok(Visit::Continue) => entered.push(index),
                Ok(Visit::Skip) => debug!("Rule {} skipped {:?}", rule, pair.key()),
                Err(error) => {
                    if let Some(node) = pair.key() {
                        record_failure(
                            self.failures,
                            rule,
                            FailureStage::Enter { node: node.clone() },
                            &error,
                        );
                    }
                }
            }
        }

        entered
    }

    /// Calls `leave` for every entered rule, in reverse order.
    async fn leave_all<N: Visitable + Sync>(&mut self, entered: &[usize], pair: &Pair<'_, N>) {
        for &index in entered.iter().rev() {
            let slot = &mut self.slots[index];
            let rule = slot.rule.id();
            let mut cx = VisitContext {
                target: pair.target.clone(),
                reference: pair.reference.clone(),
                language: pair.language,
                reference_language: self.reference_language,
                reporter: self.reporter.scoped(rule),
            };

            if let Err(error) = guarded(slot.rule.leave(&mut slot.state, N::wrap(&mut cx))).await {
                if let Some(node) = pair.key() {
                    record_failure(
                        self.failures,
                        rule,
                        FailureStage::Leave { node: node.clone() },
                        &error,
                    );
                }
            }
        }
    }
}

/// Pairs messages by id: target messages in body order, then messages only
/// present in the reference, in reference order.
fn pair_messages<'a>(
    target: Option<&'a Resource>,
    reference: Option<&'a Resource>,
) -> Vec<(Option<&'a Message>, Option<&'a Message>)> {
    let target_body = target.map_or(&[][..], |r| r.body.as_slice());
    let reference_body = reference.map_or(&[][..], |r| r.body.as_slice());
    let by_id: HashMap<&str, &Message> = reference_body.iter().map(|m| (m.id(), m)).collect();
    let target_ids: HashSet<&str> = target_body.iter().map(Message::id).collect();

    let mut pairs: Vec<_> = target_body
        .iter()
        .map(|m| (Some(m), by_id.get(m.id()).copied()))
        .collect();

    pairs.extend(
        reference_body
            .iter()
            .filter(|m| !target_ids.contains(m.id()))
            .map(|m| (None, Some(m))),
    );

    pairs
}
