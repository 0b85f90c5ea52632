//! The render queue.
//!
//! Rendering is driven by an explicit stack of `(component, phase)` commands instead of
//! recursion: a component's body is rendered by pushing its own `AfterRenderBody` followed by
//! its children's `SetupRender`, so the children run to completion before the parent resumes.

use markup::{IdAllocator, MarkupTree};

use crate::component::{ComponentKey, ComponentSlot, RenderState, RenderTree};
use crate::context::RenderContext;
use crate::error::{RenderError, RenderQueueError};
use crate::heartbeat::{DEFAULT_MAX_ITERATIONS, Heartbeat};
use crate::linker::{DocumentLinker, StylesheetLink};
use crate::ordering::HandlerRef;
use crate::phase::{self, PhaseHandler, PhaseOutcome, RenderPhase};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Repeat outcomes allowed per component render before the pass fails.
    pub max_repeats: u32,
    /// Deferred actions one heartbeat scope may run before it is considered runaway.
    pub max_heartbeat_iterations: usize,
    /// Lines of partial markup captured on failure.
    pub outline_lines: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_repeats: 1_000,
            max_heartbeat_iterations: DEFAULT_MAX_ITERATIONS,
            outline_lines: 200,
        }
    }
}

/// What a completed pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Phase invocations, one per component per phase (all handlers of a phase count once).
    pub phases: usize,
    pub deferred: usize,
    pub stylesheets: Vec<StylesheetLink>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Phase(RenderPhase),
    Body,
    Done,
}

fn next_step(phase: RenderPhase, outcome: PhaseOutcome) -> Step {
    use PhaseOutcome::{Repeat, SkipBody, Terminate};
    use RenderPhase::*;

    match (phase, outcome) {
        (_, Terminate) => Step::Done,
        (SetupRender, SkipBody) => Step::Phase(CleanupRender),
        (SetupRender, _) => Step::Phase(BeginRender),
        (BeginRender, SkipBody) => Step::Phase(AfterRender),
        (BeginRender, _) => Step::Phase(BeforeRenderBody),
        (BeforeRenderBody, SkipBody) => Step::Phase(AfterRenderBody),
        (BeforeRenderBody, _) => Step::Body,
        (AfterRenderBody, Repeat) => Step::Phase(BeforeRenderBody),
        (AfterRenderBody, _) => Step::Phase(AfterRender),
        (AfterRender, Repeat) => Step::Phase(BeginRender),
        (AfterRender, _) => Step::Phase(CleanupRender),
        (CleanupRender, Repeat) => Step::Phase(SetupRender),
        (CleanupRender, _) => Step::Done,
    }
}

struct Pass {
    heartbeat: Heartbeat,
    ids: IdAllocator,
    linker: DocumentLinker,
    phases: usize,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    config: RenderConfig,
}

impl Scheduler {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders the whole tree as a page and links imported stylesheets into `html/head`.
    pub fn render(
        &self,
        tree: &mut RenderTree,
        markup: &mut MarkupTree,
    ) -> Result<RenderReport, RenderQueueError> {
        let root = tree.root();
        let (mut report, linker) = self.run(tree, root, markup)?;
        let linked = linker
            .link_into_head(markup)
            .map_err(|err| {
                let err = RenderError::Phase(err.into());
                self.fail(tree, root, None, "document linker", err, markup)
            })?;
        log::debug!(
            target: "weft.render",
            "page pass done: {} phase(s), {} deferred, {linked} stylesheet link(s)",
            report.phases,
            report.deferred
        );
        report.stylesheets = linker.into_stylesheets();
        Ok(report)
    }

    /// Renders `start` and its descendants into `markup`. Imported stylesheets are returned in
    /// the report rather than linked.
    pub fn render_subtree(
        &self,
        tree: &mut RenderTree,
        start: ComponentKey,
        markup: &mut MarkupTree,
    ) -> Result<RenderReport, RenderQueueError> {
        let (mut report, linker) = self.run(tree, start, markup)?;
        report.stylesheets = linker.into_stylesheets();
        Ok(report)
    }

    fn run(
        &self,
        tree: &mut RenderTree,
        start: ComponentKey,
        markup: &mut MarkupTree,
    ) -> Result<(RenderReport, DocumentLinker), RenderQueueError> {
        let root_id = match tree.slot(start) {
            Ok(slot) => slot.id.clone(),
            Err(err) => {
                return Err(RenderQueueError {
                    phase: None,
                    handler: String::new(),
                    active: Vec::new(),
                    outline: Vec::new(),
                    source: err,
                });
            }
        };

        for key in tree.subtree(start) {
            if let Err(err) = tree.resolve_order(key) {
                let label = tree.id(key).map(ToString::to_string).unwrap_or_default();
                return Err(self.fail(tree, key, None, &label, err, markup));
            }
            if let Ok(slot) = tree.slot_mut(key) {
                slot.state = RenderState::NotStarted;
                slot.repeats = 0;
            }
        }

        log::debug!(target: "weft.render", "render pass starting at {root_id}");
        let mut pass = Pass {
            heartbeat: Heartbeat::new(self.config.max_heartbeat_iterations),
            ids: IdAllocator::new(),
            linker: DocumentLinker::default(),
            phases: 0,
        };
        pass.heartbeat.begin();

        let mut queue = vec![(start, RenderPhase::SetupRender)];
        while let Some((key, phase)) = queue.pop() {
            let outcome = match self.run_phase(tree, key, phase, &mut pass, markup) {
                Ok(outcome) => outcome,
                Err((handler, err)) => {
                    return Err(self.fail(tree, key, Some(phase), &handler, err, markup));
                }
            };
            pass.phases += 1;

            if phase.is_after() && outcome == PhaseOutcome::Repeat {
                let limit = self.config.max_repeats;
                let exceeded = tree.slot_mut(key).map(|slot| {
                    slot.repeats += 1;
                    (slot.repeats > limit).then(|| slot.id.clone())
                });
                if let Ok(Some(component)) = exceeded {
                    let err = RenderError::RepeatLimit { component, limit };
                    let label = tree.id(key).map(ToString::to_string).unwrap_or_default();
                    return Err(self.fail(tree, key, Some(phase), &label, err, markup));
                }
            }

            match next_step(phase, outcome) {
                Step::Phase(next) => queue.push((key, next)),
                Step::Body => {
                    queue.push((key, RenderPhase::AfterRenderBody));
                    let children = tree.children(key).to_vec();
                    for child in children.into_iter().rev() {
                        if let Ok(slot) = tree.slot_mut(child) {
                            slot.state = RenderState::NotStarted;
                            slot.repeats = 0;
                        }
                        queue.push((child, RenderPhase::SetupRender));
                    }
                }
                Step::Done => {
                    if let Ok(slot) = tree.slot_mut(key) {
                        slot.state = RenderState::Done;
                    }
                    if outcome == PhaseOutcome::Terminate {
                        log::debug!(
                            target: "weft.render",
                            "{} terminated during {phase}",
                            tree.id(key).map(ToString::to_string).unwrap_or_default()
                        );
                    }
                }
            }
        }

        // Scopes left open by terminated components sit above the page scope. Drain them
        // innermost first so the page scope still runs last.
        let unclosed = pass.heartbeat.depth().saturating_sub(1);
        if unclosed > 0 {
            log::warn!(
                target: "weft.render",
                "{unclosed} heartbeat scope(s) left open at end of pass; draining them"
            );
        }
        let drained = {
            let mut cx = RenderContext::new(
                markup,
                &mut pass.heartbeat,
                &mut pass.ids,
                &mut pass.linker,
                &root_id,
                RenderPhase::CleanupRender,
            );
            let mut drained = cx.end_heartbeat();
            while drained.is_ok() && cx.heartbeat_depth() > 0 {
                drained = cx.end_heartbeat();
            }
            drained
        };
        if let Err(err) = drained {
            return Err(self.fail(
                tree,
                start,
                Some(RenderPhase::CleanupRender),
                "heartbeat",
                err.into(),
                markup,
            ));
        }

        let report = RenderReport {
            phases: pass.phases,
            deferred: pass.heartbeat.executed(),
            stylesheets: Vec::new(),
        };
        Ok((report, pass.linker))
    }

    /// Runs every handler of `key` for one phase and folds their outcomes.
    fn run_phase(
        &self,
        tree: &mut RenderTree,
        key: ComponentKey,
        phase: RenderPhase,
        pass: &mut Pass,
        markup: &mut MarkupTree,
    ) -> Result<PhaseOutcome, (String, RenderError)> {
        let slot = tree.slot_mut(key).map_err(|err| (String::new(), err))?;
        slot.state = RenderState::entering(phase);

        let mut handlers: Vec<HandlerRef> = slot.order.clone().unwrap_or_default();
        if phase.is_after() {
            handlers.reverse();
        }

        let mut result = PhaseOutcome::Continue;
        for handler_ref in handlers {
            let ComponentSlot {
                id,
                handler,
                mixins,
                ..
            } = &mut *slot;
            let target: &mut dyn PhaseHandler = match handler_ref {
                HandlerRef::Component => handler.as_mut(),
                HandlerRef::Mixin(i) => mixins[i].handler.as_mut(),
            };
            let mut cx = RenderContext::new(
                markup,
                &mut pass.heartbeat,
                &mut pass.ids,
                &mut pass.linker,
                id,
                phase,
            );
            let outcome = match phase::dispatch(target, phase, &mut cx) {
                Ok(outcome) => outcome,
                Err(err) => return Err((slot.handler_label(handler_ref), err.into())),
            };
            result = result.max(outcome);
            if outcome == PhaseOutcome::Terminate {
                break;
            }
        }

        log::trace!(target: "weft.render", "{} {phase} -> {result:?}", slot.id);
        Ok(result)
    }

    pub(crate) fn fail(
        &self,
        tree: &RenderTree,
        key: ComponentKey,
        phase: Option<RenderPhase>,
        handler: &str,
        source: RenderError,
        markup: &MarkupTree,
    ) -> RenderQueueError {
        let error = RenderQueueError {
            phase,
            handler: handler.to_string(),
            active: tree.ancestry(key),
            outline: markup.outline(self.config.outline_lines),
            source,
        };
        log::debug!(
            target: "weft.render",
            "{error} (active: {})",
            error.active_chain()
        );
        for line in &error.outline {
            log::debug!(target: "weft.render", "  {line}");
        }
        error
    }
}
