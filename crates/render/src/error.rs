use std::fmt;

use crate::component::ComponentId;
use crate::phase::{PhaseError, RenderPhase};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid component id segment `{0}`")]
    InvalidId(String),
    #[error("component id `{0}` is already in use")]
    DuplicateId(ComponentId),
    #[error("unknown component #{0}")]
    UnknownComponent(usize),
    #[error("component {component} already has a mixin named `{mixin}`")]
    DuplicateMixin { component: ComponentId, mixin: String },
    #[error("{0}")]
    InvalidOrderConstraint(String),
    #[error("mixin {component}:{mixin} is ordered against unknown mixin `{target}`")]
    UnknownOrderTarget {
        component: ComponentId,
        mixin: String,
        target: String,
    },
    #[error("mixin ordering for {component} has a cycle through {members:?}")]
    MixinOrderCycle {
        component: ComponentId,
        members: Vec<String>,
    },
    #[error("{component} asked to repeat more than {limit} times")]
    RepeatLimit { component: ComponentId, limit: u32 },
    #[error(transparent)]
    Phase(#[from] PhaseError),
}

/// A render pass that was aborted.
///
/// Markup written before the failure stays in the tree the pass was rendering into; `outline`
/// is a capped snapshot of it taken when the error was raised.
#[derive(Debug, thiserror::Error)]
#[error("render failed in {handler} during {}: {source}", phase_label(.phase))]
pub struct RenderQueueError {
    /// `None` when the pass failed while preparing, before any phase ran.
    pub phase: Option<RenderPhase>,
    /// `component` or `component:mixin`.
    pub handler: String,
    /// Active component ids, root first.
    pub active: Vec<ComponentId>,
    pub outline: Vec<String>,
    #[source]
    pub source: RenderError,
}

fn phase_label(phase: &Option<RenderPhase>) -> &'static str {
    phase.map_or("preparation", RenderPhase::label)
}

impl RenderQueueError {
    /// Renders the active chain as `page > page.form > page.form.email`.
    pub fn active_chain(&self) -> ActiveChain<'_> {
        ActiveChain(&self.active)
    }
}

pub struct ActiveChain<'a>(&'a [ComponentId]);

impl fmt::Display for ActiveChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
