use std::fmt;

use markup::MarkupError;

use crate::context::RenderContext;
use crate::heartbeat::HeartbeatError;

/// Render phases in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    SetupRender,
    BeginRender,
    BeforeRenderBody,
    AfterRenderBody,
    AfterRender,
    CleanupRender,
}

impl RenderPhase {
    pub const ALL: [RenderPhase; 6] = [
        RenderPhase::SetupRender,
        RenderPhase::BeginRender,
        RenderPhase::BeforeRenderBody,
        RenderPhase::AfterRenderBody,
        RenderPhase::AfterRender,
        RenderPhase::CleanupRender,
    ];

    /// After phases run handlers in reverse resolved order.
    pub const fn is_after(self) -> bool {
        matches!(
            self,
            RenderPhase::AfterRenderBody | RenderPhase::AfterRender | RenderPhase::CleanupRender
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            RenderPhase::SetupRender => "SetupRender",
            RenderPhase::BeginRender => "BeginRender",
            RenderPhase::BeforeRenderBody => "BeforeRenderBody",
            RenderPhase::AfterRenderBody => "AfterRenderBody",
            RenderPhase::AfterRender => "AfterRender",
            RenderPhase::CleanupRender => "CleanupRender",
        }
    }
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a phase handler asks the scheduler to do next.
///
/// When several handlers run in one phase the strongest outcome wins, in declaration order
/// below (`Terminate` strongest).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhaseOutcome {
    #[default]
    Continue,
    /// Only meaningful for after phases: re-run the body (`AfterRenderBody`), restart from
    /// `BeginRender` (`AfterRender`) or from `SetupRender` (`CleanupRender`).
    Repeat,
    /// Skip ahead: `SetupRender` jumps to `CleanupRender`, `BeginRender` to `AfterRender`,
    /// `BeforeRenderBody` leaves the body out.
    SkipBody,
    /// Abandon the component: no further phases, no children, remaining handlers in the
    /// current phase are not invoked.
    Terminate,
}

#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Heartbeat(#[from] HeartbeatError),
    #[error("{0}")]
    Component(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl PhaseError {
    pub fn component(message: impl Into<String>) -> Self {
        PhaseError::Component(message.into())
    }
}

pub type PhaseResult = Result<PhaseOutcome, PhaseError>;

/// Capability set shared by components and mixins. Every phase defaults to `Continue`, so
/// implementors only override the phases they take part in.
pub trait PhaseHandler {
    fn setup_render(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Continue)
    }

    fn begin_render(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Continue)
    }

    fn before_render_body(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Continue)
    }

    fn after_render_body(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Continue)
    }

    fn after_render(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Continue)
    }

    fn cleanup_render(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Continue)
    }
}

pub(crate) fn dispatch(
    handler: &mut dyn PhaseHandler,
    phase: RenderPhase,
    cx: &mut RenderContext<'_>,
) -> PhaseResult {
    match phase {
        RenderPhase::SetupRender => handler.setup_render(cx),
        RenderPhase::BeginRender => handler.begin_render(cx),
        RenderPhase::BeforeRenderBody => handler.before_render_body(cx),
        RenderPhase::AfterRenderBody => handler.after_render_body(cx),
        RenderPhase::AfterRender => handler.after_render(cx),
        RenderPhase::CleanupRender => handler.cleanup_render(cx),
    }
}
