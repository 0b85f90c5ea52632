//! Scoped FIFO queues of deferred actions.
//!
//! Components that need to see something rendered later (a label waiting for its field to
//! allocate a client id) defer work to the end of the innermost heartbeat. The scheduler owns
//! the page-level scope; components such as forms open nested ones.

use std::collections::VecDeque;
use std::fmt;

use crate::context::RenderContext;
use crate::phase::PhaseError;

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

pub type DeferredAction = Box<dyn FnOnce(&mut RenderContext<'_>) -> Result<(), PhaseError>>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeartbeatError {
    #[error("deferred action queued with no open heartbeat")]
    NoActiveScope,
    #[error("heartbeat ended with no open scope")]
    UnbalancedEnd,
    #[error("heartbeat at depth {depth} ran more than {limit} deferred actions")]
    RunawayDeferral { depth: usize, limit: usize },
}

pub struct Heartbeat {
    scopes: Vec<VecDeque<DeferredAction>>,
    max_iterations: usize,
    executed: usize,
}

impl Heartbeat {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            scopes: Vec::new(),
            max_iterations,
            executed: 0,
        }
    }

    pub fn begin(&mut self) {
        self.scopes.push(VecDeque::new());
        log::trace!(target: "weft.render", "heartbeat begin depth={}", self.scopes.len());
    }

    /// Queues `action` on the innermost scope.
    pub fn defer(&mut self, action: DeferredAction) -> Result<(), HeartbeatError> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or(HeartbeatError::NoActiveScope)?;
        scope.push_back(action);
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Total deferred actions run since creation.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn pending(&self) -> usize {
        self.scopes.last().map_or(0, VecDeque::len)
    }

    /// Drains the innermost scope in FIFO order, including actions queued while draining, then
    /// pops it.
    pub(crate) fn end(cx: &mut RenderContext<'_>) -> Result<(), PhaseError> {
        let depth = cx.heartbeat_mut().depth();
        if depth == 0 {
            return Err(HeartbeatError::UnbalancedEnd.into());
        }
        let limit = cx.heartbeat_mut().max_iterations;
        let mut iterations = 0usize;
        while let Some(action) = cx.heartbeat_mut().next_in_scope(depth) {
            iterations += 1;
            if iterations > limit {
                log::warn!(
                    target: "weft.render",
                    "heartbeat depth={depth} exceeded {limit} deferred actions"
                );
                return Err(HeartbeatError::RunawayDeferral { depth, limit }.into());
            }
            action(cx)?;
            cx.heartbeat_mut().executed += 1;
        }
        let heartbeat = cx.heartbeat_mut();
        heartbeat.scopes.truncate(depth - 1);
        log::trace!(
            target: "weft.render",
            "heartbeat end depth={depth} ran={iterations}"
        );
        Ok(())
    }

    fn next_in_scope(&mut self, depth: usize) -> Option<DeferredAction> {
        self.scopes.get_mut(depth - 1)?.pop_front()
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl fmt::Debug for Heartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queued: Vec<usize> = self.scopes.iter().map(VecDeque::len).collect();
        f.debug_struct("Heartbeat")
            .field("queued", &queued)
            .field("max_iterations", &self.max_iterations)
            .field("executed", &self.executed)
            .finish()
    }
}
