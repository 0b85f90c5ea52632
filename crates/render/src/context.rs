use core_types::Asset;
use markup::{IdAllocator, MarkupTree};

use crate::component::ComponentId;
use crate::heartbeat::{DeferredAction, Heartbeat};
use crate::linker::DocumentLinker;
use crate::phase::{PhaseError, RenderPhase};

/// Everything a phase handler may touch while it runs.
///
/// Borrowed from the pass state for the duration of one handler call (or one heartbeat drain).
pub struct RenderContext<'a> {
    markup: &'a mut MarkupTree,
    heartbeat: &'a mut Heartbeat,
    ids: &'a mut IdAllocator,
    linker: &'a mut DocumentLinker,
    component: &'a ComponentId,
    phase: RenderPhase,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        markup: &'a mut MarkupTree,
        heartbeat: &'a mut Heartbeat,
        ids: &'a mut IdAllocator,
        linker: &'a mut DocumentLinker,
        component: &'a ComponentId,
        phase: RenderPhase,
    ) -> Self {
        Self {
            markup,
            heartbeat,
            ids,
            linker,
            component,
            phase,
        }
    }

    pub fn markup(&mut self) -> &mut MarkupTree {
        &mut *self.markup
    }

    pub fn markup_ref(&self) -> &MarkupTree {
        &*self.markup
    }

    /// Id of the component whose handler is running.
    pub fn component_id(&self) -> &ComponentId {
        self.component
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Allocates a DOM id unique within this render pass.
    pub fn allocate_client_id(&mut self, base: &str) -> String {
        self.ids.allocate(base)
    }

    /// Claims a DOM id written literally so later allocations skip it.
    pub fn reserve_client_id(&mut self, id: &str) {
        self.ids.reserve(id);
    }

    pub fn import_stylesheet(&mut self, asset: &dyn Asset) {
        self.linker.import_stylesheet(asset);
    }

    pub fn begin_heartbeat(&mut self) {
        self.heartbeat.begin();
    }

    /// Open heartbeat scopes, the page scope included.
    pub fn heartbeat_depth(&self) -> usize {
        self.heartbeat.depth()
    }

    pub fn defer(&mut self, action: DeferredAction) -> Result<(), PhaseError> {
        self.heartbeat.defer(action)?;
        Ok(())
    }

    /// Runs every action deferred in the innermost heartbeat, then closes it.
    pub fn end_heartbeat(&mut self) -> Result<(), PhaseError> {
        Heartbeat::end(self)
    }

    pub(crate) fn heartbeat_mut(&mut self) -> &mut Heartbeat {
        &mut *self.heartbeat
    }
}
