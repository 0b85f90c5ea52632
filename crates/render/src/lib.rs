//! Component rendering: the phase scheduler, mixin ordering, heartbeat deferral and partial
//! (zone) rendering.

mod component;
mod context;
mod error;
mod heartbeat;
mod linker;
mod ordering;
mod partial;
mod phase;
mod scheduler;

pub use component::{ComponentId, ComponentKey, Mixin, RenderState, RenderTree};
pub use context::RenderContext;
pub use error::{ActiveChain, RenderError, RenderQueueError};
pub use heartbeat::{DEFAULT_MAX_ITERATIONS, DeferredAction, Heartbeat, HeartbeatError};
pub use linker::{DocumentLinker, StylesheetLink};
pub use ordering::{HandlerRef, InvalidConstraint, OrderConstraint, OrderTarget};
pub use partial::ZoneUpdate;
pub use phase::{PhaseError, PhaseHandler, PhaseOutcome, PhaseResult, RenderPhase};
pub use scheduler::{RenderConfig, RenderReport, Scheduler};
