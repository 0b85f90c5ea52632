//! Dirty-tracked persistence of per-session objects.
//!
//! Objects carry a [`DirtyFlag`] that every mutation sets. [`SessionPersistence`] reads and
//! clears the flag atomically before serializing, so an object that did not change since its
//! last successful store is not written again.

mod backend;
mod blob;
mod dirty;
mod error;
mod session;

pub use backend::{InMemorySessionStore, SessionBackend};
pub use blob::ClientBlobCodec;
pub use dirty::{DirtyFlag, DirtyTracked};
pub use error::PersistError;
pub use session::{PersistConfig, SessionPersistence, StoreOutcome};
