use std::sync::atomic::{AtomicBool, Ordering};

/// Atomic "changed since last store" marker.
///
/// Serializes as nothing: owners mark the field `#[serde(skip)]`, so freshly loaded objects
/// start clean.
#[derive(Debug, Default)]
pub struct DirtyFlag(AtomicBool);

impl DirtyFlag {
    pub const fn new(dirty: bool) -> Self {
        Self(AtomicBool::new(dirty))
    }

    pub fn mark_dirty(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns whether the flag was set and clears it in one atomic step. A mark racing this
    /// call is either observed here or left set for the next check.
    pub fn check_and_reset(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Clears the flag once the owner knows its current state is durably stored.
    pub fn confirm_stored(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Clone for DirtyFlag {
    fn clone(&self) -> Self {
        Self::new(self.is_dirty())
    }
}

/// Implemented by objects that persist through [`crate::SessionPersistence`].
pub trait DirtyTracked {
    fn dirty_flag(&self) -> &DirtyFlag;

    fn is_dirty(&self) -> bool {
        self.dirty_flag().is_dirty()
    }
}
