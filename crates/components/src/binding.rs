use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, optional value that components read while rendering and write while processing a
/// submission.
pub struct Binding<T>(Rc<RefCell<Option<T>>>);

impl<T> Binding<T> {
    pub fn new(value: Option<T>) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    pub fn set(&self, value: Option<T>) {
        *self.0.borrow_mut() = value;
    }

    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.0.borrow().as_ref())
    }
}

impl<T: Clone> Binding<T> {
    pub fn get(&self) -> Option<T> {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.0.borrow()).finish()
    }
}
