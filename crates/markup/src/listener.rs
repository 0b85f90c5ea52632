use crate::view::ElementRef;

/// Observer notified as elements are opened and closed through the streaming API.
///
/// Notifications are synchronous and delivered in registration order. Listeners only get a
/// read-only view, so they cannot reshape the tree mid-event. Elements created through
/// [`crate::ElementMut`] (retroactive edits) are not reported.
pub trait MarkupListener {
    /// Called once the element and its initial attributes are in place.
    fn element_started(&mut self, element: ElementRef<'_>);

    fn element_ended(&mut self, element: ElementRef<'_>);
}

/// Handle returned by [`crate::MarkupTree::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

pub(crate) struct ListenerEntry {
    pub(crate) id: ListenerId,
    pub(crate) listener: Box<dyn MarkupListener>,
}
