use std::rc::Rc;

use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

use crate::form::{FormField, TrackerHandle};

/// `<label>` for a form field.
///
/// Labels usually render before their field, so the `for` attribute and the error class are
/// filled in by a deferred action once the enclosing heartbeat ends.
pub struct Label {
    field: Rc<dyn FormField>,
    tracker: TrackerHandle,
    error_class: String,
}

impl Label {
    pub fn new(
        field: Rc<dyn FormField>,
        tracker: TrackerHandle,
        error_class: impl Into<String>,
    ) -> Self {
        Self {
            field,
            tracker,
            error_class: error_class.into(),
        }
    }
}

impl PhaseHandler for Label {
    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let label = self.field.snapshot().label;
        let element = cx.markup().open_element("label", &[]);
        cx.markup().write_text(&label);

        let field = Rc::clone(&self.field);
        let tracker = Rc::clone(&self.tracker);
        let error_class = self.error_class.clone();
        cx.defer(Box::new(move |cx| {
            let info = field.snapshot();
            let in_error = tracker.borrow().in_error(&info);
            let mut target = cx.markup().element_mut(element)?;
            match info.client_id.as_deref() {
                Some(id) => {
                    target.force_attribute("for", Some(id));
                }
                None => log::warn!(
                    target: "weft.render",
                    "label for {} rendered but the field never did",
                    info.control_name
                ),
            }
            if in_error {
                target.add_class_name(&error_class);
            }
            Ok(())
        }))?;
        Ok(PhaseOutcome::Continue)
    }

    fn after_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        cx.markup().close_element()?;
        Ok(PhaseOutcome::Continue)
    }
}
