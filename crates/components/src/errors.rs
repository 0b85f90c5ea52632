use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

use crate::form::TrackerHandle;

/// Lists every error in a form's tracker. Writes nothing when there are none.
pub struct Errors {
    tracker: TrackerHandle,
    banner: String,
}

impl Errors {
    pub fn new(tracker: TrackerHandle, banner: impl Into<String>) -> Self {
        Self {
            tracker,
            banner: banner.into(),
        }
    }
}

impl PhaseHandler for Errors {
    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let tracker = self.tracker.borrow();
        if !tracker.has_errors() {
            return Ok(PhaseOutcome::Continue);
        }
        let markup = cx.markup();
        markup.open_element("div", &[("class", Some("t-error"))]);
        if !self.banner.is_empty() {
            markup.open_element("div", &[("class", Some("t-banner"))]);
            markup.write_text(&self.banner);
            markup.close_element()?;
        }
        markup.open_element("ul", &[]);
        for error in tracker.all_errors() {
            markup.open_element("li", &[]);
            markup.write_text(error);
            markup.close_element()?;
        }
        markup.close_element()?;
        markup.close_element()?;
        Ok(PhaseOutcome::Continue)
    }
}
