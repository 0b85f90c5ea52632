use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

/// Region of a page that can be re-rendered on its own. The DOM id is fixed so a partial
/// update can target it.
#[derive(Clone, Debug)]
pub struct Zone {
    dom_id: String,
}

impl Zone {
    pub fn new(dom_id: impl Into<String>) -> Self {
        Self {
            dom_id: dom_id.into(),
        }
    }

    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }
}

impl PhaseHandler for Zone {
    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        cx.reserve_client_id(&self.dom_id);
        cx.markup().open_element(
            "div",
            &[("id", Some(self.dom_id.as_str())), ("class", Some("t-zone"))],
        );
        Ok(PhaseOutcome::Continue)
    }

    fn after_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        cx.markup().close_element()?;
        Ok(PhaseOutcome::Continue)
    }
}
