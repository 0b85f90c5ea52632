use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

/// Writes computed text, optionally wrapped in an element.
pub struct Output {
    element: Option<&'static str>,
    text: Box<dyn Fn() -> String>,
}

impl Output {
    pub fn new(text: impl Fn() -> String + 'static) -> Self {
        Self {
            element: None,
            text: Box::new(text),
        }
    }

    pub fn wrapped(element: &'static str, text: impl Fn() -> String + 'static) -> Self {
        Self {
            element: Some(element),
            text: Box::new(text),
        }
    }
}

impl PhaseHandler for Output {
    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let text = (self.text)();
        let markup = cx.markup();
        match self.element {
            Some(name) => {
                markup.open_element(name, &[]);
                markup.write_text(&text);
                markup.close_element()?;
            }
            None => markup.write_text(&text),
        }
        Ok(PhaseOutcome::Continue)
    }
}
