use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

use crate::binding::Binding;

/// Renders its body once per item, exposing the current item through a [`Binding`].
pub struct Loop<T> {
    source: Box<dyn Fn() -> Vec<T>>,
    current: Binding<T>,
    items: Vec<T>,
    index: usize,
}

impl<T: Clone> Loop<T> {
    pub fn new(source: impl Fn() -> Vec<T> + 'static, current: Binding<T>) -> Self {
        Self {
            source: Box::new(source),
            current,
            items: Vec::new(),
            index: 0,
        }
    }
}

impl<T: Clone> PhaseHandler for Loop<T> {
    fn setup_render(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        self.items = (self.source)();
        self.index = 0;
        match self.items.first() {
            Some(first) => {
                self.current.set(Some(first.clone()));
                Ok(PhaseOutcome::Continue)
            }
            None => Ok(PhaseOutcome::SkipBody),
        }
    }

    fn after_render_body(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        self.index += 1;
        match self.items.get(self.index) {
            Some(item) => {
                self.current.set(Some(item.clone()));
                Ok(PhaseOutcome::Repeat)
            }
            None => Ok(PhaseOutcome::Continue),
        }
    }

    fn cleanup_render(&mut self, _cx: &mut RenderContext<'_>) -> PhaseResult {
        self.current.set(None);
        self.items.clear();
        Ok(PhaseOutcome::Continue)
    }
}
