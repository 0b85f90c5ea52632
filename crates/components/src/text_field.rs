use std::cell::RefCell;
use std::rc::Rc;

use forms::{Field, FieldInfo, FieldOutcome, FieldTranslationPipeline, FormProcessor};
use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

use crate::binding::Binding;
use crate::form::{Form, FormField, TrackerHandle};

struct TextFieldInner<T> {
    info: RefCell<FieldInfo>,
    pipeline: FieldTranslationPipeline<T>,
    value: Binding<T>,
    tracker: TrackerHandle,
    error_class: String,
}

/// `<input type="text">` bound to a value through a translation pipeline.
///
/// On redisplay after a failed submission the raw input from the tracker is shown instead of
/// the bound value, so the user sees what they typed.
pub struct TextField<T> {
    inner: Rc<TextFieldInner<T>>,
}

impl<T: 'static> TextField<T> {
    /// Creates the field and registers it with `form`.
    pub fn new(
        form: &Form,
        mut info: FieldInfo,
        pipeline: FieldTranslationPipeline<T>,
        value: Binding<T>,
    ) -> Self {
        info.required |= pipeline.is_required();
        let inner = Rc::new(TextFieldInner {
            info: RefCell::new(info),
            pipeline,
            value,
            tracker: form.tracker(),
            error_class: form.config().error_class.clone(),
        });
        form.register(Rc::clone(&inner) as Rc<dyn FormField>);
        Self { inner }
    }

    /// Handle for labels and other components that point at this field.
    pub fn handle(&self) -> Rc<dyn FormField> {
        Rc::clone(&self.inner) as Rc<dyn FormField>
    }
}

impl<T> Clone for TextField<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> FormField for TextFieldInner<T> {
    fn snapshot(&self) -> FieldInfo {
        self.info.borrow().clone()
    }

    fn process(&self, processor: &mut FormProcessor<'_>) {
        let info = self.info.borrow();
        if let FieldOutcome::Value(value) = processor.process_field(&*info, &self.pipeline) {
            self.value.set(value);
        }
    }
}

impl<T> PhaseHandler for TextField<T> {
    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let inner = &self.inner;
        let client_id = {
            let mut info = inner.info.borrow_mut();
            let id = cx.allocate_client_id(&info.control_name);
            info.client_id = Some(id.clone());
            id
        };
        let info = inner.info.borrow();
        let tracker = inner.tracker.borrow();
        let value = match tracker.input(&*info) {
            Some(raw) => raw.to_string(),
            None => inner.value.with(|value| inner.pipeline.to_client(value)),
        };
        let in_error = tracker.in_error(&*info);

        let markup = cx.markup();
        markup.open_element(
            "input",
            &[
                ("type", Some("text")),
                ("name", Some(info.control_name())),
                ("id", Some(client_id.as_str())),
                ("value", Some(value.as_str())),
                ("class", in_error.then_some(inner.error_class.as_str())),
                ("required", info.is_required().then_some("required")),
                ("disabled", info.is_disabled().then_some("disabled")),
            ],
        );
        markup.close_element()?;
        Ok(PhaseOutcome::Continue)
    }
}
