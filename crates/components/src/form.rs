use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use forms::{
    FieldInfo, FormProcessor, FormSubmission, FormsConfig, UnassociatedError, ValidationTracker,
};
use persist::{ClientBlobCodec, PersistError};
use render::{PhaseError, PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

pub type TrackerHandle = Rc<RefCell<ValidationTracker>>;

type FormCheck = Box<dyn Fn(&ValidationTracker) -> Result<(), UnassociatedError>>;

/// A field that belongs to a [`Form`].
pub trait FormField {
    /// Current description of the field, including its client id once rendered.
    fn snapshot(&self) -> FieldInfo;

    /// Reads the field's value out of a submission.
    fn process(&self, processor: &mut FormProcessor<'_>);
}

struct FormInner {
    name: String,
    action: String,
    config: FormsConfig,
    codec: ClientBlobCodec,
    tracker: TrackerHandle,
    fields: RefCell<Vec<Rc<dyn FormField>>>,
    checks: RefCell<Vec<FormCheck>>,
}

/// `<form>` component.
///
/// Opens a heartbeat around its body so fields and labels can cross-reference each other, and
/// writes the validation tracker into a hidden field when it closes.
#[derive(Clone)]
pub struct Form {
    inner: Rc<FormInner>,
}

impl Form {
    pub fn new(name: impl Into<String>, action: impl Into<String>, config: FormsConfig) -> Self {
        let codec = ClientBlobCodec::new(config.max_blob_bytes);
        Self {
            inner: Rc::new(FormInner {
                name: name.into(),
                action: action.into(),
                config,
                codec,
                tracker: Rc::new(RefCell::new(ValidationTracker::new())),
                fields: RefCell::new(Vec::new()),
                checks: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &FormsConfig {
        &self.inner.config
    }

    pub fn tracker(&self) -> TrackerHandle {
        Rc::clone(&self.inner.tracker)
    }

    /// Fields are processed in registration order.
    pub fn register(&self, field: Rc<dyn FormField>) {
        self.inner.fields.borrow_mut().push(field);
    }

    /// Adds a form-level check run after every field was processed.
    pub fn on_validate(
        &self,
        check: impl Fn(&ValidationTracker) -> Result<(), UnassociatedError> + 'static,
    ) {
        self.inner.checks.borrow_mut().push(Box::new(check));
    }

    /// Processes every registered field, then the form-level checks. Returns true when the
    /// submission is valid.
    pub fn process_submission(&self, submission: &FormSubmission) -> bool {
        let mut tracker = self.inner.tracker.borrow_mut();
        let mut processor = FormProcessor::new(&mut tracker, submission);
        for field in self.inner.fields.borrow().iter() {
            field.process(&mut processor);
        }
        for check in self.inner.checks.borrow().iter() {
            processor.validate_form(|tracker| check(tracker));
        }
        let valid = processor.finish();
        log::debug!(
            target: "weft.forms",
            "form {} submission {}",
            self.inner.name,
            if valid { "accepted" } else { "rejected" }
        );
        valid
    }

    /// Swaps in a tracker loaded from session storage.
    pub fn replace_tracker(&self, tracker: ValidationTracker) {
        *self.inner.tracker.borrow_mut() = tracker;
    }

    pub fn encode_tracker(&self) -> Result<String, PersistError> {
        self.inner.codec.encode(&*self.inner.tracker.borrow())
    }

    /// Restores the tracker from the hidden field written by a previous render.
    pub fn restore_tracker(&self, blob: &str) -> Result<(), PersistError> {
        let tracker: ValidationTracker = self.inner.codec.decode(blob)?;
        self.replace_tracker(tracker);
        Ok(())
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields.borrow().len())
            .finish_non_exhaustive()
    }
}

impl PhaseHandler for Form {
    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let id = cx.allocate_client_id(&self.inner.name);
        cx.markup().open_element(
            "form",
            &[
                ("method", Some("post")),
                ("action", Some(self.inner.action.as_str())),
                ("id", Some(id.as_str())),
            ],
        );
        cx.begin_heartbeat();
        Ok(PhaseOutcome::Continue)
    }

    fn after_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        cx.end_heartbeat()?;
        let blob = self
            .encode_tracker()
            .map_err(|err| PhaseError::Other(Box::new(err)))?;
        let markup = cx.markup();
        markup.open_element(
            "input",
            &[
                ("type", Some("hidden")),
                ("name", Some(self.inner.config.tracker_field.as_str())),
                ("value", Some(blob.as_str())),
            ],
        );
        markup.close_element()?;
        markup.close_element()?;
        Ok(PhaseOutcome::Continue)
    }
}
