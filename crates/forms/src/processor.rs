use std::collections::HashMap;

use crate::error::UnassociatedError;
use crate::field::Field;
use crate::pipeline::FieldTranslationPipeline;
use crate::tracker::ValidationTracker;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormsConfig {
    /// Hidden field carrying the encoded validation tracker.
    pub tracker_field: String,
    /// Class added to labels and fields in error.
    pub error_class: String,
    /// Upper bound for the encoded tracker blob.
    pub max_blob_bytes: usize,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            tracker_field: "t:formdata".to_string(),
            error_class: "error".to_string(),
            max_blob_bytes: 64 * 1024,
        }
    }
}

/// Decoded form post: control name to submitted value. A repeated name keeps the first value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSubmission {
    values: HashMap<String, String>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, control_name: &str) -> Option<&str> {
        self.values.get(control_name).map(String::as_str)
    }

    pub fn insert(&mut self, control_name: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(control_name.into())
            .or_insert_with(|| value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = FormSubmission::new();
        for (name, value) in iter {
            submission.insert(name, value);
        }
        submission
    }
}

/// Result of processing one field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldOutcome<T> {
    /// Translated and validated; `None` for an empty field.
    Value(Option<T>),
    /// An error was recorded in the tracker.
    Invalid,
    /// Disabled fields are not read from the submission.
    Skipped,
}

impl<T> FieldOutcome<T> {
    pub fn value(self) -> Option<T> {
        match self {
            FieldOutcome::Value(value) => value,
            FieldOutcome::Invalid | FieldOutcome::Skipped => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldOutcome::Invalid)
    }
}

/// Applies a submission to a tracker one field at a time.
///
/// Errors never escape a field: translation and validation failures are recorded against the
/// field and processing moves on to the next one.
#[derive(Debug)]
pub struct FormProcessor<'a> {
    tracker: &'a mut ValidationTracker,
    submission: &'a FormSubmission,
    processed: usize,
}

impl<'a> FormProcessor<'a> {
    /// Clears `tracker` so the submission starts from a blank slate.
    pub fn new(tracker: &'a mut ValidationTracker, submission: &'a FormSubmission) -> Self {
        tracker.clear();
        Self {
            tracker,
            submission,
            processed: 0,
        }
    }

    /// Records the raw input, translates it and, only if that worked, validates the value.
    pub fn process_field<T>(
        &mut self,
        field: &dyn Field,
        pipeline: &FieldTranslationPipeline<T>,
    ) -> FieldOutcome<T> {
        if field.is_disabled() {
            log::trace!(target: "weft.forms", "{}: disabled, skipped", field.control_name());
            return FieldOutcome::Skipped;
        }
        self.processed += 1;
        let input = self.submission.get(field.control_name());
        self.tracker.record_input(field, input.unwrap_or_default());

        let value = match pipeline.parse_client(field, input) {
            Ok(value) => value,
            Err(err) => {
                log::debug!(
                    target: "weft.forms",
                    "{}: translation failed: {err}",
                    field.control_name()
                );
                self.tracker.record_error(field, err.message());
                return FieldOutcome::Invalid;
            }
        };

        match pipeline.validate(field, value.as_ref()) {
            Ok(()) => FieldOutcome::Value(value),
            Err(err) => {
                log::debug!(
                    target: "weft.forms",
                    "{}: validation failed: {err}",
                    field.control_name()
                );
                self.tracker.record_error(field, err.message());
                FieldOutcome::Invalid
            }
        }
    }

    /// Runs a form-level check; a failure is recorded as an unassociated error.
    pub fn validate_form(
        &mut self,
        check: impl FnOnce(&ValidationTracker) -> Result<(), UnassociatedError>,
    ) {
        if let Err(err) = check(self.tracker) {
            log::debug!(target: "weft.forms", "form validation failed: {err}");
            self.tracker.record_unassociated_error(&err.0);
        }
    }

    pub fn tracker(&self) -> &ValidationTracker {
        &*self.tracker
    }

    /// True when the submission produced no errors.
    pub fn finish(self) -> bool {
        let valid = !self.tracker.has_errors();
        log::debug!(
            target: "weft.forms",
            "processed {} field(s), {} error(s)",
            self.processed,
            self.tracker.all_errors().len()
        );
        valid
    }
}
