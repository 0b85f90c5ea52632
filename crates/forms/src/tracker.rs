use persist::{DirtyFlag, DirtyTracked};
use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Submitted input and error for one control.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTracker {
    #[serde(rename = "n")]
    control_name: String,
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    input: Option<String>,
    #[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FieldTracker {
    pub fn control_name(&self) -> &str {
        &self.control_name
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Per-form record of what the user submitted and what was wrong with it, kept across the
/// redirect that follows a failed submission.
///
/// Every mutation marks the tracker dirty; reads never do, and reading an unknown field does
/// not create an entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationTracker {
    #[serde(rename = "f", default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldTracker>,
    #[serde(rename = "u", default, skip_serializing_if = "Vec::is_empty")]
    unassociated: Vec<String>,
    #[serde(skip)]
    dirty: DirtyFlag,
}

impl ValidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_input(&mut self, field: &dyn Field, input: &str) {
        self.tracker_mut(field.control_name()).input = Some(input.to_string());
        self.dirty.mark_dirty();
    }

    pub fn record_error(&mut self, field: &dyn Field, message: &str) {
        self.tracker_mut(field.control_name()).error = Some(message.to_string());
        self.dirty.mark_dirty();
    }

    pub fn record_unassociated_error(&mut self, message: &str) {
        self.unassociated.push(message.to_string());
        self.dirty.mark_dirty();
    }

    pub fn input(&self, field: &dyn Field) -> Option<&str> {
        self.tracker(field.control_name())?.input()
    }

    pub fn error(&self, field: &dyn Field) -> Option<&str> {
        self.tracker(field.control_name())?.error()
    }

    /// True when the field has a non-blank error.
    pub fn in_error(&self, field: &dyn Field) -> bool {
        self.error(field).is_some_and(|e| !e.trim().is_empty())
    }

    pub fn has_errors(&self) -> bool {
        !self.unassociated.is_empty() || self.fields.iter().any(|f| f.error.is_some())
    }

    /// Unassociated errors first, then field errors in the order fields were first recorded.
    pub fn all_errors(&self) -> Vec<&str> {
        self.unassociated
            .iter()
            .map(String::as_str)
            .chain(self.fields.iter().filter_map(FieldTracker::error))
            .collect()
    }

    pub fn unassociated_errors(&self) -> &[String] {
        &self.unassociated
    }

    pub fn fields(&self) -> &[FieldTracker] {
        &self.fields
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.unassociated.clear();
        self.dirty.mark_dirty();
    }

    fn tracker(&self, control_name: &str) -> Option<&FieldTracker> {
        self.fields.iter().find(|f| f.control_name == control_name)
    }

    fn tracker_mut(&mut self, control_name: &str) -> &mut FieldTracker {
        let index = match self.fields.iter().position(|f| f.control_name == control_name) {
            Some(index) => index,
            None => {
                self.fields.push(FieldTracker {
                    control_name: control_name.to_string(),
                    ..FieldTracker::default()
                });
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }
}

impl DirtyTracked for ValidationTracker {
    fn dirty_flag(&self) -> &DirtyFlag {
        &self.dirty
    }
}
