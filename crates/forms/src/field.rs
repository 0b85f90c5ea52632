/// Optional field behaviors, queried with [`Field::supports`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldCapability {
    /// The field can be rendered disabled and is then ignored on submission.
    Disable,
    /// The field renders client-side validation hints (`required`, `maxlength`, ...).
    ClientValidation,
}

/// A form control as seen by translators, validators and the tracker.
pub trait Field {
    /// Name of the control in the submitted form data.
    fn control_name(&self) -> &str;

    /// Human-readable label used in messages.
    fn label(&self) -> &str;

    /// DOM id, once the field has rendered.
    fn client_id(&self) -> Option<&str> {
        None
    }

    fn is_disabled(&self) -> bool {
        false
    }

    fn is_required(&self) -> bool {
        false
    }

    fn supports(&self, _capability: FieldCapability) -> bool {
        false
    }
}

/// Plain field description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldInfo {
    pub control_name: String,
    pub label: String,
    pub client_id: Option<String>,
    pub disabled: bool,
    pub required: bool,
}

impl FieldInfo {
    pub fn new(control_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            control_name: control_name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl Field for FieldInfo {
    fn control_name(&self) -> &str {
        &self.control_name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn supports(&self, capability: FieldCapability) -> bool {
        matches!(capability, FieldCapability::Disable)
    }
}
