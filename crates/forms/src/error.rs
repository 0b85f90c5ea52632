/// A field value failed translation or validation. Carries the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A form-level problem not tied to a single field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct UnassociatedError(pub String);

impl From<ValidationError> for UnassociatedError {
    fn from(err: ValidationError) -> Self {
        UnassociatedError(err.message)
    }
}
