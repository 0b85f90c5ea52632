use std::fmt;

use crate::error::ValidationError;

pub type ToClientHandler<T> = Box<dyn Fn(&T) -> Option<String>>;
pub type ParseClientHandler<T> = Box<dyn Fn(&str) -> Option<Result<T, ValidationError>>>;
pub type ValidateHandler<T> = Box<dyn Fn(Option<&T>) -> Result<(), ValidationError>>;

/// Per-field event handlers that can override translation or add validation.
///
/// For `to-client` and `parse-client` the first handler returning `Some` wins and later
/// handlers are not called. `validate` handlers all run in order until one fails.
pub struct FieldEvents<T> {
    to_client: Vec<ToClientHandler<T>>,
    parse_client: Vec<ParseClientHandler<T>>,
    validate: Vec<ValidateHandler<T>>,
}

impl<T> FieldEvents<T> {
    pub fn new() -> Self {
        Self {
            to_client: Vec::new(),
            parse_client: Vec::new(),
            validate: Vec::new(),
        }
    }

    pub fn on_to_client(&mut self, handler: impl Fn(&T) -> Option<String> + 'static) {
        self.to_client.push(Box::new(handler));
    }

    pub fn on_parse_client(
        &mut self,
        handler: impl Fn(&str) -> Option<Result<T, ValidationError>> + 'static,
    ) {
        self.parse_client.push(Box::new(handler));
    }

    pub fn on_validate(
        &mut self,
        handler: impl Fn(Option<&T>) -> Result<(), ValidationError> + 'static,
    ) {
        self.validate.push(Box::new(handler));
    }

    pub(crate) fn trigger_to_client(&self, value: &T) -> Option<String> {
        self.to_client.iter().find_map(|handler| handler(value))
    }

    pub(crate) fn trigger_parse_client(&self, input: &str) -> Option<Result<T, ValidationError>> {
        self.parse_client.iter().find_map(|handler| handler(input))
    }

    pub(crate) fn trigger_validate(&self, value: Option<&T>) -> Result<(), ValidationError> {
        self.validate.iter().try_for_each(|handler| handler(value))
    }

    pub fn is_empty(&self) -> bool {
        self.to_client.is_empty() && self.parse_client.is_empty() && self.validate.is_empty()
    }
}

impl<T> Default for FieldEvents<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldEvents<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEvents")
            .field("to_client", &self.to_client.len())
            .field("parse_client", &self.parse_client.len())
            .field("validate", &self.validate.len())
            .finish()
    }
}
