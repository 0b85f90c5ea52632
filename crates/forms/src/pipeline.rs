use std::fmt;
use std::sync::Arc;

use core_types::Messages;

use crate::error::ValidationError;
use crate::events::FieldEvents;
use crate::field::Field;
use crate::nulls::{DefaultNullFieldStrategy, NullFieldStrategy};
use crate::translator::Translator;
use crate::validator::Validator;

/// Everything needed to move one field's value between server and client.
pub struct FieldTranslationPipeline<T> {
    translator: Box<dyn Translator<T>>,
    validators: Vec<Box<dyn Validator<T>>>,
    nulls: Box<dyn NullFieldStrategy>,
    events: FieldEvents<T>,
    messages: Arc<dyn Messages>,
}

impl<T> FieldTranslationPipeline<T> {
    pub fn new(translator: impl Translator<T> + 'static, messages: Arc<dyn Messages>) -> Self {
        Self {
            translator: Box::new(translator),
            validators: Vec::new(),
            nulls: Box::new(DefaultNullFieldStrategy),
            events: FieldEvents::new(),
            messages,
        }
    }

    /// Validators run in the order they are added.
    pub fn with_validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn with_nulls(mut self, nulls: impl NullFieldStrategy + 'static) -> Self {
        self.nulls = Box::new(nulls);
        self
    }

    pub fn events_mut(&mut self) -> &mut FieldEvents<T> {
        &mut self.events
    }

    pub fn messages(&self) -> &dyn Messages {
        self.messages.as_ref()
    }

    /// True when a `required` validator is declared.
    pub fn is_required(&self) -> bool {
        self.validators.iter().any(|v| v.name() == "required")
    }

    pub fn to_client(&self, value: Option<&T>) -> String {
        let Some(value) = value else {
            return self.nulls.replace_to_client();
        };
        self.events
            .trigger_to_client(value)
            .unwrap_or_else(|| self.translator.to_client(value))
    }

    /// Blank input is replaced by the null strategy before any handler or the translator sees
    /// it; a `None` replacement parses to `None`.
    pub fn parse_client(
        &self,
        field: &dyn Field,
        input: Option<&str>,
    ) -> Result<Option<T>, ValidationError> {
        let replaced;
        let input = match input {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => match self.nulls.replace_from_client() {
                Some(replacement) => {
                    replaced = replacement;
                    replaced.as_str()
                }
                None => return Ok(None),
            },
        };
        if let Some(result) = self.events.trigger_parse_client(input) {
            log::trace!(
                target: "weft.forms",
                "{}: parse-client handled by event",
                field.control_name()
            );
            return result.map(Some);
        }
        self.translator
            .parse_client(field, input, self.messages.as_ref())
            .map(Some)
    }

    /// Declared validators, then `validate` event handlers; the first failure wins.
    pub fn validate(&self, field: &dyn Field, value: Option<&T>) -> Result<(), ValidationError> {
        for validator in &self.validators {
            if value.is_none() && !validator.accepts_null() {
                continue;
            }
            validator.validate(field, value, self.messages.as_ref())?;
        }
        self.events.trigger_validate(value)
    }
}

impl<T> fmt::Debug for FieldTranslationPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators: Vec<&str> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("FieldTranslationPipeline")
            .field("translator", &self.translator.name())
            .field("validators", &validators)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
