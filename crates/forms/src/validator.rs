use core_types::Messages;

use crate::error::ValidationError;
use crate::field::Field;

/// Checks a translated value.
pub trait Validator<T> {
    fn name(&self) -> &'static str;

    /// Validators that do not accept null are skipped when the value is `None`.
    fn accepts_null(&self) -> bool {
        false
    }

    fn validate(
        &self,
        field: &dyn Field,
        value: Option<&T>,
        messages: &dyn Messages,
    ) -> Result<(), ValidationError>;
}

/// Values that can be "present but empty".
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for i64 {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for f64 {
    fn is_blank(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Required;

impl<T: Blank> Validator<T> for Required {
    fn name(&self) -> &'static str {
        "required"
    }

    fn accepts_null(&self) -> bool {
        true
    }

    fn validate(
        &self,
        field: &dyn Field,
        value: Option<&T>,
        messages: &dyn Messages,
    ) -> Result<(), ValidationError> {
        match value {
            Some(value) if !value.is_blank() => Ok(()),
            _ => Err(ValidationError::new(
                messages.format("required", &[field.label()]),
            )),
        }
    }
}

/// Minimum length in characters.
#[derive(Clone, Copy, Debug)]
pub struct MinLength(pub usize);

impl Validator<String> for MinLength {
    fn name(&self) -> &'static str {
        "minlength"
    }

    fn validate(
        &self,
        field: &dyn Field,
        value: Option<&String>,
        messages: &dyn Messages,
    ) -> Result<(), ValidationError> {
        match value {
            Some(value) if value.chars().count() < self.0 => {
                let min = self.0.to_string();
                Err(ValidationError::new(messages.format(
                    "minimum-string-length",
                    &[&min, field.label()],
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Maximum length in characters.
#[derive(Clone, Copy, Debug)]
pub struct MaxLength(pub usize);

impl Validator<String> for MaxLength {
    fn name(&self) -> &'static str {
        "maxlength"
    }

    fn validate(
        &self,
        field: &dyn Field,
        value: Option<&String>,
        messages: &dyn Messages,
    ) -> Result<(), ValidationError> {
        match value {
            Some(value) if value.chars().count() > self.0 => {
                let max = self.0.to_string();
                Err(ValidationError::new(messages.format(
                    "maximum-string-length",
                    &[&max, field.label()],
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Min(pub i64);

impl Validator<i64> for Min {
    fn name(&self) -> &'static str {
        "min"
    }

    fn validate(
        &self,
        field: &dyn Field,
        value: Option<&i64>,
        messages: &dyn Messages,
    ) -> Result<(), ValidationError> {
        match value {
            Some(&value) if value < self.0 => {
                let min = self.0.to_string();
                Err(ValidationError::new(
                    messages.format("min-integer", &[field.label(), &min]),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Max(pub i64);

impl Validator<i64> for Max {
    fn name(&self) -> &'static str {
        "max"
    }

    fn validate(
        &self,
        field: &dyn Field,
        value: Option<&i64>,
        messages: &dyn Messages,
    ) -> Result<(), ValidationError> {
        match value {
            Some(&value) if value > self.0 => {
                let max = self.0.to_string();
                Err(ValidationError::new(
                    messages.format("max-integer", &[field.label(), &max]),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldInfo;
    use crate::messages::default_messages;

    #[test]
    fn required_rejects_missing_and_blank() {
        let field = FieldInfo::new("name", "Name");
        let messages = default_messages();
        let blank = "   ".to_string();
        assert_eq!(
            Validator::<String>::validate(&Required, &field, None, &messages)
                .unwrap_err()
                .message(),
            "You must provide a value for Name."
        );
        assert!(Required.validate(&field, Some(&blank), &messages).is_err());
        assert!(Required.validate(&field, Some(&0i64), &messages).is_ok());
    }

    #[test]
    fn length_bounds_count_characters() {
        let field = FieldInfo::new("code", "Code");
        let messages = default_messages();
        let accented = "ééé".to_string();
        assert!(MinLength(3).validate(&field, Some(&accented), &messages).is_ok());
        assert!(MaxLength(3).validate(&field, Some(&accented), &messages).is_ok());
        assert_eq!(
            MaxLength(2)
                .validate(&field, Some(&accented), &messages)
                .unwrap_err()
                .message(),
            "You may provide at most 2 characters for Code."
        );
    }

    #[test]
    fn integer_bounds() {
        let field = FieldInfo::new("qty", "Quantity");
        let messages = default_messages();
        assert!(Min(1).validate(&field, Some(&1), &messages).is_ok());
        assert_eq!(
            Min(1)
                .validate(&field, Some(&0), &messages)
                .unwrap_err()
                .message(),
            "Quantity must be at least 1."
        );
        assert_eq!(
            Max(10)
                .validate(&field, Some(&11), &messages)
                .unwrap_err()
                .message(),
            "Quantity may not be larger than 10."
        );
    }
}
