use core_types::Messages;

use crate::error::ValidationError;
use crate::field::Field;

/// Converts between a server-side value and the string a client submits.
pub trait Translator<T> {
    fn name(&self) -> &'static str;

    fn to_client(&self, value: &T) -> String;

    /// `input` is never blank; blank input is handled by the null strategy first.
    fn parse_client(
        &self,
        field: &dyn Field,
        input: &str,
        messages: &dyn Messages,
    ) -> Result<T, ValidationError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StringTranslator;

impl Translator<String> for StringTranslator {
    fn name(&self) -> &'static str {
        "string"
    }

    fn to_client(&self, value: &String) -> String {
        value.clone()
    }

    fn parse_client(
        &self,
        _field: &dyn Field,
        input: &str,
        _messages: &dyn Messages,
    ) -> Result<String, ValidationError> {
        Ok(input.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerTranslator;

impl Translator<i64> for IntegerTranslator {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn to_client(&self, value: &i64) -> String {
        value.to_string()
    }

    fn parse_client(
        &self,
        field: &dyn Field,
        input: &str,
        messages: &dyn Messages,
    ) -> Result<i64, ValidationError> {
        input.trim().parse::<i64>().map_err(|_| {
            ValidationError::new(messages.format("integer-format", &[field.label()]))
        })
    }
}

/// Finite `f64` values only.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalTranslator;

impl Translator<f64> for DecimalTranslator {
    fn name(&self) -> &'static str {
        "decimal"
    }

    fn to_client(&self, value: &f64) -> String {
        value.to_string()
    }

    fn parse_client(
        &self,
        field: &dyn Field,
        input: &str,
        messages: &dyn Messages,
    ) -> Result<f64, ValidationError> {
        match input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ValidationError::new(
                messages.format("number-format", &[field.label()]),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldInfo;
    use crate::messages::default_messages;

    #[test]
    fn integer_round_trip_and_failure() {
        let field = FieldInfo::new("age", "Age");
        let messages = default_messages();
        assert_eq!(IntegerTranslator.to_client(&-42), "-42");
        assert_eq!(
            IntegerTranslator.parse_client(&field, " 17 ", &messages),
            Ok(17)
        );
        assert_eq!(
            IntegerTranslator
                .parse_client(&field, "17.5", &messages)
                .unwrap_err()
                .message(),
            "You must provide an integer value for Age."
        );
    }

    #[test]
    fn decimal_rejects_non_finite() {
        let field = FieldInfo::new("price", "Price");
        let messages = default_messages();
        assert_eq!(
            DecimalTranslator.parse_client(&field, "2.50", &messages),
            Ok(2.5)
        );
        assert!(DecimalTranslator
            .parse_client(&field, "inf", &messages)
            .is_err());
        assert!(DecimalTranslator
            .parse_client(&field, "NaN", &messages)
            .is_err());
    }

    #[test]
    fn strings_pass_through() {
        let field = FieldInfo::new("name", "Name");
        assert_eq!(
            StringTranslator.parse_client(&field, "  Ada ", &default_messages()),
            Ok("  Ada ".to_string())
        );
    }
}
