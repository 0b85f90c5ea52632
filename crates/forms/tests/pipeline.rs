use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use core_types::Messages;
use forms::{
    Field, FieldInfo, FieldOutcome, FieldTranslationPipeline, FormProcessor, FormSubmission,
    IntegerTranslator, MaxLength, Min, MinLength, Required, StringTranslator, Translator,
    UnassociatedError, ValidationError, Validator, ValidationTracker, ZeroNullFieldStrategy,
    default_messages,
};

fn messages() -> Arc<dyn Messages> {
    Arc::new(default_messages())
}

/// Fails every parse and counts calls.
struct Broken {
    calls: Rc<Cell<usize>>,
}

impl Translator<String> for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn to_client(&self, value: &String) -> String {
        self.calls.set(self.calls.get() + 1);
        value.clone()
    }

    fn parse_client(
        &self,
        _field: &dyn Field,
        _input: &str,
        _messages: &dyn Messages,
    ) -> Result<String, ValidationError> {
        self.calls.set(self.calls.get() + 1);
        Err(ValidationError::new("broken translator"))
    }
}

/// Counts how often it runs.
struct Counting(Rc<Cell<usize>>);

impl Validator<String> for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn validate(
        &self,
        _field: &dyn Field,
        _value: Option<&String>,
        _messages: &dyn Messages,
    ) -> Result<(), ValidationError> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

#[test]
fn parse_client_event_bypasses_the_translator() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = FieldTranslationPipeline::new(
        Broken {
            calls: Rc::clone(&calls),
        },
        messages(),
    );
    pipeline
        .events_mut()
        .on_parse_client(|_| None);
    pipeline
        .events_mut()
        .on_parse_client(|input| Some(Ok(input.to_uppercase())));
    let field = FieldInfo::new("code", "Code");
    assert_eq!(
        pipeline.parse_client(&field, Some("abc")),
        Ok(Some("ABC".to_string()))
    );
    assert_eq!(calls.get(), 0);
}

#[test]
fn null_values_use_the_null_strategy_only() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = FieldTranslationPipeline::new(
        Broken {
            calls: Rc::clone(&calls),
        },
        messages(),
    );
    pipeline
        .events_mut()
        .on_to_client(|_| Some("from event".into()));
    assert_eq!(pipeline.to_client(None), "");
    assert_eq!(calls.get(), 0);
    assert_eq!(pipeline.to_client(Some(&"x".into())), "from event");
    assert_eq!(calls.get(), 0);
}

#[test]
fn blank_input_takes_the_null_replacement() {
    let field = FieldInfo::new("qty", "Quantity");
    let plain = FieldTranslationPipeline::new(IntegerTranslator, messages());
    assert_eq!(plain.parse_client(&field, Some("   ")), Ok(None));
    assert_eq!(plain.parse_client(&field, None), Ok(None));

    let zero = FieldTranslationPipeline::new(IntegerTranslator, messages())
        .with_nulls(ZeroNullFieldStrategy);
    assert_eq!(zero.parse_client(&field, Some("")), Ok(Some(0)));
    assert_eq!(zero.to_client(None), "0");
}

#[test]
fn validators_short_circuit() {
    let counted = Rc::new(Cell::new(0));
    let pipeline = FieldTranslationPipeline::new(StringTranslator, messages())
        .with_validator(MinLength(5))
        .with_validator(Counting(Rc::clone(&counted)));
    let field = FieldInfo::new("name", "Name");
    let err = pipeline
        .validate(&field, Some(&"abc".to_string()))
        .unwrap_err();
    assert_eq!(err.message(), "You must provide at least 5 characters for Name.");
    assert_eq!(counted.get(), 0);
}

#[test]
fn null_values_skip_validators_that_reject_null() {
    let counted = Rc::new(Cell::new(0));
    let pipeline = FieldTranslationPipeline::new(StringTranslator, messages())
        .with_validator(Counting(Rc::clone(&counted)))
        .with_validator(MaxLength(3));
    let field = FieldInfo::new("name", "Name");
    assert!(pipeline.validate(&field, None).is_ok());
    assert_eq!(counted.get(), 0);

    let required = FieldTranslationPipeline::new(StringTranslator, messages())
        .with_validator(Required);
    assert!(required.is_required());
    assert!(required.validate(&field, None).is_err());
}

#[test]
fn validate_events_run_after_declared_validators() {
    let mut pipeline = FieldTranslationPipeline::new(IntegerTranslator, messages())
        .with_validator(Min(0));
    pipeline.events_mut().on_validate(|value| match value {
        Some(v) if v % 2 == 1 => Err(ValidationError::new("must be even")),
        _ => Ok(()),
    });
    let field = FieldInfo::new("n", "N");
    assert_eq!(
        pipeline.validate(&field, Some(&-1)).unwrap_err().message(),
        "N must be at least 0."
    );
    assert_eq!(
        pipeline.validate(&field, Some(&3)).unwrap_err().message(),
        "must be even"
    );
    assert!(pipeline.validate(&field, Some(&4)).is_ok());
}

#[test]
fn processor_records_errors_per_field() {
    let email = FieldInfo::new("email", "Email").required();
    let age = FieldInfo::new("age", "Age");
    let nickname = FieldInfo::new("nick", "Nickname").disabled();

    let email_pipeline = FieldTranslationPipeline::new(StringTranslator, messages())
        .with_validator(Required)
        .with_validator(MinLength(5));
    let age_validated = Rc::new(Cell::new(false));
    let mut age_pipeline =
        FieldTranslationPipeline::new(IntegerTranslator, messages()).with_validator(Min(0));
    let seen = Rc::clone(&age_validated);
    age_pipeline.events_mut().on_validate(move |_| {
        seen.set(true);
        Ok(())
    });
    let nick_pipeline = FieldTranslationPipeline::new(StringTranslator, messages());

    let submission: FormSubmission = [("email", "ab"), ("age", "old"), ("nick", "zed")]
        .into_iter()
        .collect();
    let mut tracker = ValidationTracker::new();
    let mut processor = FormProcessor::new(&mut tracker, &submission);

    assert!(processor.process_field(&email, &email_pipeline).is_invalid());
    assert!(processor.process_field(&age, &age_pipeline).is_invalid());
    assert_eq!(
        processor.process_field(&nickname, &nick_pipeline),
        FieldOutcome::Skipped
    );
    processor.validate_form(|tracker| {
        if tracker.has_errors() {
            Err(UnassociatedError("Please correct the errors below.".into()))
        } else {
            Ok(())
        }
    });
    assert!(!processor.finish());

    assert!(!age_validated.get());
    assert_eq!(tracker.input(&email), Some("ab"));
    assert_eq!(tracker.input(&age), Some("old"));
    assert_eq!(tracker.input(&nickname), None);
    assert_eq!(
        tracker.all_errors(),
        vec![
            "Please correct the errors below.",
            "You must provide at least 5 characters for Email.",
            "You must provide an integer value for Age.",
        ]
    );
}

#[test]
fn successful_submission_yields_values() {
    let qty = FieldInfo::new("qty", "Quantity");
    let pipeline = FieldTranslationPipeline::new(IntegerTranslator, messages())
        .with_validator(Min(1));
    let submission: FormSubmission = [("qty", "3")].into_iter().collect();
    let mut tracker = ValidationTracker::new();
    tracker.record_error(&qty, "stale error from last time");
    let mut processor = FormProcessor::new(&mut tracker, &submission);
    let outcome = processor.process_field(&qty, &pipeline);
    assert!(processor.finish());
    assert_eq!(outcome.value(), Some(3));
    assert!(!tracker.has_errors());
}
