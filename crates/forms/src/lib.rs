//! Form input handling: translating field values to and from their client strings, validating
//! them, and tracking submitted input and errors across requests.

mod error;
mod events;
mod field;
mod messages;
mod nulls;
mod pipeline;
mod processor;
mod tracker;
mod translator;
mod validator;

pub use error::{UnassociatedError, ValidationError};
pub use events::{FieldEvents, ParseClientHandler, ToClientHandler, ValidateHandler};
pub use field::{Field, FieldCapability, FieldInfo};
pub use messages::default_messages;
pub use nulls::{DefaultNullFieldStrategy, NullFieldStrategy, ZeroNullFieldStrategy};
pub use pipeline::FieldTranslationPipeline;
pub use processor::{FieldOutcome, FormProcessor, FormSubmission, FormsConfig};
pub use tracker::{FieldTracker, ValidationTracker};
pub use translator::{DecimalTranslator, IntegerTranslator, StringTranslator, Translator};
pub use validator::{Blank, Max, MaxLength, Min, MinLength, Required, Validator};
