//! Core component library built on the render and forms pipeline.
//!
//! Components are cheap handles: the copy added to a [`render::RenderTree`] and the copy the
//! host keeps share state, so the host can render a form and later process its submission.

mod binding;
mod errors;
mod form;
mod label;
mod looping;
mod output;
mod page;
mod text_field;
mod zone;

pub use binding::Binding;
pub use errors::Errors;
pub use form::{Form, FormField, TrackerHandle};
pub use label::Label;
pub use looping::Loop;
pub use output::Output;
pub use page::Page;
pub use text_field::TextField;
pub use zone::Zone;
