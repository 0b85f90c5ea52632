//! Incremental markup tree used by the render pipeline.
//!
//! Components write through a streaming API ([`MarkupTree::open_element`],
//! [`MarkupTree::write_text`], [`MarkupTree::close_element`]) while the tree stays addressable
//! for later edits; the document is serialized once at the end of a render pass by a pluggable
//! [`MarkupModel`].

mod debug;
mod error;
mod escape;
mod ids;
mod listener;
mod model;
mod serialize;
mod tree;
mod types;
mod view;

pub use crate::error::MarkupError;
pub use crate::escape::{escape_attribute, escape_text};
pub use crate::ids::IdAllocator;
pub use crate::listener::{ListenerId, MarkupListener};
pub use crate::model::{
    EndTagStyle, Html5MarkupModel, MarkupModel, ModelKind, UnknownModel, XmlMarkupModel,
};
pub use crate::tree::{AttrPair, ElementMut, MarkupConfig, MarkupTree, XML_NAMESPACE_URI};
pub use crate::types::{Attribute, NamespaceDecl, NodeId};
pub use crate::view::{ElementRef, NodeKind, NodeRef};
