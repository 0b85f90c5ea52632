//! Serialization strategies ("markup models").
//!
//! The tree itself is model-agnostic; the model decides how empty elements end, how character
//! data is escaped, and whether CDATA sections survive.

use std::fmt::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use crate::escape::{escape_attribute, escape_text};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndTagStyle {
    /// No end tag at all (`<br>`); content written into such an element is still emitted.
    Void,
    /// `<x/>` when empty.
    SelfClose,
    /// Always `<x></x>`.
    Expanded,
}

pub trait MarkupModel: fmt::Debug {
    fn end_tag_style(&self, element: &str) -> EndTagStyle;

    fn encode_text(&self, text: &str, out: &mut dyn Write) -> fmt::Result {
        escape_text(text, out)
    }

    fn encode_attribute(&self, value: &str, out: &mut dyn Write) -> fmt::Result {
        escape_attribute(value, out)
    }

    fn write_cdata(&self, content: &str, out: &mut dyn Write) -> fmt::Result;
}

const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Permissive HTML5 output: void elements have no end tag, everything else is expanded, CDATA is
/// written as escaped text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Html5MarkupModel;

impl MarkupModel for Html5MarkupModel {
    fn end_tag_style(&self, element: &str) -> EndTagStyle {
        if HTML_VOID_ELEMENTS
            .iter()
            .any(|void| void.eq_ignore_ascii_case(element))
        {
            EndTagStyle::Void
        } else {
            EndTagStyle::Expanded
        }
    }

    fn write_cdata(&self, content: &str, out: &mut dyn Write) -> fmt::Result {
        escape_text(content, out)
    }
}

/// Strict XML output: empty elements self-close and CDATA sections are preserved.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlMarkupModel;

impl MarkupModel for XmlMarkupModel {
    fn end_tag_style(&self, _element: &str) -> EndTagStyle {
        EndTagStyle::SelfClose
    }

    fn write_cdata(&self, content: &str, out: &mut dyn Write) -> fmt::Result {
        out.write_str("<![CDATA[")?;
        // A literal "]]>" must be split across two sections.
        let mut parts = content.split("]]>");
        if let Some(first) = parts.next() {
            out.write_str(first)?;
        }
        for part in parts {
            out.write_str("]]]]><![CDATA[>")?;
            out.write_str(part)?;
        }
        out.write_str("]]>")
    }
}

/// Configuration-level selector for the built-in models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelKind {
    #[default]
    Html5,
    Xml,
}

impl ModelKind {
    pub fn build(self) -> Arc<dyn MarkupModel + Send + Sync> {
        match self {
            ModelKind::Html5 => Arc::new(Html5MarkupModel),
            ModelKind::Xml => Arc::new(XmlMarkupModel),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown markup model `{0}` (expected `html5` or `xml`)")]
pub struct UnknownModel(pub String);

impl FromStr for ModelKind {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "html5" => Ok(ModelKind::Html5),
            "xml" | "xhtml" => Ok(ModelKind::Xml),
            other => Err(UnknownModel(other.to_string())),
        }
    }
}
