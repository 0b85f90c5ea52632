//! Single-pass serialization of a [`MarkupTree`].
//!
//! The walk is iterative (explicit enter/exit stack) so arbitrarily deep trees cannot overflow
//! the call stack. Serialization never mutates the tree.

use std::fmt::{self, Write};

use crate::error::MarkupError;
use crate::escape::escape_attribute;
use crate::model::EndTagStyle;
use crate::tree::MarkupTree;
use crate::types::{ElementData, NodeData, NodeId};

#[derive(Clone, Copy)]
enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

impl MarkupTree {
    /// Serializes the whole document, doctype included.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.len() * 24);
        let _ = self.write_to(&mut out);
        log::debug!(target: "weft.markup", "serialized {} nodes into {} bytes", self.len(), out.len());
        out
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        if let Some(doctype) = self.doctype() {
            write!(out, "<!DOCTYPE {doctype}>")?;
        }
        self.write_subtree(NodeId::DOCUMENT, out)
    }

    /// Serializes one node and its descendants, e.g. the content of a zone for a partial update.
    pub fn serialize_node(&self, id: NodeId) -> Result<String, MarkupError> {
        if self.node(id).is_none() {
            return Err(MarkupError::UnknownNode(id));
        }
        let mut out = String::new();
        let _ = self.write_subtree(id, &mut out);
        Ok(out)
    }

    /// Serializes only the children of `id`.
    pub fn serialize_children(&self, id: NodeId) -> Result<String, MarkupError> {
        let node = self.node(id).ok_or(MarkupError::UnknownNode(id))?;
        let mut out = String::new();
        for &child in node.children() {
            let _ = self.write_subtree(child, &mut out);
        }
        Ok(out)
    }

    fn write_subtree(&self, root: NodeId, out: &mut dyn Write) -> fmt::Result {
        let model = self.model();
        let mut stack = vec![Step::Enter(root)];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Exit(id) => {
                    if let NodeData::Element(element) = &self.arena_node(id).data {
                        out.write_str("</")?;
                        self.write_element_name(id, element, out)?;
                        out.write_char('>')?;
                    }
                    continue;
                }
                Step::Enter(id) => id,
            };

            match &self.arena_node(id).data {
                NodeData::Document { children, .. } => {
                    stack.extend(children.iter().rev().map(|&c| Step::Enter(c)));
                }
                NodeData::Element(element) => {
                    out.write_char('<')?;
                    self.write_element_name(id, element, out)?;
                    self.write_namespace_declarations(id, element, out)?;
                    for attribute in &element.attributes {
                        out.write_char(' ')?;
                        if let Some(uri) = attribute.namespace.as_deref() {
                            if let Some(prefix) = self.resolve_prefix(id, uri, false) {
                                out.write_str(prefix)?;
                                out.write_char(':')?;
                            }
                        }
                        out.write_str(&attribute.name)?;
                        out.write_str("=\"")?;
                        model.encode_attribute(&attribute.value, out)?;
                        out.write_char('"')?;
                    }

                    let style = model.end_tag_style(&element.name);
                    if element.children.is_empty() {
                        match style {
                            EndTagStyle::Void => out.write_char('>')?,
                            EndTagStyle::SelfClose => out.write_str("/>")?,
                            EndTagStyle::Expanded => {
                                out.write_str("></")?;
                                self.write_element_name(id, element, out)?;
                                out.write_char('>')?;
                            }
                        }
                        continue;
                    }

                    out.write_char('>')?;
                    if style != EndTagStyle::Void {
                        stack.push(Step::Exit(id));
                    }
                    stack.extend(element.children.iter().rev().map(|&c| Step::Enter(c)));
                }
                NodeData::Text(text) => model.encode_text(text, out)?,
                NodeData::Raw(markup) => out.write_str(markup)?,
                NodeData::Comment(comment) => {
                    out.write_str("<!--")?;
                    out.write_str(comment)?;
                    out.write_str("-->")?;
                }
                NodeData::CData(content) => model.write_cdata(content, out)?,
            }
        }
        Ok(())
    }

    fn write_element_name(
        &self,
        id: NodeId,
        element: &ElementData,
        out: &mut dyn Write,
    ) -> fmt::Result {
        if let Some(uri) = element.namespace.as_deref() {
            if let Some(prefix) = self.resolve_prefix(id, uri, true) {
                if !prefix.is_empty() {
                    out.write_str(prefix)?;
                    out.write_char(':')?;
                }
            }
        }
        out.write_str(&element.name)
    }

    fn write_namespace_declarations(
        &self,
        id: NodeId,
        element: &ElementData,
        out: &mut dyn Write,
    ) -> fmt::Result {
        let document_level = self.arena_node(id).parent == Some(NodeId::DOCUMENT);
        let inherited = if document_level {
            self.arena_node(NodeId::DOCUMENT).data.namespaces()
        } else {
            &[]
        };
        for decl in inherited.iter().chain(element.namespaces.iter()) {
            if decl.prefix.is_empty() {
                out.write_str(" xmlns=\"")?;
            } else {
                write!(out, " xmlns:{}=\"", decl.prefix)?;
            }
            escape_attribute(&decl.uri, out)?;
            out.write_char('"')?;
        }
        Ok(())
    }
}
