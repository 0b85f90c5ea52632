//! Read-only views over tree nodes, handed to listeners and inspection code.

use crate::tree::MarkupTree;
use crate::types::{Attribute, ElementData, NamespaceDecl, NodeData, NodeId};

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) tree: &'a MarkupTree,
    pub(crate) id: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub enum NodeKind<'a> {
    Document,
    Element(ElementRef<'a>),
    Text(&'a str),
    Raw(&'a str),
    Comment(&'a str),
    CData(&'a str),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.tree.arena_node(self.id).parent
    }

    pub fn children(&self) -> &'a [NodeId] {
        self.tree.arena_node(self.id).data.children().unwrap_or(&[])
    }

    pub fn kind(&self) -> NodeKind<'a> {
        match &self.tree.arena_node(self.id).data {
            NodeData::Document { .. } => NodeKind::Document,
            NodeData::Element(_) => NodeKind::Element(ElementRef {
                tree: self.tree,
                id: self.id,
            }),
            NodeData::Text(text) => NodeKind::Text(text),
            NodeData::Raw(text) => NodeKind::Raw(text),
            NodeData::Comment(text) => NodeKind::Comment(text),
            NodeData::CData(text) => NodeKind::CData(text),
        }
    }

    pub fn as_element(&self) -> Option<ElementRef<'a>> {
        match self.kind() {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Borrowed view of one element.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub(crate) tree: &'a MarkupTree,
    pub(crate) id: NodeId,
}

impl<'a> ElementRef<'a> {
    fn data(&self) -> &'a ElementData {
        match &self.tree.arena_node(self.id).data {
            NodeData::Element(element) => element,
            _ => unreachable!("ElementRef always points at an element"),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.data().namespace.as_deref()
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        &self.data().attributes
    }

    pub fn namespace_declarations(&self) -> &'a [NamespaceDecl] {
        &self.data().namespaces
    }

    /// Value of the un-namespaced attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|a| a.matches(None, name))
            .map(|a| a.value.as_str())
    }

    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|a| a.matches(Some(namespace), name))
            .map(|a| a.value.as_str())
    }

    pub fn children(&self) -> &'a [NodeId] {
        &self.data().children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.tree.arena_node(self.id).parent
    }

    /// Concatenated text of all descendant text and CDATA nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<NodeId> = self.children().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            match &self.tree.arena_node(id).data {
                NodeData::Text(text) | NodeData::CData(text) => out.push_str(text),
                NodeData::Element(element) => stack.extend(element.children.iter().rev()),
                _ => {}
            }
        }
        out
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("attributes", &self.attributes())
            .finish()
    }
}
