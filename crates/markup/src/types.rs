use std::fmt;

/// Arena handle for a node inside one [`crate::MarkupTree`].
///
/// Handles are only meaningful for the tree that issued them. `NodeId::DOCUMENT` is the implicit
/// document node that owns top-level content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const DOCUMENT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element attribute. `namespace` is the namespace URI, not the prefix; prefixes are
/// resolved during serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub(crate) fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == namespace
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub uri: String,
    pub prefix: String,
}

#[derive(Debug)]
pub(crate) struct ElementData {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) namespaces: Vec<NamespaceDecl>,
    pub(crate) children: Vec<NodeId>,
}

impl ElementData {
    pub(crate) fn new(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            attributes: Vec::new(),
            namespaces: Vec::new(),
            children: Vec::new(),
        }
    }

    /// First write wins: an attribute already present keeps its value.
    pub(crate) fn add_attribute(&mut self, namespace: Option<&str>, name: &str, value: &str) {
        if self.attributes.iter().any(|a| a.matches(namespace, name)) {
            return;
        }
        self.attributes.push(Attribute {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Overwrites (or removes, for `None`) an attribute in place, keeping its position.
    pub(crate) fn force_attribute(&mut self, name: &str, value: Option<&str>) {
        let existing = self.attributes.iter().position(|a| a.matches(None, name));
        match (existing, value) {
            (Some(index), Some(value)) => self.attributes[index].value = value.to_string(),
            (Some(index), None) => {
                self.attributes.remove(index);
            }
            (None, Some(value)) => self.add_attribute(None, name, value),
            (None, None) => {}
        }
    }
}

#[derive(Debug)]
pub(crate) enum NodeData {
    Document {
        doctype: Option<String>,
        namespaces: Vec<NamespaceDecl>,
        children: Vec<NodeId>,
    },
    Element(ElementData),
    Text(String),
    Raw(String),
    Comment(String),
    CData(String),
}

impl NodeData {
    pub(crate) fn children(&self) -> Option<&[NodeId]> {
        match self {
            NodeData::Document { children, .. } => Some(children),
            NodeData::Element(element) => Some(&element.children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeData::Document { children, .. } => Some(children),
            NodeData::Element(element) => Some(&mut element.children),
            _ => None,
        }
    }

    pub(crate) fn namespaces(&self) -> &[NamespaceDecl] {
        match self {
            NodeData::Document { namespaces, .. } => namespaces,
            NodeData::Element(element) => &element.namespaces,
            _ => &[],
        }
    }
}

#[derive(Debug)]
pub(crate) struct ArenaNode {
    /// Navigation only; the parent's `children` list is the owning edge.
    pub(crate) parent: Option<NodeId>,
    pub(crate) data: NodeData,
}
