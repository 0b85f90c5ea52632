//! Incremental markup tree with a streaming-writer API.
//!
//! Rendering code writes in document order (`open_element`, `write_text`, `close_element`), but
//! the result is an addressable arena of nodes: already written elements can still receive
//! attributes or children through [`ElementMut`] until the tree is serialized.
//!
//! Invariants:
//! - Node 0 is the document; every other node has exactly one parent.
//! - The cursor is always an element that is open, or `None` for the document level.
//! - Attribute names are unique per element and namespace; the first write wins.

use std::fmt;
use std::sync::Arc;

use crate::error::MarkupError;
use crate::listener::{ListenerEntry, ListenerId, MarkupListener};
use crate::model::{MarkupModel, ModelKind};
use crate::types::{ArenaNode, ElementData, NamespaceDecl, NodeData, NodeId};
use crate::view::{ElementRef, NodeRef};

/// `(name, value)`; `None` values are skipped.
pub type AttrPair<'a> = (&'a str, Option<&'a str>);

pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";
const XML_PREFIX: &str = "xml";

#[derive(Clone, Debug)]
pub struct MarkupConfig {
    /// Merge adjacent `write_text` calls into a single text node.
    pub coalesce_text: bool,
    pub model: ModelKind,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            coalesce_text: true,
            model: ModelKind::Html5,
        }
    }
}

pub struct MarkupTree {
    nodes: Vec<ArenaNode>,
    current: Option<NodeId>,
    config: MarkupConfig,
    model: Arc<dyn MarkupModel + Send + Sync>,
    listeners: Vec<ListenerEntry>,
    next_listener: u32,
    next_prefix: u32,
}

impl MarkupTree {
    pub fn new(config: MarkupConfig) -> Self {
        let model = config.model.build();
        Self::with_model(config, model)
    }

    /// Uses a caller-supplied serialization strategy instead of `config.model`.
    pub fn with_model(config: MarkupConfig, model: Arc<dyn MarkupModel + Send + Sync>) -> Self {
        Self {
            nodes: vec![ArenaNode {
                parent: None,
                data: NodeData::Document {
                    doctype: None,
                    namespaces: Vec::new(),
                    children: Vec::new(),
                },
            }],
            current: None,
            config,
            model,
            listeners: Vec::new(),
            next_listener: 0,
            next_prefix: 0,
        }
    }

    pub fn model(&self) -> &(dyn MarkupModel + Send + Sync) {
        self.model.as_ref()
    }

    pub fn set_doctype(&mut self, doctype: impl Into<String>) {
        if let NodeData::Document { doctype: dt, .. } = &mut self.nodes[0].data {
            *dt = Some(doctype.into());
        }
    }

    pub fn doctype(&self) -> Option<&str> {
        match &self.nodes[0].data {
            NodeData::Document { doctype, .. } => doctype.as_deref(),
            _ => None,
        }
    }

    /// The open element new content is written into, or `None` at document level.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.current;
        while let Some(id) = cursor {
            depth += 1;
            cursor = self.element_parent(id);
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    // ----- streaming API -------------------------------------------------------------------

    pub fn open_element(&mut self, name: &str, attrs: &[AttrPair<'_>]) -> NodeId {
        let id = self.push_element(ElementData::new(name, None));
        self.apply_attributes(id, attrs);
        self.current = Some(id);
        log::trace!(target: "weft.markup", "open <{name}> as {id}");
        self.notify(id, true);
        id
    }

    /// Opens an element in namespace `uri`, declaring a generated prefix on it when no
    /// enclosing element already binds the namespace.
    pub fn open_element_ns(&mut self, uri: &str, name: &str, attrs: &[AttrPair<'_>]) -> NodeId {
        let namespace = (!uri.is_empty()).then_some(uri);
        let id = self.push_element(ElementData::new(name, namespace));
        if let Some(uri) = namespace {
            self.ensure_prefix(id, uri, true);
        }
        self.apply_attributes(id, attrs);
        self.current = Some(id);
        log::trace!(target: "weft.markup", "open <{name}> in {uri} as {id}");
        self.notify(id, true);
        id
    }

    /// Closes the current element and returns the element that becomes current.
    pub fn close_element(&mut self) -> Result<Option<NodeId>, MarkupError> {
        let closing = self.current.ok_or(MarkupError::UnbalancedClose)?;
        self.current = self.element_parent(closing);
        log::trace!(target: "weft.markup", "close {closing}");
        self.notify(closing, false);
        Ok(self.current)
    }

    pub fn write_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.current.unwrap_or(NodeId::DOCUMENT);
        if self.config.coalesce_text {
            let last = self.nodes[parent.index()]
                .data
                .children()
                .and_then(|children| children.last().copied());
            if let Some(last) = last {
                if let NodeData::Text(existing) = &mut self.nodes[last.index()].data {
                    existing.push_str(text);
                    return;
                }
            }
        }
        self.push_child(parent, NodeData::Text(text.to_string()));
    }

    /// Appends markup that is emitted verbatim, without escaping.
    pub fn write_raw(&mut self, markup: &str) {
        let parent = self.current.unwrap_or(NodeId::DOCUMENT);
        self.push_child(parent, NodeData::Raw(markup.to_string()));
    }

    pub fn write_comment(&mut self, comment: &str) {
        let parent = self.current.unwrap_or(NodeId::DOCUMENT);
        self.push_child(parent, NodeData::Comment(comment.to_string()));
    }

    pub fn write_cdata(&mut self, content: &str) {
        let parent = self.current.unwrap_or(NodeId::DOCUMENT);
        self.push_child(parent, NodeData::CData(content.to_string()));
    }

    /// Adds attributes to the current element. Names already present keep their first value.
    pub fn set_attributes(&mut self, attrs: &[AttrPair<'_>]) -> Result<(), MarkupError> {
        let current = self.current.ok_or(MarkupError::NoCurrentElement)?;
        self.apply_attributes(current, attrs);
        Ok(())
    }

    /// Adds a namespaced attribute to the current element, declaring a prefix if needed.
    pub fn set_attribute_ns(
        &mut self,
        uri: &str,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), MarkupError> {
        let current = self.current.ok_or(MarkupError::NoCurrentElement)?;
        let Some(value) = value else {
            return Ok(());
        };
        if uri.is_empty() {
            self.apply_attributes(current, &[(name, Some(value))]);
            return Ok(());
        }
        self.ensure_prefix(current, uri, false);
        self.element_data_mut(current)?
            .add_attribute(Some(uri), name, value);
        Ok(())
    }

    /// Binds `prefix` to `uri` on the current element (or the document when nothing is open).
    /// An empty prefix declares the default namespace.
    pub fn define_namespace(&mut self, uri: &str, prefix: &str) -> Result<(), MarkupError> {
        if prefix == "xmlns" || (prefix == XML_PREFIX && uri != XML_NAMESPACE_URI) {
            return Err(MarkupError::ReservedPrefix {
                prefix: prefix.to_string(),
                uri: uri.to_string(),
            });
        }
        if uri == XML_NAMESPACE_URI {
            return Ok(());
        }
        let target = self.current.unwrap_or(NodeId::DOCUMENT);
        let decl = NamespaceDecl {
            uri: uri.to_string(),
            prefix: prefix.to_string(),
        };
        match &mut self.nodes[target.index()].data {
            NodeData::Document { namespaces, .. } => push_decl(namespaces, decl),
            NodeData::Element(element) => push_decl(&mut element.namespaces, decl),
            _ => unreachable!("cursor always points at a container"),
        }
        Ok(())
    }

    // ----- listeners -----------------------------------------------------------------------

    pub fn add_listener(&mut self, listener: Box<dyn MarkupListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(ListenerEntry { id, listener });
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn MarkupListener>> {
        let index = self.listeners.iter().position(|entry| entry.id == id)?;
        Some(self.listeners.remove(index).listener)
    }

    fn notify(&mut self, id: NodeId, started: bool) {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        for entry in &mut listeners {
            let element = ElementRef { tree: self, id };
            if started {
                entry.listener.element_started(element);
            } else {
                entry.listener.element_ended(element);
            }
        }
        self.listeners = listeners;
    }

    // ----- inspection ----------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.node(id).and_then(|node| node.as_element())
    }

    pub fn document(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId::DOCUMENT,
        }
    }

    /// First top-level element.
    pub fn root_element(&self) -> Option<ElementRef<'_>> {
        self.document()
            .children()
            .iter()
            .find_map(|&child| self.element(child))
    }

    /// Element whose `id` attribute equals `dom_id`, in document order.
    pub fn element_by_id(&self, dom_id: &str) -> Option<ElementRef<'_>> {
        let mut stack = vec![NodeId::DOCUMENT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if let NodeData::Element(element) = &node.data {
                if element
                    .attributes
                    .iter()
                    .any(|a| a.matches(None, "id") && a.value == dom_id)
                {
                    return self.element(id);
                }
            }
            if let Some(children) = node.data.children() {
                stack.extend(children.iter().rev());
            }
        }
        None
    }

    /// Follows a `/`-separated path of element names from the document, e.g. `html/head`.
    /// Each step picks the first child element with that name (ASCII case-insensitive).
    pub fn find(&self, path: &str) -> Option<ElementRef<'_>> {
        let mut cursor = NodeId::DOCUMENT;
        for step in path.split('/').filter(|s| !s.is_empty()) {
            cursor = self.nodes[cursor.index()]
                .data
                .children()?
                .iter()
                .copied()
                .find(|&child| match &self.nodes[child.index()].data {
                    NodeData::Element(element) => element.name.eq_ignore_ascii_case(step),
                    _ => false,
                })?;
        }
        self.element(cursor)
    }

    // ----- retroactive editing -------------------------------------------------------------

    pub fn element_mut(&mut self, id: NodeId) -> Result<ElementMut<'_>, MarkupError> {
        self.element_data_mut(id)?;
        Ok(ElementMut { tree: self, id })
    }

    // ----- internals -----------------------------------------------------------------------

    pub(crate) fn arena_node(&self, id: NodeId) -> &ArenaNode {
        &self.nodes[id.index()]
    }

    fn element_data_mut(&mut self, id: NodeId) -> Result<&mut ElementData, MarkupError> {
        match self.nodes.get_mut(id.index()) {
            Some(ArenaNode {
                data: NodeData::Element(element),
                ..
            }) => Ok(element),
            Some(_) => Err(MarkupError::NotAnElement(id)),
            None => Err(MarkupError::UnknownNode(id)),
        }
    }

    /// Parent if it is an element; `None` when the parent is the document.
    fn element_parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()]
            .parent
            .filter(|&parent| parent != NodeId::DOCUMENT)
    }

    fn push_element(&mut self, element: ElementData) -> NodeId {
        let parent = self.current.unwrap_or(NodeId::DOCUMENT);
        self.push_child(parent, NodeData::Element(element))
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode {
            parent: Some(parent),
            data,
        });
        match self.nodes[parent.index()].data.children_mut() {
            Some(children) => children.push(id),
            None => unreachable!("markup parent cannot have children"),
        }
        id
    }

    fn insert_child_first(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode {
            parent: Some(parent),
            data,
        });
        match self.nodes[parent.index()].data.children_mut() {
            Some(children) => children.insert(0, id),
            None => unreachable!("markup parent cannot have children"),
        }
        id
    }

    fn apply_attributes(&mut self, id: NodeId, attrs: &[AttrPair<'_>]) {
        if let NodeData::Element(element) = &mut self.nodes[id.index()].data {
            for (name, value) in attrs {
                if let Some(value) = value {
                    element.add_attribute(None, name, value);
                }
            }
        }
    }

    /// Prefix bound to `uri` in scope at `id`. Attributes cannot use the default namespace,
    /// so `allow_default` is false for them.
    pub(crate) fn resolve_prefix(&self, id: NodeId, uri: &str, allow_default: bool) -> Option<&str> {
        if uri == XML_NAMESPACE_URI {
            return Some(XML_PREFIX);
        }
        let mut cursor = Some(id);
        while let Some(node_id) = cursor {
            let node = &self.nodes[node_id.index()];
            if let Some(decl) = node
                .data
                .namespaces()
                .iter()
                .find(|decl| decl.uri == uri && (allow_default || !decl.prefix.is_empty()))
            {
                return Some(&decl.prefix);
            }
            cursor = node.parent;
        }
        None
    }

    fn prefix_in_scope(&self, id: NodeId, prefix: &str) -> bool {
        let mut cursor = Some(id);
        while let Some(node_id) = cursor {
            let node = &self.nodes[node_id.index()];
            if node.data.namespaces().iter().any(|decl| decl.prefix == prefix) {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    fn ensure_prefix(&mut self, id: NodeId, uri: &str, allow_default: bool) {
        if self.resolve_prefix(id, uri, allow_default).is_some() {
            return;
        }
        let prefix = loop {
            let candidate = format!("ns{}", self.next_prefix);
            self.next_prefix += 1;
            if !self.prefix_in_scope(id, &candidate) {
                break candidate;
            }
        };
        log::trace!(target: "weft.markup", "allocated prefix {prefix} for {uri} on {id}");
        if let NodeData::Element(element) = &mut self.nodes[id.index()].data {
            element.namespaces.push(NamespaceDecl {
                uri: uri.to_string(),
                prefix,
            });
        }
    }
}

fn push_decl(namespaces: &mut Vec<NamespaceDecl>, decl: NamespaceDecl) {
    match namespaces.iter_mut().find(|d| d.prefix == decl.prefix) {
        Some(existing) => existing.uri = decl.uri,
        None => namespaces.push(decl),
    }
}

impl fmt::Debug for MarkupTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupTree")
            .field("nodes", &self.nodes.len())
            .field("current", &self.current)
            .field("config", &self.config)
            .field("model", &self.model)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Mutable handle on an element that was already written, possibly closed.
///
/// Used for retroactive edits such as filling in a `for` attribute once the target field has
/// rendered. Children added here do not move the cursor and do not notify listeners.
pub struct ElementMut<'a> {
    tree: &'a mut MarkupTree,
    id: NodeId,
}

impl ElementMut<'_> {
    fn data(&mut self) -> &mut ElementData {
        match &mut self.tree.nodes[self.id.index()].data {
            NodeData::Element(element) => element,
            _ => unreachable!("ElementMut always points at an element"),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// First-write-wins, like [`MarkupTree::set_attributes`].
    pub fn attribute(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.data().add_attribute(None, name, value);
        }
        self
    }

    /// Replaces an existing value; `None` removes the attribute.
    pub fn force_attribute(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.data().force_attribute(name, value);
        self
    }

    /// Appends a class name to the `class` attribute unless already present.
    pub fn add_class_name(&mut self, class: &str) -> &mut Self {
        let current = self
            .data()
            .attributes
            .iter()
            .find(|a| a.matches(None, "class"))
            .map(|a| a.value.clone());
        let updated = match current {
            Some(existing) if existing.split_whitespace().any(|c| c == class) => return self,
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.data().force_attribute("class", Some(&updated));
        self
    }

    pub fn append_text(&mut self, text: &str) -> &mut Self {
        self.tree.push_child(self.id, NodeData::Text(text.to_string()));
        self
    }

    /// Adds a child element at the end of this element's children.
    pub fn append_element(&mut self, name: &str, attrs: &[AttrPair<'_>]) -> NodeId {
        let child = self
            .tree
            .push_child(self.id, NodeData::Element(ElementData::new(name, None)));
        self.tree.apply_attributes(child, attrs);
        child
    }

    /// Adds a child element before all existing children.
    pub fn prepend_element(&mut self, name: &str, attrs: &[AttrPair<'_>]) -> NodeId {
        let child = self
            .tree
            .insert_child_first(self.id, NodeData::Element(ElementData::new(name, None)));
        self.tree.apply_attributes(child, attrs);
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MarkupTree {
        MarkupTree::new(MarkupConfig::default())
    }

    #[test]
    fn attributes_are_first_write_wins() {
        let mut t = tree();
        let div = t.open_element("div", &[("x", Some("a"))]);
        t.set_attributes(&[("x", Some("b")), ("y", None), ("z", Some("c"))])
            .unwrap();
        let element = t.element(div).unwrap();
        assert_eq!(element.attribute("x"), Some("a"));
        assert_eq!(element.attribute("y"), None);
        assert_eq!(element.attribute("z"), Some("c"));
        assert_eq!(element.attributes().len(), 2);
    }

    #[test]
    fn attribute_names_are_case_sensitive() {
        let mut t = tree();
        let div = t.open_element("div", &[("data-X", Some("1")), ("data-x", Some("2"))]);
        assert_eq!(t.element(div).unwrap().attributes().len(), 2);
    }

    #[test]
    fn close_past_root_is_unbalanced() {
        let mut t = tree();
        t.open_element("html", &[]);
        t.open_element("body", &[]);
        assert!(t.close_element().unwrap().is_some());
        assert_eq!(t.close_element().unwrap(), None);
        assert_eq!(t.close_element(), Err(MarkupError::UnbalancedClose));
    }

    #[test]
    fn set_attributes_without_open_element_fails() {
        let mut t = tree();
        assert_eq!(
            t.set_attributes(&[("x", Some("1"))]),
            Err(MarkupError::NoCurrentElement)
        );
    }

    #[test]
    fn text_writes_coalesce_and_land_at_document_level_when_nothing_is_open() {
        let mut t = tree();
        t.write_text("a");
        t.write_text("b");
        assert_eq!(t.document().children().len(), 1);

        let mut no_coalesce = MarkupTree::new(MarkupConfig {
            coalesce_text: false,
            ..MarkupConfig::default()
        });
        no_coalesce.write_text("a");
        no_coalesce.write_text("b");
        assert_eq!(no_coalesce.document().children().len(), 2);
    }

    #[test]
    fn namespace_prefix_is_allocated_once_and_reused_by_descendants() {
        let mut t = MarkupTree::new(MarkupConfig {
            model: ModelKind::Xml,
            ..MarkupConfig::default()
        });
        let outer = t.open_element_ns("urn:a", "outer", &[]);
        let inner = t.open_element_ns("urn:a", "inner", &[]);
        assert_eq!(t.element(outer).unwrap().namespace_declarations().len(), 1);
        assert!(t.element(inner).unwrap().namespace_declarations().is_empty());
        assert_eq!(t.resolve_prefix(inner, "urn:a", true), Some("ns0"));
    }

    #[test]
    fn explicit_namespace_definition_wins_over_generated_prefix() {
        let mut t = tree();
        t.open_element("root", &[]);
        t.define_namespace("urn:svg", "svg").unwrap();
        let circle = t.open_element_ns("urn:svg", "circle", &[]);
        assert_eq!(t.resolve_prefix(circle, "urn:svg", true), Some("svg"));
        assert!(t.element(circle).unwrap().namespace_declarations().is_empty());
    }

    #[test]
    fn reserved_prefixes_are_rejected() {
        let mut t = tree();
        assert!(matches!(
            t.define_namespace("urn:x", "xmlns"),
            Err(MarkupError::ReservedPrefix { .. })
        ));
        assert!(t.define_namespace(XML_NAMESPACE_URI, "xml").is_ok());
    }

    #[test]
    fn element_mut_edits_closed_elements() {
        let mut t = tree();
        let label = t.open_element("label", &[("class", Some("control-label"))]);
        t.write_text("Email");
        t.close_element().unwrap();
        t.element_mut(label)
            .unwrap()
            .attribute("for", Some("email"))
            .add_class_name("error")
            .add_class_name("error");
        let element = t.element(label).unwrap();
        assert_eq!(element.attribute("for"), Some("email"));
        assert_eq!(element.attribute("class"), Some("control-label error"));
    }

    #[test]
    fn element_mut_rejects_non_elements() {
        let mut t = tree();
        t.open_element("p", &[]);
        t.write_text("x");
        let text = NodeId(2);
        assert_eq!(t.element_mut(text).err(), Some(MarkupError::NotAnElement(text)));
        assert_eq!(
            t.element_mut(NodeId(99)).err(),
            Some(MarkupError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn find_and_element_by_id() {
        let mut t = tree();
        t.open_element("html", &[]);
        t.open_element("head", &[]);
        t.close_element().unwrap();
        t.open_element("body", &[]);
        t.open_element("div", &[("id", Some("zone"))]);
        assert_eq!(t.find("html/HEAD").map(|e| e.name()), Some("head"));
        assert_eq!(t.find("html/nav"), None);
        assert_eq!(t.element_by_id("zone").map(|e| e.name()), Some("div"));
        assert!(t.element_by_id("missing").is_none());
    }
}
