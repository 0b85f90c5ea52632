//! The render tree: components, their mixins and their children, stored in an arena.

use std::fmt;

use crate::error::RenderError;
use crate::ordering::{self, HandlerRef, MixinOrder, OrderConstraint, OrderingError};
use crate::phase::{PhaseHandler, RenderPhase};

/// Path-like component id, unique within a page: `page.form.email`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn root(local: &str) -> Result<Self, RenderError> {
        validate_local(local)?;
        Ok(Self(local.to_string()))
    }

    pub fn child(&self, local: &str) -> Result<Self, RenderError> {
        validate_local(local)?;
        Ok(Self(format!("{}.{local}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment.
    pub fn local(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Address of a mixin attached to this component: `page.form:tracker`.
    pub fn mixin_address(&self, mixin: &str) -> String {
        format!("{}:{mixin}", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_local(local: &str) -> Result<(), RenderError> {
    let valid = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidId(local.to_string()))
    }
}

/// Index of a component in its [`RenderTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentKey(usize);

/// Where a component is in the current pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    NotStarted,
    InSetup,
    InBegin,
    InBody,
    InAfterBody,
    InAfter,
    InCleanup,
    Done,
}

impl RenderState {
    pub(crate) fn entering(phase: RenderPhase) -> Self {
        match phase {
            RenderPhase::SetupRender => RenderState::InSetup,
            RenderPhase::BeginRender => RenderState::InBegin,
            RenderPhase::BeforeRenderBody => RenderState::InBody,
            RenderPhase::AfterRenderBody => RenderState::InAfterBody,
            RenderPhase::AfterRender => RenderState::InAfter,
            RenderPhase::CleanupRender => RenderState::InCleanup,
        }
    }
}

/// A mixin waiting to be attached to a component.
pub struct Mixin {
    pub(crate) name: String,
    pub(crate) constraints: Vec<OrderConstraint>,
    pub(crate) handler: Box<dyn PhaseHandler>,
}

impl Mixin {
    pub fn new(name: impl Into<String>, handler: impl PhaseHandler + 'static) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Adds an ordering constraint such as `before:default` or `after:component`.
    pub fn order(mut self, constraint: &str) -> Result<Self, RenderError> {
        let parsed = constraint
            .parse::<OrderConstraint>()
            .map_err(|err| RenderError::InvalidOrderConstraint(err.0))?;
        self.constraints.push(parsed);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixin")
            .field("name", &self.name)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) parent: Option<ComponentKey>,
    pub(crate) children: Vec<ComponentKey>,
    pub(crate) handler: Box<dyn PhaseHandler>,
    pub(crate) mixins: Vec<Mixin>,
    pub(crate) order: Option<Vec<HandlerRef>>,
    pub(crate) state: RenderState,
    pub(crate) repeats: u32,
}

impl ComponentSlot {
    /// Label used in diagnostics: `component` or `component:mixin`.
    pub(crate) fn handler_label(&self, handler: HandlerRef) -> String {
        match handler {
            HandlerRef::Component => self.id.to_string(),
            HandlerRef::Mixin(i) => self.id.mixin_address(&self.mixins[i].name),
        }
    }
}

/// Component tree for one page. Components are only ever added, so keys stay valid for the
/// lifetime of the tree.
pub struct RenderTree {
    slots: Vec<ComponentSlot>,
}

impl RenderTree {
    pub fn new(root: &str, handler: impl PhaseHandler + 'static) -> Result<Self, RenderError> {
        let id = ComponentId::root(root)?;
        Ok(Self {
            slots: vec![ComponentSlot::new(id, None, Box::new(handler))],
        })
    }

    pub fn root(&self) -> ComponentKey {
        ComponentKey(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds a child component; children render in the order they were added.
    pub fn add_child(
        &mut self,
        parent: ComponentKey,
        local: &str,
        handler: impl PhaseHandler + 'static,
    ) -> Result<ComponentKey, RenderError> {
        self.add_child_boxed(parent, local, Box::new(handler))
    }

    pub fn add_child_boxed(
        &mut self,
        parent: ComponentKey,
        local: &str,
        handler: Box<dyn PhaseHandler>,
    ) -> Result<ComponentKey, RenderError> {
        let id = self.slot(parent)?.id.child(local)?;
        if self.slots.iter().any(|slot| slot.id == id) {
            return Err(RenderError::DuplicateId(id));
        }
        let key = ComponentKey(self.slots.len());
        self.slots.push(ComponentSlot::new(id, Some(parent), handler));
        self.slots[parent.0].children.push(key);
        Ok(key)
    }

    pub fn add_mixin(&mut self, component: ComponentKey, mixin: Mixin) -> Result<(), RenderError> {
        let slot = self.slot_mut(component)?;
        if slot.mixins.iter().any(|m| m.name == mixin.name) {
            return Err(RenderError::DuplicateMixin {
                component: slot.id.clone(),
                mixin: mixin.name,
            });
        }
        slot.mixins.push(mixin);
        slot.order = None;
        Ok(())
    }

    pub fn id(&self, key: ComponentKey) -> Option<&ComponentId> {
        self.slots.get(key.0).map(|slot| &slot.id)
    }

    pub fn parent(&self, key: ComponentKey) -> Option<ComponentKey> {
        self.slots.get(key.0)?.parent
    }

    pub fn children(&self, key: ComponentKey) -> &[ComponentKey] {
        self.slots
            .get(key.0)
            .map_or(&[][..], |slot| slot.children.as_slice())
    }

    pub fn state(&self, key: ComponentKey) -> Option<RenderState> {
        self.slots.get(key.0).map(|slot| slot.state)
    }

    pub fn find(&self, id: &str) -> Option<ComponentKey> {
        self.slots
            .iter()
            .position(|slot| slot.id.as_str() == id)
            .map(ComponentKey)
    }

    /// Handler labels for `key` in resolved begin-phase order.
    pub fn handler_order(&mut self, key: ComponentKey) -> Result<Vec<String>, RenderError> {
        self.resolve_order(key)?;
        let slot = self.slot(key)?;
        Ok(slot
            .order
            .iter()
            .flatten()
            .map(|&handler| slot.handler_label(handler))
            .collect())
    }

    /// Ids from the root down to `key`.
    pub fn ancestry(&self, key: ComponentKey) -> Vec<ComponentId> {
        let mut chain = Vec::new();
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            let Some(slot) = self.slots.get(current.0) else {
                break;
            };
            chain.push(slot.id.clone());
            cursor = slot.parent;
        }
        chain.reverse();
        chain
    }

    /// `key` and its descendants in document order.
    pub(crate) fn subtree(&self, key: ComponentKey) -> Vec<ComponentKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    pub(crate) fn resolve_order(&mut self, key: ComponentKey) -> Result<(), RenderError> {
        let slot = self.slot_mut(key)?;
        if slot.order.is_some() {
            return Ok(());
        }
        let input: Vec<MixinOrder<'_>> = slot
            .mixins
            .iter()
            .map(|m| MixinOrder {
                name: &m.name,
                constraints: &m.constraints,
            })
            .collect();
        let resolved = ordering::resolve(&input).map_err(|err| match err {
            OrderingError::UnknownTarget { mixin, target } => RenderError::UnknownOrderTarget {
                component: slot.id.clone(),
                mixin,
                target,
            },
            OrderingError::Cycle { members } => RenderError::MixinOrderCycle {
                component: slot.id.clone(),
                members,
            },
        })?;
        log::trace!(
            target: "weft.render",
            "resolved handler order for {}: {resolved:?}",
            slot.id
        );
        slot.order = Some(resolved);
        Ok(())
    }

    pub(crate) fn slot(&self, key: ComponentKey) -> Result<&ComponentSlot, RenderError> {
        self.slots
            .get(key.0)
            .ok_or(RenderError::UnknownComponent(key.0))
    }

    pub(crate) fn slot_mut(&mut self, key: ComponentKey) -> Result<&mut ComponentSlot, RenderError> {
        self.slots
            .get_mut(key.0)
            .ok_or(RenderError::UnknownComponent(key.0))
    }
}

impl ComponentSlot {
    fn new(id: ComponentId, parent: Option<ComponentKey>, handler: Box<dyn PhaseHandler>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            handler,
            mixins: Vec::new(),
            order: None,
            state: RenderState::NotStarted,
            repeats: 0,
        }
    }
}

impl fmt::Debug for RenderTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.slots.iter().map(|slot| slot.id.as_str()).collect();
        f.debug_struct("RenderTree").field("components", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl PhaseHandler for Noop {}

    #[test]
    fn ids_are_paths() {
        let mut tree = RenderTree::new("page", Noop).unwrap();
        let form = tree.add_child(tree.root(), "form", Noop).unwrap();
        let email = tree.add_child(form, "email", Noop).unwrap();
        assert_eq!(tree.id(email).unwrap().as_str(), "page.form.email");
        assert_eq!(tree.id(email).unwrap().local(), "email");
        assert_eq!(tree.find("page.form"), Some(form));
        let chain: Vec<String> = tree.ancestry(email).iter().map(|id| id.to_string()).collect();
        assert_eq!(chain, vec!["page", "page.form", "page.form.email"]);
    }

    #[test]
    fn duplicate_and_invalid_ids_are_rejected() {
        let mut tree = RenderTree::new("page", Noop).unwrap();
        tree.add_child(tree.root(), "form", Noop).unwrap();
        assert!(matches!(
            tree.add_child(tree.root(), "form", Noop),
            Err(RenderError::DuplicateId(_))
        ));
        assert!(matches!(
            tree.add_child(tree.root(), "a.b", Noop),
            Err(RenderError::InvalidId(_))
        ));
        assert!(matches!(RenderTree::new("", Noop), Err(RenderError::InvalidId(_))));
    }

    #[test]
    fn mixin_names_are_unique_per_component() {
        let mut tree = RenderTree::new("page", Noop).unwrap();
        let root = tree.root();
        tree.add_mixin(root, Mixin::new("tracker", Noop)).unwrap();
        let err = tree.add_mixin(root, Mixin::new("tracker", Noop)).unwrap_err();
        assert!(matches!(err, RenderError::DuplicateMixin { .. }));
    }

    #[test]
    fn handler_order_uses_addresses() {
        let mut tree = RenderTree::new("page", Noop).unwrap();
        let root = tree.root();
        tree.add_mixin(root, Mixin::new("plain", Noop)).unwrap();
        tree.add_mixin(root, Mixin::new("first", Noop).order("before:default").unwrap())
            .unwrap();
        assert_eq!(
            tree.handler_order(root).unwrap(),
            vec!["page:first", "page:plain", "page"]
        );
    }

    #[test]
    fn ordering_errors_name_the_component() {
        let mut tree = RenderTree::new("page", Noop).unwrap();
        let root = tree.root();
        tree.add_mixin(root, Mixin::new("a", Noop).order("after:missing").unwrap())
            .unwrap();
        let err = tree.handler_order(root).unwrap_err();
        assert_eq!(
            err.to_string(),
            "mixin page:a is ordered against unknown mixin `missing`"
        );
    }
}
