//! Per-component handler ordering.
//!
//! A component and its mixins form a small dependency graph built from `before:` / `after:`
//! constraints. The graph is sorted with Kahn's algorithm; ready nodes are taken in declaration
//! order (the component itself counts as declared last), so unconstrained handlers keep the
//! order they were attached in.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// What an ordering constraint points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderTarget {
    Mixin(String),
    /// Every mixin declared without constraints.
    Default,
    /// Every other mixin.
    All,
    /// The core component.
    Component,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderConstraint {
    Before(OrderTarget),
    After(OrderTarget),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid ordering constraint `{0}`, expected `before:<target>` or `after:<target>`")]
pub struct InvalidConstraint(pub String);

impl FromStr for OrderConstraint {
    type Err = InvalidConstraint;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidConstraint(raw.to_string());
        let (direction, target) = raw.split_once(':').ok_or_else(invalid)?;
        let target = match target.trim() {
            "" => return Err(invalid()),
            "*" => OrderTarget::All,
            t if t.eq_ignore_ascii_case("default") => OrderTarget::Default,
            t if t.eq_ignore_ascii_case("component") => OrderTarget::Component,
            t => OrderTarget::Mixin(t.to_string()),
        };
        match direction.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(OrderConstraint::Before(target)),
            "after" => Ok(OrderConstraint::After(target)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for OrderConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (direction, target) = match self {
            OrderConstraint::Before(t) => ("before", t),
            OrderConstraint::After(t) => ("after", t),
        };
        let target = match target {
            OrderTarget::Mixin(name) => name.as_str(),
            OrderTarget::Default => "default",
            OrderTarget::All => "*",
            OrderTarget::Component => "component",
        };
        write!(f, "{direction}:{target}")
    }
}

/// A slot in a resolved handler order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerRef {
    Component,
    /// Index into the component's mixins, in declaration order.
    Mixin(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum OrderingError {
    UnknownTarget { mixin: String, target: String },
    Cycle { members: Vec<String> },
}

/// Ordering input for one mixin.
pub(crate) struct MixinOrder<'a> {
    pub name: &'a str,
    pub constraints: &'a [OrderConstraint],
}

pub(crate) fn resolve(mixins: &[MixinOrder<'_>]) -> Result<Vec<HandlerRef>, OrderingError> {
    let count = mixins.len();
    let component = count;
    let mut edges: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count + 1];
    let is_default = |i: usize| mixins[i].constraints.is_empty();
    let targets_all = |i: usize, before: bool| {
        mixins[i].constraints.iter().any(|c| match c {
            OrderConstraint::Before(OrderTarget::All) => before,
            OrderConstraint::After(OrderTarget::All) => !before,
            _ => false,
        })
    };

    for (i, mixin) in mixins.iter().enumerate() {
        let after_component = mixin
            .constraints
            .iter()
            .any(|c| *c == OrderConstraint::After(OrderTarget::Component));
        if after_component {
            edges[component].insert(i);
        } else {
            edges[i].insert(component);
        }

        for constraint in mixin.constraints {
            let (before, target) = match constraint {
                OrderConstraint::Before(t) => (true, t),
                OrderConstraint::After(t) => (false, t),
            };
            let others: Vec<usize> = match target {
                OrderTarget::Component => continue,
                OrderTarget::Mixin(name) => {
                    let Some(j) = mixins.iter().position(|m| m.name == name.as_str()) else {
                        return Err(OrderingError::UnknownTarget {
                            mixin: mixin.name.to_string(),
                            target: name.clone(),
                        });
                    };
                    vec![j]
                }
                OrderTarget::Default => (0..count).filter(|&j| j != i && is_default(j)).collect(),
                // Two mixins both asking to go first (or last) stay in declaration order
                // relative to each other.
                OrderTarget::All => (0..count)
                    .filter(|&j| j != i && !targets_all(j, before))
                    .collect(),
            };
            for j in others {
                if before {
                    edges[i].insert(j);
                } else {
                    edges[j].insert(i);
                }
            }
        }
    }

    let mut indegree = vec![0usize; count + 1];
    for targets in &edges {
        for &t in targets {
            indegree[t] += 1;
        }
    }
    let mut ready: BTreeSet<usize> = (0..=count).filter(|&n| indegree[n] == 0).collect();
    let mut order = Vec::with_capacity(count + 1);
    while let Some(node) = ready.pop_first() {
        order.push(if node == component {
            HandlerRef::Component
        } else {
            HandlerRef::Mixin(node)
        });
        for &t in &edges[node] {
            indegree[t] -= 1;
            if indegree[t] == 0 {
                ready.insert(t);
            }
        }
    }

    if order.len() <= count {
        let members = (0..=count)
            .filter(|&n| indegree[n] > 0)
            .map(|n| {
                if n == component {
                    "component".to_string()
                } else {
                    mixins[n].name.to_string()
                }
            })
            .collect();
        return Err(OrderingError::Cycle { members });
    }
    Ok(order)
}
