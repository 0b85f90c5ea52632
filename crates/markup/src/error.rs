use crate::types::NodeId;

/// Structural misuse of a [`crate::MarkupTree`]. These are programmer errors and are never
/// recovered from inside the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("close_element called with no open element")]
    UnbalancedClose,
    #[error("no element is open to receive attributes")]
    NoCurrentElement,
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("node {0} does not belong to this document")]
    UnknownNode(NodeId),
    #[error("namespace prefix `{prefix}` is reserved and cannot be bound to {uri}")]
    ReservedPrefix { prefix: String, uri: String },
}
