use thiserror::Error;

use crate::core::types::{EdgeId, Endpoint, NodeId};

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("only has source, target node. '{0}' is out of range")]
    IndexOutOfRange(isize),

    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("color is {len} characters long, max is {max}")]
    ColorTooLong { len: usize, max: usize },

    #[error("{endpoint} node has no id yet")]
    UnattachedNode { endpoint: Endpoint },

    #[error("no {0} ids left to assign")]
    IdsExhausted(&'static str),

    /// Referential integrity: an edge was attached without one of its endpoint ids.
    #[error("edge has no {endpoint} node id")]
    MissingEndpoint { endpoint: Endpoint },

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("node {0} already exists")]
    DuplicateNode(NodeId),

    #[error("edge {0} already exists")]
    DuplicateEdge(EdgeId),

    #[error("node {node} is still referenced by {edges} edge(s)")]
    NodeInUse { node: NodeId, edges: usize },

    #[error("config: {0}")]
    Config(String),

    #[error("snapshot: {0}")]
    Snapshot(String),
}
