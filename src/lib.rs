//! Node/edge entity types with graph navigation over an adapter-supplied adjacency.

pub mod core;
pub mod schema;

pub use crate::core::entity::Entity;
pub use crate::core::error::GraphError;
pub use crate::core::graph::{Edge, Node};
pub use crate::core::naming::to_snake_case;
pub use crate::core::navigate::{Adjacency, EdgeTargets, NodeView};
pub use crate::core::store::{GraphSnapshot, GraphStore};
pub use crate::core::types::{EdgeId, Endpoint, NodeId};
pub use crate::core::value::{AttributeSource, Attrs, Value};
pub use crate::schema::{Column, ColumnKind, GraphSchema};
pub use crate::schema::config::SchemaConfig;
