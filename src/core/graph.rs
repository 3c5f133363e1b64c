use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::entity::Entity;
use crate::core::error::GraphError;
use crate::core::types::{COLOR_LENGTH, EdgeId, Endpoint, NodeId};
use crate::core::value::{Attrs, Value};

fn check_color(color: &str) -> Result<(), GraphError> {
    let len = color.chars().count();
    if len > COLOR_LENGTH {
        return Err(GraphError::ColorTooLong { len, max: COLOR_LENGTH });
    }
    Ok(())
}

/// A graph vertex. `id` stays `None` until the node is attached to a store.
///
/// Its `in_edges`/`out_edges` are not stored here; an [`Adjacency`](crate::core::navigate::Adjacency)
/// implementation supplies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Option<NodeId>,
    pub size: Option<i64>,
    pub label: Option<String>,
    color: Option<String>,
}

impl Node {
    pub fn new(label: impl Into<String>) -> Self {
        Node {
            label: Some(label.into()),
            ..Node::default()
        }
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color(&mut self, color: Option<String>) -> Result<(), GraphError> {
        if let Some(c) = &color {
            check_color(c)?;
        }
        self.color = color;
        Ok(())
    }

    //re-check invariants on values that bypassed the setters (deserialized data)
    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        self.color.as_deref().map_or(Ok(()), check_color)
    }

    #[cfg(test)]
    pub(crate) fn force_color(&mut self, color: &str) {
        self.color = Some(color.to_string());
    }
}

impl Entity for Node {
    type Id = NodeId;

    const ATTRS: &'static [&'static str] = &["size", "label", "color"];

    fn from_attrs(id: Option<NodeId>, attrs: Attrs) -> Result<Self, GraphError> {
        let mut node = Node { id, ..Node::default() };
        for (name, value) in attrs {
            match name.as_str() {
                "size" => node.size = Some(value.into_int()?),
                "label" => node.label = Some(value.into_text()?),
                "color" => node.set_color(Some(value.into_text()?))?,
                _ => return Err(GraphError::UnknownAttribute(name)),
            }
        }
        Ok(node)
    }
}

/// A directed connection between two nodes, held by endpoint id.
///
/// Positionally an edge is the pair `(source_id, target_id)`: index `0`/`-1` is the
/// source and `1`/`-2` the target, so it can be handed to code that only wants
/// the two ids (`let [s, t] = edge.endpoint_ids();` or `for id in &edge`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Option<EdgeId>,
    pub size: Option<i64>,
    pub label: Option<String>,
    pub weight: Option<f64>,
    color: Option<String>,
    pub directed: Option<bool>,
    pub source_id: Option<NodeId>,
    pub target_id: Option<NodeId>,
}

impl Edge {
    /// Build an edge from `attrs`, then point it at `source`/`target` when given.
    /// A missing endpoint can be filled in later by id or with [`Edge::set`].
    /// Given nodes must already have an id.
    pub fn connect_nodes(
        source: Option<&Node>,
        target: Option<&Node>,
        attrs: Attrs,
    ) -> Result<Edge, GraphError> {
        let mut edge = Edge::from_attrs(None, attrs)?;
        if let Some(node) = source {
            edge.set_source(node)?;
        }
        if let Some(node) = target {
            edge.set_target(node)?;
        }
        Ok(edge)
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color(&mut self, color: Option<String>) -> Result<(), GraphError> {
        if let Some(c) = &color {
            check_color(c)?;
        }
        self.color = color;
        Ok(())
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Option<NodeId> {
        match endpoint {
            Endpoint::Source => self.source_id,
            Endpoint::Target => self.target_id,
        }
    }

    /// `(source_id, target_id)`
    pub fn endpoints(&self) -> (Option<NodeId>, Option<NodeId>) {
        (self.source_id, self.target_id)
    }

    pub fn endpoint_ids(&self) -> [Option<NodeId>; 2] {
        [self.source_id, self.target_id]
    }

    /// An edge always has exactly two positions.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        2
    }

    /// Read the endpoint id at a positional index.
    pub fn get(&self, n: isize) -> Result<Option<NodeId>, GraphError> {
        Ok(self.endpoint(Endpoint::from_index(n)?))
    }

    /// Point the endpoint at positional index `n` to `node`.
    pub fn set(&mut self, n: isize, node: &Node) -> Result<(), GraphError> {
        let endpoint = Endpoint::from_index(n)?;
        self.set_endpoint(endpoint, node)
    }

    /// Untyped positional write. The value is checked to be a node before the
    /// index is looked at.
    pub fn set_item(&mut self, n: isize, value: Value) -> Result<(), GraphError> {
        let node = value.into_node()?;
        self.set(n, &node)
    }

    /// Record `node`'s id as the given endpoint. A node without an id is rejected
    /// and the endpoint keeps its previous value.
    pub fn set_endpoint(&mut self, endpoint: Endpoint, node: &Node) -> Result<(), GraphError> {
        let id = node.id.ok_or(GraphError::UnattachedNode { endpoint })?;
        trace!(%endpoint, node = id, "set edge endpoint");
        match endpoint {
            Endpoint::Source => self.source_id = Some(id),
            Endpoint::Target => self.target_id = Some(id),
        }
        Ok(())
    }

    pub fn set_source(&mut self, node: &Node) -> Result<(), GraphError> {
        self.set_endpoint(Endpoint::Source, node)
    }

    pub fn set_target(&mut self, node: &Node) -> Result<(), GraphError> {
        self.set_endpoint(Endpoint::Target, node)
    }

    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        self.color.as_deref().map_or(Ok(()), check_color)
    }

    #[cfg(test)]
    pub(crate) fn force_color(&mut self, color: &str) {
        self.color = Some(color.to_string());
    }
}

impl Entity for Edge {
    type Id = EdgeId;

    //color is a column but not part of the template set
    const ATTRS: &'static [&'static str] = &[
        "size",
        "label",
        "weight",
        "directed",
        "source_id",
        "target_id",
        "source",
        "target",
    ];

    fn from_attrs(id: Option<EdgeId>, attrs: Attrs) -> Result<Self, GraphError> {
        let mut edge = Edge { id, ..Edge::default() };
        for (name, value) in attrs {
            match name.as_str() {
                "size" => edge.size = Some(value.into_int()?),
                "label" => edge.label = Some(value.into_text()?),
                "weight" => edge.weight = Some(value.into_float()?),
                "color" => edge.set_color(Some(value.into_text()?))?,
                "directed" => edge.directed = Some(value.into_bool()?),
                "source_id" => edge.source_id = Some(value.into_node_id()?),
                "target_id" => edge.target_id = Some(value.into_node_id()?),
                "source" => edge.set_source(&value.into_node()?)?,
                "target" => edge.set_target(&value.into_node()?)?,
                _ => return Err(GraphError::UnknownAttribute(name)),
            }
        }
        Ok(edge)
    }
}

impl<'a> IntoIterator for &'a Edge {
    type Item = Option<NodeId>;
    type IntoIter = std::array::IntoIter<Option<NodeId>, 2>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoint_ids().into_iter()
    }
}

struct IdOrNone(Option<NodeId>);

impl fmt::Display for IdOrNone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "None"),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", IdOrNone(self.source_id), IdOrNone(self.target_id))
    }
}
