use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::entity::Entity;
use crate::core::error::GraphError;
use crate::core::graph::{Edge, Node};
use crate::core::navigate::Adjacency;
use crate::core::types::{EdgeId, Endpoint, NodeId};
use crate::core::value::{AttributeSource, Attrs};

/// In-memory owner of nodes and edges. Ids are assigned when entities are attached,
/// starting at 1.
#[derive(Debug)]
pub struct GraphStore {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    //insertion-ordered adjacency, keyed by node
    out_adj: HashMap<NodeId, Vec<EdgeId>>,
    in_adj: HashMap<NodeId, Vec<EdgeId>>,
    //None once the id space is used up
    next_node_id: Option<NodeId>,
    next_edge_id: Option<EdgeId>,
}

//the counter only moves forward, and never past the last representable id
fn advance(next: Option<u32>, used: u32) -> Option<u32> {
    next.and_then(|n| if n > used { Some(n) } else { used.checked_add(1) })
}

impl Default for GraphStore {
    fn default() -> Self {
        GraphStore::new()
    }
}

/// Plain list form of a store, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            out_adj: HashMap::new(),
            in_adj: HashMap::new(),
            next_node_id: Some(1),
            next_edge_id: Some(1),
        }
    }

    /// Attach a node, keeping its id if it has one. Returns the id.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, GraphError> {
        node.validate()?;

        let id = match node.id {
            Some(id) if self.nodes.contains_key(&id) => return Err(GraphError::DuplicateNode(id)),
            Some(id) => id,
            None => self.next_node_id.ok_or(GraphError::IdsExhausted("node"))?,
        };
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.next_node_id = advance(self.next_node_id, id);

        node.id = Some(id);
        self.nodes.insert(id, node);
        debug!(node = id, "attached node");
        Ok(id)
    }

    /// Attach an edge. Both endpoint ids must be set and name attached nodes.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<EdgeId, GraphError> {
        edge.validate()?;

        let from = self.check_endpoint(&edge, Endpoint::Source)?;
        let to = self.check_endpoint(&edge, Endpoint::Target)?;

        let id = match edge.id {
            Some(id) if self.edges.contains_key(&id) => return Err(GraphError::DuplicateEdge(id)),
            Some(id) => id,
            None => self.next_edge_id.ok_or(GraphError::IdsExhausted("edge"))?,
        };
        if self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateEdge(id));
        }
        self.next_edge_id = advance(self.next_edge_id, id);

        edge.id = Some(id);
        self.edges.insert(id, edge);
        self.out_adj.entry(from).or_default().push(id);
        self.in_adj.entry(to).or_default().push(id);
        debug!(edge = id, from, to, "attached edge");
        Ok(id)
    }

    fn check_endpoint(&self, edge: &Edge, endpoint: Endpoint) -> Result<NodeId, GraphError> {
        let Some(id) = edge.endpoint(endpoint) else {
            warn!(%endpoint, "rejected edge without endpoint id");
            return Err(GraphError::MissingEndpoint { endpoint });
        };
        if !self.nodes.contains_key(&id) {
            warn!(%endpoint, node = id, "rejected edge pointing at unknown node");
            return Err(GraphError::NodeNotFound(id));
        }
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Overwrite descriptive attributes of an attached node. Names outside
    /// `Node::ATTRS` (including `id`) are rejected and the node is left as it was.
    pub fn update_node(&mut self, id: NodeId, attrs: Attrs) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;

        let mut merged: Attrs = Node::ATTRS
            .iter()
            .filter_map(|&name| node.attr(name).map(|v| (name.to_string(), v)))
            .collect();
        merged.extend(attrs);

        *node = Node::from_attrs(Some(id), merged)?;
        debug!(node = id, "updated node");
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;

        if let Some(from) = edge.source_id {
            if let Some(v) = self.out_adj.get_mut(&from) {
                v.retain(|&x| x != id);
            }
        }
        if let Some(to) = edge.target_id {
            if let Some(v) = self.in_adj.get_mut(&to) {
                v.retain(|&x| x != id);
            }
        }
        debug!(edge = id, "removed edge");
        Ok(edge)
    }

    /// Remove a node. Fails while any edge still references it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }

        //a self-loop sits in both lists
        let edges: HashSet<EdgeId> = [self.out_adj.get(&id), self.in_adj.get(&id)]
            .into_iter()
            .flatten()
            .flatten()
            .copied()
            .collect();
        if !edges.is_empty() {
            return Err(GraphError::NodeInUse { node: id, edges: edges.len() });
        }

        self.out_adj.remove(&id);
        self.in_adj.remove(&id);
        debug!(node = id, "removed node");
        self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// `(source_id, target_id)` of every edge, ordered by edge id.
    pub fn edge_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut ids: Vec<EdgeId> = self.edges.keys().copied().collect();
        ids.sort_unstable();
        ids.iter()
            .filter_map(|id| self.edges.get(id))
            .filter_map(|e| match e.endpoints() {
                (Some(s), Some(t)) => Some((s, t)),
                _ => None,
            })
            .collect()
    }

    fn resolve(&self, ids: Option<&Vec<EdgeId>>) -> Vec<&Edge> {
        ids.map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by_key(|n| n.id);
        let mut edges: Vec<Edge> = self.edges.values().cloned().collect();
        edges.sort_by_key(|e| e.id);
        GraphSnapshot { nodes, edges }
    }

    /// Rebuild a store from a snapshot, re-running every attach check.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let mut store = GraphStore::new();
        for node in snapshot.nodes {
            store.add_node(node)?;
        }
        for edge in snapshot.edges {
            store.add_edge(edge)?;
        }
        Ok(store)
    }

    pub fn to_toon(&self) -> Result<String, GraphError> {
        toon_format::encode_default(&self.snapshot()).map_err(|e| GraphError::Snapshot(e.to_string()))
    }

    pub fn from_toon(input: &str) -> Result<Self, GraphError> {
        let snapshot: GraphSnapshot =
            toon_format::decode_default(input).map_err(|e| GraphError::Snapshot(e.to_string()))?;
        GraphStore::from_snapshot(snapshot)
    }
}

impl Adjacency for GraphStore {
    fn in_edges(&self, node: &Node) -> Vec<&Edge> {
        self.resolve(node.id.and_then(|id| self.in_adj.get(&id)))
    }

    fn out_edges(&self, node: &Node) -> Vec<&Edge> {
        self.resolve(node.id.and_then(|id| self.out_adj.get(&id)))
    }

    fn source(&self, edge: &Edge) -> Option<&Node> {
        edge.source_id.and_then(|id| self.nodes.get(&id))
    }

    fn target(&self, edge: &Edge) -> Option<&Node> {
        edge.target_id.and_then(|id| self.nodes.get(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn mk_edge(source: NodeId, target: Option<NodeId>) -> Edge {
        let mut attrs: Attrs = attrs! { "source_id" => i64::from(source) };
        if let Some(t) = target {
            attrs.insert("target_id".into(), i64::from(t).into());
        }
        Edge::from_attrs(None, attrs).unwrap()
    }

    fn two_nodes(g: &mut GraphStore) -> (NodeId, NodeId) {
        let n1 = g.add_node(Node::new("Node1")).unwrap();
        let n2 = g.add_node(Node::new("Node2")).unwrap();
        (n1, n2)
    }

    #[test]
    fn ids_are_assigned_on_attach() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);

        assert_eq!((n1, n2), (1, 2));
        assert_eq!(g.node(n1).unwrap().id, Some(1));
        assert_eq!(g.node(n2).unwrap().label.as_deref(), Some("Node2"));

        let mut explicit = Node::new("explicit");
        explicit.id = Some(10);
        assert_eq!(g.add_node(explicit.clone()).unwrap(), 10);
        assert_eq!(g.add_node(Node::new("next")).unwrap(), 11);
        assert_eq!(g.add_node(explicit).unwrap_err(), GraphError::DuplicateNode(10));
    }

    #[test]
    fn forward_and_reverse_edges_show_up_on_both_nodes() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);

        let node1 = g.node(n1).unwrap().clone();
        let node2 = g.node(n2).unwrap().clone();
        let e12 = g
            .add_edge(Edge::connect_nodes(Some(&node1), Some(&node2), attrs! { "label" => "Edge12" }).unwrap())
            .unwrap();
        let e21 = g
            .add_edge(Edge::connect_nodes(Some(&node2), Some(&node1), attrs! { "label" => "Edge21" }).unwrap())
            .unwrap();

        let view = g.view(g.node(n1).unwrap());
        assert_eq!(view.out_edges()[0].id, Some(e12));
        assert_eq!(view.in_edges()[0].id, Some(e21));

        let ids: Vec<_> = view.edges().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(e21), Some(e12)]);

        let neighbors: Vec<_> = view.neighbors().map(|n| n.and_then(|n| n.id)).collect();
        assert_eq!(neighbors, vec![Some(n2), Some(n2)]);

        let e = g.edge(e12).unwrap();
        assert_eq!(g.source(e).unwrap().label.as_deref(), Some("Node1"));
        assert_eq!(g.target(e).unwrap().label.as_deref(), Some("Node2"));
        assert_eq!(g.edge_pairs(), vec![(n1, n2), (n2, n1)]);
    }

    #[test]
    fn edge_without_endpoints_is_rejected() {
        let mut g = GraphStore::new();

        let err = g.add_edge(Edge::default()).unwrap_err();
        assert_eq!(err, GraphError::MissingEndpoint { endpoint: Endpoint::Source });

        let (n1, _) = two_nodes(&mut g);
        let half = mk_edge(n1, None);
        assert_eq!(g.add_edge(half).unwrap_err(), GraphError::MissingEndpoint { endpoint: Endpoint::Target });
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn edge_to_unknown_node_is_rejected() {
        let mut g = GraphStore::new();
        let (n1, _) = two_nodes(&mut g);

        let err = g.add_edge(mk_edge(n1, Some(42))).unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound(42));
    }

    #[test]
    fn edge_can_take_ids_directly() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);

        let id = g.add_edge(mk_edge(n1, Some(n2))).unwrap();
        assert_eq!(g.edge(id).unwrap().to_string(), format!("({n1}, {n2})"));
    }

    #[test]
    fn nodes_with_edges_cannot_be_removed() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);
        let e = g.add_edge(mk_edge(n1, Some(n2))).unwrap();

        assert_eq!(g.remove_node(n1).unwrap_err(), GraphError::NodeInUse { node: n1, edges: 1 });

        g.remove_edge(e).unwrap();
        assert!(g.view(g.node(n2).unwrap()).edges().is_empty());
        assert_eq!(g.remove_node(n1).unwrap().id, Some(n1));
        assert_eq!(g.remove_node(n1).unwrap_err(), GraphError::NodeNotFound(n1));
        assert_eq!(g.remove_edge(e).unwrap_err(), GraphError::EdgeNotFound(e));
    }

    #[test]
    fn snapshot_rebuilds_adjacency() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);
        g.add_edge(mk_edge(n1, Some(n2))).unwrap();

        let copy = GraphStore::from_snapshot(g.snapshot()).unwrap();
        assert_eq!(copy.snapshot(), g.snapshot());

        let view = copy.view(copy.node(n2).unwrap());
        assert_eq!(view.in_edges().len(), 1);
    }

    #[test]
    fn snapshot_with_dangling_edge_is_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![],
            edges: vec![mk_edge(1, Some(2))],
        };
        assert_eq!(GraphStore::from_snapshot(snapshot).unwrap_err(), GraphError::NodeNotFound(1));
    }

    #[test]
    fn auto_ids_never_overwrite_an_explicit_max_id() {
        let mut g = GraphStore::new();
        let mut last = Node::new("last");
        last.id = Some(NodeId::MAX);
        g.add_node(last).unwrap();

        let err = g.add_node(Node::new("intruder")).unwrap_err();
        assert_eq!(err, GraphError::IdsExhausted("node"));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node(NodeId::MAX).unwrap().label.as_deref(), Some("last"));

        //explicit ids below the top still work
        let mut low = Node::new("low");
        low.id = Some(3);
        assert_eq!(g.add_node(low).unwrap(), 3);
        assert_eq!(g.add_node(Node::new("again")).unwrap_err(), GraphError::IdsExhausted("node"));
    }

    #[test]
    fn auto_edge_ids_stop_at_the_max_id() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);

        let mut top = mk_edge(n1, Some(n2));
        top.id = Some(EdgeId::MAX);
        g.add_edge(top).unwrap();

        let err = g.add_edge(mk_edge(n2, Some(n1))).unwrap_err();
        assert_eq!(err, GraphError::IdsExhausted("edge"));
        assert_eq!(g.edge(EdgeId::MAX).unwrap().endpoints(), (Some(n1), Some(n2)));
    }

    #[test]
    fn explicit_edge_id_must_be_unused() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);
        let e = g.add_edge(mk_edge(n1, Some(n2))).unwrap();

        let mut again = mk_edge(n2, Some(n1));
        again.id = Some(e);
        assert_eq!(g.add_edge(again).unwrap_err(), GraphError::DuplicateEdge(e));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.view(g.node(n1).unwrap()).in_edges().len(), 0);
    }

    #[test]
    fn self_loop_counts_once_when_removing_its_node() {
        let mut g = GraphStore::new();
        let (n1, _) = two_nodes(&mut g);
        g.add_edge(mk_edge(n1, Some(n1))).unwrap();

        assert_eq!(g.remove_node(n1).unwrap_err(), GraphError::NodeInUse { node: n1, edges: 1 });
    }

    #[test]
    fn update_node_changes_attributes_but_not_identity() {
        let mut g = GraphStore::new();
        let (n1, _) = two_nodes(&mut g);

        g.update_node(n1, attrs! { "color" => "blue", "size" => 15 }).unwrap();
        let node = g.node(n1).unwrap();
        assert_eq!((node.id, node.size, node.color()), (Some(n1), Some(15), Some("blue")));
        assert_eq!(node.label.as_deref(), Some("Node1"));

        let err = g.update_node(n1, attrs! { "id" => 99 }).unwrap_err();
        assert_eq!(err, GraphError::UnknownAttribute("id".into()));

        let err = g.update_node(n1, attrs! { "color" => "ultraviolet" }).unwrap_err();
        assert!(matches!(err, GraphError::ColorTooLong { .. }));
        assert_eq!(g.node(n1).unwrap().color(), Some("blue"));

        assert_eq!(g.update_node(42, Attrs::new()).unwrap_err(), GraphError::NodeNotFound(42));
    }

    #[test]
    fn snapshot_with_overlong_color_is_rejected() {
        let mut node = Node::new("n");
        node.id = Some(1);
        node.force_color("ultraviolet");
        let snapshot = GraphSnapshot { nodes: vec![node], edges: vec![] };
        assert!(matches!(GraphStore::from_snapshot(snapshot).unwrap_err(), GraphError::ColorTooLong { len: 11, .. }));

        let mut node = Node::new("n");
        node.id = Some(1);
        let mut edge = mk_edge(1, Some(1));
        edge.force_color("transparent");
        let snapshot = GraphSnapshot { nodes: vec![node], edges: vec![edge] };
        assert!(matches!(GraphStore::from_snapshot(snapshot).unwrap_err(), GraphError::ColorTooLong { .. }));
    }

    #[test]
    fn toon_round_trip() {
        let mut g = GraphStore::new();
        let (n1, n2) = two_nodes(&mut g);
        g.add_edge(mk_edge(n1, Some(n2))).unwrap();

        let text = g.to_toon().unwrap();
        let back = GraphStore::from_toon(&text).unwrap();

        assert_eq!(back.snapshot(), g.snapshot());
    }
}
