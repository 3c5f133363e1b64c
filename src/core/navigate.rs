//graph navigation over adjacency supplied by a storage adapter
use std::iter::FusedIterator;
use std::vec;

use crate::core::graph::{Edge, Node};

/// Relationship loading supplied by whatever owns the nodes and edges.
///
/// Collections are returned in the adapter's own order; navigation preserves it.
pub trait Adjacency {
    /// Edges whose target is `node`.
    fn in_edges(&self, node: &Node) -> Vec<&Edge>;

    /// Edges whose source is `node`.
    fn out_edges(&self, node: &Node) -> Vec<&Edge>;

    fn source(&self, edge: &Edge) -> Option<&Node>;

    fn target(&self, edge: &Edge) -> Option<&Node>;

    fn view<'a>(&'a self, node: &'a Node) -> NodeView<'a, Self>
    where
        Self: Sized,
    {
        NodeView::new(self, node)
    }
}

/// A node seen through an adjacency.
pub struct NodeView<'a, A: ?Sized> {
    graph: &'a A,
    node: &'a Node,
}

impl<A: ?Sized> Clone for NodeView<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for NodeView<'_, A> {}

impl<'a, A: Adjacency + ?Sized> NodeView<'a, A> {
    pub fn new(graph: &'a A, node: &'a Node) -> Self {
        NodeView { graph, node }
    }

    pub fn node(self) -> &'a Node {
        self.node
    }

    pub fn in_edges(self) -> Vec<&'a Edge> {
        self.graph.in_edges(self.node)
    }

    pub fn out_edges(self) -> Vec<&'a Edge> {
        self.graph.out_edges(self.node)
    }

    /// In-edges followed by out-edges. A self-loop shows up twice.
    pub fn edges(self) -> Vec<&'a Edge> {
        let mut all = self.in_edges();
        all.extend(self.out_edges());
        all
    }

    /// Pairs of `(edge, other end)`: each in-edge with its source, then each
    /// out-edge with its target.
    ///
    /// With `node` given, that node's adjacency is walked instead of this view's,
    /// e.g. a node fetched through a narrower query.
    pub fn iter_edge_targets(self, node: Option<&'a Node>) -> EdgeTargets<'a, A> {
        let node = node.unwrap_or(self.node);
        EdgeTargets {
            graph: self.graph,
            incoming: self.graph.in_edges(node).into_iter(),
            outgoing: self.graph.out_edges(node).into_iter(),
        }
    }

    /// The other end of every edge, in `iter_edge_targets` order.
    pub fn neighbors(self) -> impl Iterator<Item = Option<&'a Node>> + Clone {
        self.iter_edge_targets(None).map(|(_, other)| other)
    }
}

/// Iterator returned by [`NodeView::iter_edge_targets`]. Clone it to walk again.
///
/// The other end is `None` when the adjacency cannot resolve it.
pub struct EdgeTargets<'a, A: ?Sized> {
    graph: &'a A,
    incoming: vec::IntoIter<&'a Edge>,
    outgoing: vec::IntoIter<&'a Edge>,
}

impl<A: ?Sized> Clone for EdgeTargets<'_, A> {
    fn clone(&self) -> Self {
        EdgeTargets {
            graph: self.graph,
            incoming: self.incoming.clone(),
            outgoing: self.outgoing.clone(),
        }
    }
}

impl<'a, A: Adjacency + ?Sized> Iterator for EdgeTargets<'a, A> {
    type Item = (&'a Edge, Option<&'a Node>);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(edge) = self.incoming.next() {
            return Some((edge, self.graph.source(edge)));
        }
        let edge = self.outgoing.next()?;
        Some((edge, self.graph.target(edge)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.incoming.len() + self.outgoing.len();
        (n, Some(n))
    }
}

impl<A: Adjacency + ?Sized> ExactSizeIterator for EdgeTargets<'_, A> {}

impl<A: Adjacency + ?Sized> FusedIterator for EdgeTargets<'_, A> {}
