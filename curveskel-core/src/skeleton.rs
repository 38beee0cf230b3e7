//! Rooted skeleton forest over surviving mesh vertices

use crate::point::Point3d;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// One skeleton node: the originating mesh vertex id and its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonNode {
    pub vertex_id: usize,
    pub position: Point3d,
}

/// A 1-dimensional curve skeleton: a forest of parent-pointer trees.
///
/// Edges are oriented child -> parent and carry the Euclidean edge length
/// as weight (0.0 when weights were not requested). A node with no
/// outgoing edge is a root.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    graph: DiGraph<SkeletonNode, f64>,
}

impl Skeleton {
    /// Create an empty skeleton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its graph index.
    pub fn add_node(&mut self, node: SkeletonNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    /// Add a child -> parent edge.
    pub fn add_parent_edge(&mut self, child: NodeIndex, parent: NodeIndex, weight: f64) {
        self.graph.add_edge(child, parent, weight);
    }

    /// The underlying directed graph.
    pub fn graph(&self) -> &DiGraph<SkeletonNode, f64> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node payload by graph index.
    pub fn node(&self, ix: NodeIndex) -> &SkeletonNode {
        &self.graph[ix]
    }

    /// The parent of a node, if it has one.
    pub fn parent_of(&self, ix: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(ix, Direction::Outgoing)
            .next()
    }

    /// All roots (nodes without a parent).
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&ix| self.parent_of(ix).is_none())
            .collect()
    }

    /// Child -> parent edges as `(child vertex id, parent vertex id)`.
    pub fn edge_list(&self) -> Vec<(i64, i64)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].vertex_id as i64,
                    self.graph[e.target()].vertex_id as i64,
                )
            })
            .collect()
    }

    /// True when every node has at most one parent and no cycle exists.
    pub fn is_forest(&self) -> bool {
        let single_parent = self
            .graph
            .node_indices()
            .all(|ix| self.graph.edges_directed(ix, Direction::Outgoing).count() <= 1);
        single_parent && !is_cyclic_directed(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn node(id: usize) -> SkeletonNode {
        SkeletonNode {
            vertex_id: id,
            position: Point3::new(id as f64, 0.0, 0.0),
        }
    }

    #[test]
    fn roots_and_parents() {
        let mut skel = Skeleton::new();
        let a = skel.add_node(node(10));
        let b = skel.add_node(node(11));
        let c = skel.add_node(node(12));
        skel.add_parent_edge(b, a, 1.0);
        skel.add_parent_edge(c, b, 1.0);

        assert_eq!(skel.roots(), vec![a]);
        assert_eq!(skel.parent_of(c), Some(b));
        assert!(skel.parent_of(a).is_none());
        assert!(skel.is_forest());

        let mut edges = skel.edge_list();
        edges.sort_unstable();
        assert_eq!(edges, vec![(11, 10), (12, 11)]);
    }

    #[test]
    fn multi_parent_is_not_a_forest() {
        let mut skel = Skeleton::new();
        let a = skel.add_node(node(0));
        let b = skel.add_node(node(1));
        let c = skel.add_node(node(2));
        skel.add_parent_edge(c, a, 1.0);
        skel.add_parent_edge(c, b, 1.0);
        assert!(!skel.is_forest());
    }

    #[test]
    fn cycle_is_not_a_forest() {
        let mut skel = Skeleton::new();
        let a = skel.add_node(node(0));
        let b = skel.add_node(node(1));
        skel.add_parent_edge(a, b, 1.0);
        skel.add_parent_edge(b, a, 1.0);
        assert!(!skel.is_forest());
    }
}
