//! Skeleton graph finalization
//!
//! Turns a raw undirected edge set (the collapse survivors, or any edge
//! list over mesh vertices) into a rooted forest: cycles are cut, each
//! connected component is oriented from a deterministic root, and the
//! result is packaged as a [`Skeleton`].

use curveskel_core::{distance, Error, Point3d, Result, Skeleton, SkeletonNode};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet, VecDeque};

/// Options for [`edges_to_graph`].
#[derive(Debug, Clone, Copy)]
pub struct ForestOptions {
    /// Drop nodes left without any edge.
    pub drop_disconnected: bool,
    /// Attach Euclidean edge lengths as weights (otherwise 0.0).
    pub weight: bool,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            drop_disconnected: true,
            weight: true,
        }
    }
}

/// Build a rooted forest from an undirected edge list.
///
/// Self-loops and duplicate (including reversed) edges are dropped, then
/// cycles are removed one at a time: within each detected cycle the edge
/// whose lower-degree endpoint has the smallest degree goes, ties broken
/// by cycle traversal order. Each connected component is finally oriented
/// child -> parent by BFS from its smallest vertex id.
pub fn edges_to_graph(
    edges: &[[usize; 2]],
    vertices: &[Point3d],
    opts: &ForestOptions,
) -> Result<Skeleton> {
    for e in edges {
        for &v in e {
            if v >= vertices.len() {
                return Err(Error::InvalidData(format!(
                    "edge ({}, {}) references vertex index {} out of range",
                    e[0], e[1], v
                )));
            }
        }
    }

    // Drop self-loops; collapse a->b / b->a and exact duplicates.
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut clean: Vec<[usize; 2]> = Vec::new();
    for e in edges {
        if e[0] == e[1] {
            continue;
        }
        if seen.insert((e[0].min(e[1]), e[0].max(e[1]))) {
            clean.push(*e);
        }
    }

    let mut ids: Vec<usize> = clean.iter().flat_map(|e| e.iter().copied()).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut graph: UnGraph<usize, ()> = UnGraph::new_undirected();
    let mut index_of: HashMap<usize, NodeIndex> = HashMap::with_capacity(ids.len());
    for &v in &ids {
        index_of.insert(v, graph.add_node(v));
    }
    for e in &clean {
        graph.add_edge(index_of[&e[0]], index_of[&e[1]], ());
    }

    remove_cycles(&mut graph)?;

    let orientation = orient_components(&graph);

    let mut skeleton = Skeleton::new();
    let mut node_map: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(orientation.len());
    for &(n, _) in &orientation {
        if opts.drop_disconnected && graph.neighbors(n).next().is_none() {
            continue;
        }
        let vid = graph[n];
        let ix = skeleton.add_node(SkeletonNode {
            vertex_id: vid,
            position: vertices[vid],
        });
        node_map.insert(n, ix);
    }
    for &(n, parent) in &orientation {
        if let Some(p) = parent {
            let w = if opts.weight {
                distance(&vertices[graph[n]], &vertices[graph[p]])
            } else {
                0.0
            };
            skeleton.add_parent_edge(node_map[&n], node_map[&p], w);
        }
    }

    Ok(skeleton)
}

/// Cut cycles until the graph is a forest.
///
/// Cannot loop forever on a finite graph (each round removes one edge);
/// the explicit budget turns a failure of that argument into a fatal
/// error instead of a hang.
fn remove_cycles(graph: &mut UnGraph<usize, ()>) -> Result<()> {
    let mut budget = graph.edge_count();
    let mut removed = 0usize;
    while let Some(cycle) = find_cycle(graph) {
        if budget == 0 {
            return Err(Error::Algorithm(
                "cycle removal failed to converge".to_string(),
            ));
        }
        budget -= 1;

        let mut best: Option<(usize, EdgeIndex)> = None;
        for &(a, b, eix) in &cycle {
            let degree = graph.edges(a).count().min(graph.edges(b).count());
            if best.map_or(true, |(d, _)| degree < d) {
                best = Some((degree, eix));
            }
        }
        if let Some((_, eix)) = best {
            graph.remove_edge(eix);
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::debug!(removed, "cut cycle edges during tree fixing");
    }
    Ok(())
}

/// Find one cycle, returned as `(node, next node, edge)` triples in
/// traversal order, or `None` if the graph is a forest.
fn find_cycle(graph: &UnGraph<usize, ()>) -> Option<Vec<(NodeIndex, NodeIndex, EdgeIndex)>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let adjacency: Vec<Vec<(NodeIndex, EdgeIndex)>> = graph
        .node_indices()
        .map(|n| graph.edges(n).map(|e| (e.target(), e.id())).collect())
        .collect();

    let mut color = vec![Color::White; graph.node_count()];
    let mut parent: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();

    for start in graph.node_indices() {
        if color[start.index()] != Color::White {
            continue;
        }
        color[start.index()] = Color::Gray;
        // Stack of (node, cursor into its adjacency list).
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
        while let Some(top) = stack.len().checked_sub(1) {
            let (n, cursor) = stack[top];
            if cursor >= adjacency[n.index()].len() {
                color[n.index()] = Color::Black;
                stack.pop();
                continue;
            }
            stack[top].1 += 1;
            let (m, eid) = adjacency[n.index()][cursor];
            // Don't walk straight back along the tree edge we came in on.
            if parent.get(&n).is_some_and(|&(_, pe)| pe == eid) {
                continue;
            }
            match color[m.index()] {
                Color::Gray => {
                    // Back edge to an ancestor on the stack: walk the
                    // parent chain n -> ... -> m, then close with eid.
                    let mut chain = vec![n];
                    let mut cur = n;
                    while cur != m {
                        let (p, _) = parent[&cur];
                        chain.push(p);
                        cur = p;
                    }
                    chain.reverse(); // m ... n
                    let mut cycle = Vec::with_capacity(chain.len());
                    for w in chain.windows(2) {
                        let (_, edge) = parent[&w[1]];
                        cycle.push((w[0], w[1], edge));
                    }
                    cycle.push((n, m, eid));
                    return Some(cycle);
                }
                Color::White => {
                    color[m.index()] = Color::Gray;
                    parent.insert(m, (n, eid));
                    stack.push((m, 0));
                }
                Color::Black => {}
            }
        }
    }
    None
}

/// Orient each connected component by BFS.
///
/// Components are discovered in ascending node-index order, so each root
/// is the smallest index in its component; siblings are visited in
/// ascending order. Returns `(node, parent)` pairs in visit order, roots
/// first within their component.
pub(crate) fn orient_components<N, E>(
    graph: &UnGraph<N, E>,
) -> Vec<(NodeIndex, Option<NodeIndex>)> {
    let mut visited = vec![false; graph.node_count()];
    let mut out = Vec::with_capacity(graph.node_count());
    for start in graph.node_indices() {
        if visited[start.index()] {
            continue;
        }
        visited[start.index()] = true;
        out.push((start, None));
        let mut queue = VecDeque::from([start]);
        while let Some(n) = queue.pop_front() {
            let mut neighbors: Vec<NodeIndex> = graph
                .neighbors(n)
                .filter(|m| !visited[m.index()])
                .collect();
            neighbors.sort_unstable();
            neighbors.dedup();
            for m in neighbors {
                visited[m.index()] = true;
                out.push((m, Some(n)));
                queue.push_back(m);
            }
        }
    }
    out
}
