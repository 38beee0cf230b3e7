//! Geodesic minimum-spanning-tree reconnection
//!
//! Alternative to the collapse pipeline for callers who already know
//! which vertices to retain: compute geodesic distances between the
//! retained vertices over the full mesh edge graph, span them with an
//! MST, and orient the result into parent-pointer trees with the same
//! machinery the tree finalizer uses.

use crate::progress::CancelToken;
use crate::tree::orient_components;
use curveskel_core::{Error, Result, SurfaceMesh, ROOT_PARENT};
use itertools::Itertools;
use petgraph::algo::min_spanning_tree;
use petgraph::data::FromElements;
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Search cutoff for the geodesic sweeps.
///
/// A finite limit bounds how far each Dijkstra sweep explores, which can
/// speed things up considerably at the risk of disconnecting the result
/// (pairs further apart than the limit get no spanning edge).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GeodesicLimit {
    /// 3x the maximum pairwise Euclidean distance among the retained
    /// vertices.
    #[default]
    Auto,
    Finite(f64),
    Unlimited,
}

/// Reconnect a vertex subset through a geodesic minimum spanning tree.
///
/// Returns `(node, parent)` pairs over original vertex ids; roots carry
/// [`ROOT_PARENT`]. Every retained vertex appears exactly once. When the
/// limit disconnects the subset, each connected piece becomes its own
/// tree with its own root.
pub fn mst_over_mesh(
    mesh: &SurfaceMesh,
    verts: &[usize],
    limit: GeodesicLimit,
    cancel: Option<&CancelToken>,
) -> Result<Vec<(i64, i64)>> {
    if verts.is_empty() {
        return Err(Error::InvalidData(
            "verts: no vertices to retain".to_string(),
        ));
    }
    for &v in verts {
        if v >= mesh.vertex_count() {
            return Err(Error::InvalidData(format!(
                "verts: vertex index {v} out of range (mesh has {} vertices)",
                mesh.vertex_count()
            )));
        }
    }
    let mut keep: Vec<usize> = verts.to_vec();
    keep.sort_unstable();
    keep.dedup();

    let cutoff = match limit {
        GeodesicLimit::Auto => {
            let positions = mesh.vertices();
            let max_pairwise = keep
                .iter()
                .tuple_combinations()
                .map(|(&a, &b)| (positions[a] - positions[b]).norm())
                .fold(0.0_f64, f64::max);
            max_pairwise * 3.0
        }
        GeodesicLimit::Finite(l) => {
            if !l.is_finite() || l <= 0.0 {
                return Err(Error::InvalidData(format!(
                    "limit: must be positive and finite, got {l}"
                )));
            }
            l
        }
        GeodesicLimit::Unlimited => f64::INFINITY,
    };

    // Per-source sweeps share only the read-only adjacency.
    let adjacency = mesh.vertex_adjacency();
    let rows: Vec<Vec<f64>> = keep
        .par_iter()
        .map(|&source| {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                return Err(Error::Cancelled);
            }
            Ok(bounded_dijkstra(&adjacency, source, cutoff))
        })
        .collect::<Result<_>>()?;

    // Restrict to retained x retained and span with an MST. Unreachable
    // pairs simply contribute no edge.
    let mut graph: UnGraph<usize, f64> = UnGraph::new_undirected();
    for &v in &keep {
        graph.add_node(v);
    }
    let mut unreachable = 0usize;
    for i in 0..keep.len() {
        for j in (i + 1)..keep.len() {
            let d = rows[i][keep[j]];
            if d.is_finite() {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), d);
            } else {
                unreachable += 1;
            }
        }
    }
    if unreachable > 0 {
        tracing::warn!(
            unreachable,
            cutoff,
            "geodesic limit left vertex pairs unconnected; result will be a forest"
        );
    }

    let mst: UnGraph<usize, f64> = UnGraph::from_elements(min_spanning_tree(&graph));

    Ok(orient_components(&mst)
        .into_iter()
        .map(|(n, parent)| {
            (
                mst[n] as i64,
                parent.map_or(ROOT_PARENT, |p| mst[p] as i64),
            )
        })
        .collect())
}

/// Entry in Dijkstra's priority queue, ordered as a min-heap.
#[derive(Debug, Clone, Copy)]
struct DijkstraEntry {
    vertex: usize,
    distance: f64,
}

impl PartialEq for DijkstraEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for DijkstraEntry {}

impl PartialOrd for DijkstraEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Single-source shortest paths over the mesh edge graph, never relaxing
/// past `cutoff`. Unreached vertices stay at infinity.
fn bounded_dijkstra(adjacency: &[Vec<(usize, f64)>], source: usize, cutoff: f64) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; adjacency.len()];
    dist[source] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(DijkstraEntry {
        vertex: source,
        distance: 0.0,
    });

    while let Some(DijkstraEntry { vertex, distance }) = heap.pop() {
        if distance > dist[vertex] {
            continue;
        }
        for &(neighbor, len) in &adjacency[vertex] {
            let next = distance + len;
            if next <= cutoff && next < dist[neighbor] {
                dist[neighbor] = next;
                heap.push(DijkstraEntry {
                    vertex: neighbor,
                    distance: next,
                });
            }
        }
    }
    dist
}
