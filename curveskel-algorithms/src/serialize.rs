//! SWC node-table serialization
//!
//! Flattens a rooted forest (child -> parent pairs, or a [`Skeleton`] via
//! [`Skeleton::edge_list`]) into one table row per node.

use curveskel_core::{Error, Point3d, Result, SwcNode, SwcTable, ROOT_PARENT};
use std::collections::{HashMap, HashSet, VecDeque};

/// Options for [`make_swc`].
#[derive(Debug, Clone, Copy)]
pub struct SwcOptions {
    /// Re-number node ids to a dense `0..n` range, parents before children.
    pub reindex: bool,
    /// Check the finished table for structural violations.
    pub validate: bool,
}

impl Default for SwcOptions {
    fn default() -> Self {
        Self {
            reindex: false,
            validate: true,
        }
    }
}

/// Build an SWC table from child -> parent pairs.
///
/// A parent id of [`ROOT_PARENT`] marks a root. Parents that are
/// referenced but never appear as a child get their own root row. Node
/// coordinates come from `vertices`, indexed by node id; the radius
/// column is a placeholder `1.0` (see the radius estimator).
///
/// With `reindex`, rows are ordered so every parent row precedes its
/// children (roots by ascending id, then BFS with ascending sibling
/// order) and ids are remapped to row positions, `-1` staying fixed.
/// With `validate`, a node appearing with two distinct parents is a
/// [`Error::Validation`].
pub fn make_swc(edges: &[(i64, i64)], vertices: &[Point3d], opts: &SwcOptions) -> Result<SwcTable> {
    let mut pairs: Vec<(i64, i64)> = edges.to_vec();
    pairs.sort_unstable();
    pairs.dedup();

    let coord = |id: i64| -> Result<&Point3d> {
        if id < 0 || id as usize >= vertices.len() {
            return Err(Error::InvalidData(format!(
                "node id {id} has no vertex coordinate (mesh has {} vertices)",
                vertices.len()
            )));
        }
        Ok(&vertices[id as usize])
    };

    let mut rows: Vec<SwcNode> = Vec::with_capacity(pairs.len());
    for &(node_id, parent_id) in &pairs {
        let p = coord(node_id)?;
        rows.push(SwcNode {
            node_id,
            parent_id,
            x: p.x,
            y: p.y,
            z: p.z,
            radius: 1.0,
        });
    }

    // Parents referenced but absent as a node become their own roots. The
    // -1 sentinel itself is never materialized.
    let node_ids: HashSet<i64> = pairs.iter().map(|&(n, _)| n).collect();
    let mut added: HashSet<i64> = HashSet::new();
    for &(_, parent_id) in &pairs {
        if parent_id == ROOT_PARENT || node_ids.contains(&parent_id) {
            continue;
        }
        if added.insert(parent_id) {
            let p = coord(parent_id)?;
            rows.push(SwcNode {
                node_id: parent_id,
                parent_id: ROOT_PARENT,
                x: p.x,
                y: p.y,
                z: p.z,
                radius: 1.0,
            });
        }
    }

    if opts.validate {
        let mut seen: HashSet<i64> = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.node_id) {
                return Err(Error::Validation(format!(
                    "node {} has multiple parents",
                    row.node_id
                )));
            }
        }
    }

    if opts.reindex {
        rows = reindex_rows(rows);
    }

    Ok(SwcTable { nodes: rows })
}

/// Order rows parent-before-child and remap ids onto row positions.
fn reindex_rows(rows: Vec<SwcNode>) -> Vec<SwcNode> {
    let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (ri, row) in rows.iter().enumerate() {
        if row.parent_id == ROOT_PARENT {
            roots.push(ri);
        } else {
            children.entry(row.parent_id).or_default().push(ri);
        }
    }
    roots.sort_by_key(|&ri| rows[ri].node_id);

    let mut order: Vec<usize> = Vec::with_capacity(rows.len());
    let mut visited = vec![false; rows.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &ri in &roots {
        if visited[ri] {
            continue;
        }
        visited[ri] = true;
        queue.push_back(ri);
        while let Some(ci) = queue.pop_front() {
            order.push(ci);
            if let Some(kids) = children.get(&rows[ci].node_id) {
                let mut kids: Vec<usize> = kids.iter().copied().filter(|&k| !visited[k]).collect();
                kids.sort_by_key(|&k| rows[k].node_id);
                for k in kids {
                    visited[k] = true;
                    queue.push_back(k);
                }
            }
        }
    }
    // Anything unreachable from a root (possible only on invalid input)
    // keeps its relative order at the end.
    for ri in 0..rows.len() {
        if !visited[ri] {
            order.push(ri);
        }
    }

    let mut remap: HashMap<i64, i64> = HashMap::with_capacity(order.len());
    for (new_id, &ri) in order.iter().enumerate() {
        remap.entry(rows[ri].node_id).or_insert(new_id as i64);
    }

    order
        .into_iter()
        .enumerate()
        .map(|(new_id, ri)| {
            let row = rows[ri];
            SwcNode {
                node_id: new_id as i64,
                parent_id: if row.parent_id == ROOT_PARENT {
                    ROOT_PARENT
                } else {
                    remap.get(&row.parent_id).copied().unwrap_or(ROOT_PARENT)
                },
                ..row
            }
        })
        .collect()
}
