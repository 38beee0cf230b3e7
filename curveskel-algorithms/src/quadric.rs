//! Quadric cost model for edge collapse
//!
//! Each vertex accumulates a 4x4 quadric matrix summarizing the
//! orientation of its incident edges; collapsing an edge is scored by a
//! weighted sum of a shape cost (derived from the quadrics of its two
//! endpoints) and a sample cost (penalizing collapses that would create
//! disproportionately long edges).
//!
//! Accumulation happens in `f64`. Inputs with very large coordinate
//! magnitudes should be pre-scaled by the caller; the model does not
//! rescale internally.

use curveskel_core::{Point3d, SurfaceMesh};
use nalgebra::{Matrix3x4, Matrix4};
use rayon::prelude::*;

/// Per-edge orientation matrix K.
///
/// `a` is the normalized edge direction taken componentwise-absolute,
/// `b = a ⊙ position(first endpoint)`:
///
/// ```text
/// K = |  0  -az   ay  -bx |
///     |  az   0  -ax  -by |
///     | -ay   ax   0  -bz |
/// ```
fn edge_matrix(p0: &Point3d, p1: &Point3d, length: f64) -> Matrix3x4<f64> {
    if length <= 0.0 {
        return Matrix3x4::zeros();
    }
    let a = ((p1 - p0) / length).abs();
    let b = a.component_mul(&p0.coords);
    Matrix3x4::new(
        0.0, -a.z, a.y, -b.x, //
        a.z, 0.0, -a.x, -b.y, //
        -a.y, a.x, 0.0, -b.z,
    )
}

/// The quadric contribution of a single edge, `KᵀK`.
fn edge_quadric(p0: &Point3d, p1: &Point3d, length: f64) -> Matrix4<f64> {
    let k = edge_matrix(p0, p1, length);
    k.transpose() * k
}

/// Per-vertex quadrics and incident-length sums, plus the weighted edge
/// cost derived from them.
///
/// The collapse engine owns one `CostModel` for the duration of a run and
/// folds vertex `u` into `v` via [`CostModel::merge`] after each collapse;
/// costs of edges not touching the merged vertex are unaffected, which is
/// what makes the incremental update sound.
#[derive(Debug, Clone)]
pub struct CostModel {
    shape_weight: f64,
    sample_weight: f64,
    quadrics: Vec<Matrix4<f64>>,
    incident_length_sum: Vec<f64>,
}

impl CostModel {
    /// Build the initial model from the mesh edge list.
    ///
    /// Vertex quadrics sum the `KᵀK` of every incident edge regardless of
    /// storage direction. The incident-length sums are directional: only
    /// edges stored with the vertex in the first slot contribute, matching
    /// the sampling-cost formula they feed.
    pub fn new(mesh: &SurfaceMesh, shape_weight: f64, sample_weight: f64) -> Self {
        let vertices = mesh.vertices();
        let edges = mesh.edges_unique();
        let lengths = mesh.edges_unique_length();

        let edge_quadrics: Vec<Matrix4<f64>> = edges
            .par_iter()
            .zip(lengths.par_iter())
            .map(|(e, &len)| edge_quadric(&vertices[e[0]], &vertices[e[1]], len))
            .collect();

        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];
        for (ei, e) in edges.iter().enumerate() {
            incident[e[0]].push(ei);
            incident[e[1]].push(ei);
        }
        let quadrics: Vec<Matrix4<f64>> = incident
            .par_iter()
            .map(|edge_ids| {
                edge_ids
                    .iter()
                    .fold(Matrix4::zeros(), |acc, &ei| acc + edge_quadrics[ei])
            })
            .collect();

        let mut incident_length_sum = vec![0.0; vertices.len()];
        for (ei, e) in edges.iter().enumerate() {
            incident_length_sum[e[0]] += lengths[ei];
        }

        Self {
            shape_weight,
            sample_weight,
            quadrics,
            incident_length_sum,
        }
    }

    /// Shape cost of collapsing edge `(i, j)`.
    ///
    /// With `p` the homogeneous position of the edge's first endpoint,
    /// sums `p[c] * colsum_c(Q)` over the x and y columns of both
    /// endpoint quadrics.
    pub fn shape_cost(&self, edge: [usize; 2], vertices: &[Point3d]) -> f64 {
        let p = vertices[edge[0]];
        let partial = |q: &Matrix4<f64>| p.x * q.column(0).sum() + p.y * q.column(1).sum();
        partial(&self.quadrics[edge[0]]) + partial(&self.quadrics[edge[1]])
    }

    /// Sample cost of collapsing an edge: its length times the summed
    /// length of the other edges charged to its first-slot endpoint.
    pub fn sample_cost(&self, edge: [usize; 2], length: f64) -> f64 {
        length * (self.incident_length_sum[edge[0]] - length)
    }

    /// Weighted total cost.
    pub fn cost(&self, edge: [usize; 2], length: f64, vertices: &[Point3d]) -> f64 {
        self.shape_weight * self.shape_cost(edge, vertices)
            + self.sample_weight * self.sample_cost(edge, length)
    }

    /// Fold vertex `u` into `v` after a collapse.
    pub fn merge(&mut self, u: usize, v: usize) {
        let q = self.quadrics[u];
        self.quadrics[v] += q;
        self.incident_length_sum[v] += self.incident_length_sum[u];
    }

    #[cfg(test)]
    pub(crate) fn incident_length_sum(&self, v: usize) -> f64 {
        self.incident_length_sum[v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use curveskel_core::primitives;
    use nalgebra::Point3;

    #[test]
    fn edge_matrix_layout() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(2.0, 0.0, 0.0);
        let k = edge_matrix(&p0, &p1, 2.0);
        // a = (1, 0, 0), b = (0, 0, 0)
        assert_relative_eq!(k[(1, 2)], -1.0);
        assert_relative_eq!(k[(2, 1)], 1.0);
        for &(r, c) in &[(0, 0), (1, 1), (2, 2), (0, 3), (1, 3), (2, 3)] {
            assert_relative_eq!(k[(r, c)], 0.0);
        }
    }

    #[test]
    fn direction_is_absolute_valued() {
        // Reversing an edge flips the raw direction but not |a|; only b
        // changes with the first endpoint.
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(0.0, 3.0, 0.0);
        let forward = edge_matrix(&p0, &p1, 3.0);
        let backward = edge_matrix(&p1, &p0, 3.0);
        assert_relative_eq!(forward[(0, 2)], backward[(0, 2)]);
        assert_relative_eq!(forward[(2, 0)], backward[(2, 0)]);
    }

    #[test]
    fn edge_quadric_is_symmetric() {
        let p0 = Point3::new(0.3, 0.7, 0.1);
        let p1 = Point3::new(1.1, 0.2, 0.9);
        let q = edge_quadric(&p0, &p1, (p1 - p0).norm());
        for r in 0..4 {
            for c in 0..4 {
                assert_relative_eq!(q[(r, c)], q[(c, r)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn zero_length_edge_contributes_nothing() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(edge_quadric(&p, &p, 0.0), Matrix4::zeros());
    }

    #[test]
    fn incident_length_sums_are_directional() {
        let mesh = primitives::tetrahedron().unwrap();
        let model = CostModel::new(&mesh, 1.0, 0.1);
        // Edges are stored (min, max), so the highest-numbered vertex is
        // never in the first slot and accumulates nothing.
        let last = mesh.vertex_count() - 1;
        assert_relative_eq!(model.incident_length_sum(last), 0.0);
        // Vertex 0 is the first slot of every edge it touches.
        let expected: f64 = mesh
            .edges_unique()
            .iter()
            .zip(mesh.edges_unique_length())
            .filter(|(e, _)| e[0] == 0)
            .map(|(_, &len)| len)
            .sum();
        assert_relative_eq!(model.incident_length_sum(0), expected);
    }

    #[test]
    fn sample_cost_subtracts_own_length() {
        let mesh = primitives::tetrahedron().unwrap();
        let model = CostModel::new(&mesh, 0.0, 1.0);
        let e = mesh.edges_unique()[0];
        let len = mesh.edges_unique_length()[0];
        let expected = len * (model.incident_length_sum(e[0]) - len);
        assert_relative_eq!(model.sample_cost(e, len), expected);
        assert_relative_eq!(model.cost(e, len, mesh.vertices()), expected);
    }

    #[test]
    fn merge_accumulates_state() {
        let mesh = primitives::tetrahedron().unwrap();
        let mut model = CostModel::new(&mesh, 1.0, 0.1);
        let before_q = model.quadrics[1] + model.quadrics[0];
        let before_len = model.incident_length_sum(1) + model.incident_length_sum(0);
        model.merge(0, 1);
        assert_eq!(model.quadrics[1], before_q);
        assert_relative_eq!(model.incident_length_sum(1), before_len);
    }

    #[test]
    fn weights_scale_the_cost() {
        let mesh = primitives::tetrahedron().unwrap();
        let model = CostModel::new(&mesh, 2.0, 0.0);
        let half = CostModel::new(&mesh, 1.0, 0.0);
        let e = mesh.edges_unique()[2];
        let len = mesh.edges_unique_length()[2];
        assert_relative_eq!(
            model.cost(e, len, mesh.vertices()),
            2.0 * half.cost(e, len, mesh.vertices()),
            epsilon = 1e-12
        );
    }
}
