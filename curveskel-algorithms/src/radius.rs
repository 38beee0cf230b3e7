//! Node radius estimation
//!
//! Assigns each serialized skeleton node a radius from the source mesh
//! surface. The k-nearest-neighbor method is fast but only approximate:
//! near thin or strongly concave geometry the mean vertex distance can be
//! badly wrong. Ray casting against the surface is the intended
//! higher-fidelity method and is not implemented yet.

use curveskel_core::{Error, NearestNeighborSearch, Point3d, Result, SurfaceMesh, SwcTable};
use kiddo::{KdTree, SquaredEuclidean};

/// How to derive node radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusMethod {
    /// Mean distance to the `n` nearest mesh vertices.
    Knn { n: usize },
    /// Ray casting. Not implemented; selecting it fails with
    /// [`Error::Unsupported`].
    Ray,
}

impl Default for RadiusMethod {
    fn default() -> Self {
        Self::Knn { n: 5 }
    }
}

/// K-d tree over mesh vertices.
pub struct VertexKdTree {
    tree: KdTree<f64, 3>,
}

impl VertexKdTree {
    pub fn new(points: &[Point3d]) -> Self {
        let mut tree = KdTree::new();
        for (idx, p) in points.iter().enumerate() {
            tree.add(&[p.x, p.y, p.z], idx as u64);
        }
        Self { tree }
    }
}

impl NearestNeighborSearch for VertexKdTree {
    fn find_k_nearest(&self, query: &Point3d, k: usize) -> Vec<(usize, f64)> {
        self.tree
            .nearest_n::<SquaredEuclidean>(&[query.x, query.y, query.z], k)
            .into_iter()
            .map(|nn| (nn.item as usize, nn.distance.sqrt()))
            .collect()
    }

    fn find_radius_neighbors(&self, query: &Point3d, radius: f64) -> Vec<(usize, f64)> {
        self.tree
            .within::<SquaredEuclidean>(&[query.x, query.y, query.z], radius * radius)
            .into_iter()
            .map(|nn| (nn.item as usize, nn.distance.sqrt()))
            .collect()
    }
}

/// Update the radius column of an SWC table in place.
pub fn add_radius(table: &mut SwcTable, mesh: &SurfaceMesh, method: RadiusMethod) -> Result<()> {
    match method {
        RadiusMethod::Knn { n } => {
            if n == 0 {
                return Err(Error::InvalidData(
                    "n: neighbor count must be at least 1".to_string(),
                ));
            }
            let tree = VertexKdTree::new(mesh.vertices());
            for node in &mut table.nodes {
                let query = Point3d::new(node.x, node.y, node.z);
                let neighbors = tree.find_k_nearest(&query, n);
                if !neighbors.is_empty() {
                    node.radius =
                        neighbors.iter().map(|(_, d)| d).sum::<f64>() / neighbors.len() as f64;
                }
            }
            Ok(())
        }
        RadiusMethod::Ray => Err(Error::Unsupported(
            "method \"ray\": ray-cast radius estimation is not implemented".to_string(),
        )),
    }
}
