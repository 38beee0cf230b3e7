//! Surface mesh data structures and topology derivation

use crate::error::{Error, Result};
use crate::point::Point3d;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A closed triangulated surface mesh with derived edge topology.
///
/// Besides the vertex and face arrays, a `SurfaceMesh` carries the derived
/// quantities the skeletonization engine consumes: the deduplicated
/// undirected edge list (each pair stored with the smaller index first),
/// per-edge Euclidean lengths, and per-face triples of edge ids.
///
/// Vertex positions are used exactly as given; there is no internal
/// rescaling. Cost accumulation happens in `f64`, so callers should
/// pre-scale coordinates to a reasonable numeric range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceMesh {
    vertices: Vec<Point3d>,
    faces: Vec<[usize; 3]>,
    edges: Vec<[usize; 2]>,
    edge_lengths: Vec<f64>,
    face_edges: Vec<[usize; 3]>,
}

impl SurfaceMesh {
    /// Build a mesh from vertices and faces, deriving edge topology.
    ///
    /// Fails with [`Error::InvalidData`] if a face references a vertex
    /// index out of range or repeats a vertex (degenerate triangle).
    pub fn from_vertices_and_faces(
        vertices: Vec<Point3d>,
        faces: Vec<[usize; 3]>,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(Error::InvalidData("mesh has no vertices".to_string()));
        }
        if faces.is_empty() {
            return Err(Error::InvalidData("mesh has no faces".to_string()));
        }
        for (fi, face) in faces.iter().enumerate() {
            for &v in face {
                if v >= vertices.len() {
                    return Err(Error::InvalidData(format!(
                        "face {fi} references invalid vertex index {v}"
                    )));
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                return Err(Error::InvalidData(format!(
                    "face {fi} is degenerate (repeats a vertex)"
                )));
            }
        }

        let mut edge_ids: HashMap<(usize, usize), usize> = HashMap::new();
        let mut edges: Vec<[usize; 2]> = Vec::new();
        let mut edge_lengths: Vec<f64> = Vec::new();
        let mut face_edges: Vec<[usize; 3]> = Vec::with_capacity(faces.len());

        for face in &faces {
            let mut triple = [0usize; 3];
            let pairs = [
                (face[0], face[1]),
                (face[1], face[2]),
                (face[2], face[0]),
            ];
            for (k, (a, b)) in pairs.into_iter().enumerate() {
                let key = (a.min(b), a.max(b));
                let next_id = edges.len();
                let id = *edge_ids.entry(key).or_insert_with(|| {
                    edges.push([key.0, key.1]);
                    next_id
                });
                if id == next_id {
                    edge_lengths.push((vertices[key.0] - vertices[key.1]).norm());
                }
                triple[k] = id;
            }
            // Normalize each triple and deduplicate the list so that
            // (e1, e2, e3) and (e3, e2, e1) count as the same face.
            triple.sort_unstable();
            face_edges.push(triple);
        }
        face_edges.sort_unstable();
        face_edges.dedup();

        Ok(Self {
            vertices,
            faces,
            edges,
            edge_lengths,
            face_edges,
        })
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    /// Faces as vertex-index triples.
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Deduplicated undirected edges, each stored `(min, max)`.
    pub fn edges_unique(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Euclidean length of each unique edge.
    pub fn edges_unique_length(&self) -> &[f64] {
        &self.edge_lengths
    }

    /// Each unique face's three bounding edge ids (sorted ascending).
    pub fn faces_unique_edges(&self) -> &[[usize; 3]] {
        &self.face_edges
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of unique edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Undirected adjacency over the edge graph: for each vertex, the
    /// `(neighbor, edge length)` pairs of its incident edges.
    pub fn vertex_adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency = vec![Vec::new(); self.vertices.len()];
        for (ei, e) in self.edges.iter().enumerate() {
            let len = self.edge_lengths[ei];
            adjacency[e[0]].push((e[1], len));
            adjacency[e[1]].push((e[0], len));
        }
        adjacency
    }
}
