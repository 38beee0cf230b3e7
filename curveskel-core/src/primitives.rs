//! Closed mesh primitives for tests and demos

use crate::error::{Error, Result};
use crate::mesh::SurfaceMesh;
use crate::point::Point3d;
use nalgebra::Point3;

/// A unit-ish tetrahedron, the smallest closed triangulated mesh.
pub fn tetrahedron() -> Result<SurfaceMesh> {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    SurfaceMesh::from_vertices_and_faces(vertices, faces)
}

/// A closed cylinder centered on the origin, axis along +z.
///
/// `segments` is the number of vertices around each circle (>= 3),
/// `rings` the number of side subdivisions along the axis (>= 1). The
/// caps are triangle fans around a center vertex, so the result is a
/// closed 2-manifold.
pub fn cylinder(segments: usize, rings: usize, radius: f64, height: f64) -> Result<SurfaceMesh> {
    if segments < 3 {
        return Err(Error::InvalidData(format!(
            "cylinder needs at least 3 segments, got {segments}"
        )));
    }
    if rings < 1 {
        return Err(Error::InvalidData(format!(
            "cylinder needs at least 1 ring, got {rings}"
        )));
    }
    if radius <= 0.0 || height <= 0.0 {
        return Err(Error::InvalidData(
            "cylinder radius and height must be positive".to_string(),
        ));
    }

    let mut vertices: Vec<Point3d> = Vec::with_capacity(segments * (rings + 1) + 2);
    for r in 0..=rings {
        let z = height * (r as f64 / rings as f64) - height / 2.0;
        for k in 0..segments {
            let theta = 2.0 * std::f64::consts::PI * (k as f64 / segments as f64);
            vertices.push(Point3::new(radius * theta.cos(), radius * theta.sin(), z));
        }
    }
    let bottom_center = vertices.len();
    vertices.push(Point3::new(0.0, 0.0, -height / 2.0));
    let top_center = vertices.len();
    vertices.push(Point3::new(0.0, 0.0, height / 2.0));

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(2 * segments * rings + 2 * segments);
    for r in 0..rings {
        for k in 0..segments {
            let a = r * segments + k;
            let b = r * segments + (k + 1) % segments;
            let c = (r + 1) * segments + k;
            let d = (r + 1) * segments + (k + 1) % segments;
            faces.push([a, b, d]);
            faces.push([a, d, c]);
        }
    }
    for k in 0..segments {
        let a = k;
        let b = (k + 1) % segments;
        faces.push([bottom_center, b, a]);
        let top = rings * segments;
        faces.push([top_center, top + a, top + b]);
    }

    SurfaceMesh::from_vertices_and_faces(vertices, faces)
}
