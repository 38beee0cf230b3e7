//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3d, b: &Point3d) -> f64 {
    (a - b).norm()
}
