//! Core data structures and traits for curveskel
//!
//! This crate provides the fundamental types for curve-skeleton
//! extraction: surface meshes with derived edge topology, skeleton
//! forests, SWC node tables, and essential traits.

pub mod error;
pub mod mesh;
pub mod point;
pub mod primitives;
pub mod skeleton;
pub mod swc;
pub mod traits;

pub use error::{Error, Result};
pub use mesh::*;
pub use point::*;
pub use skeleton::*;
pub use swc::*;
pub use traits::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
