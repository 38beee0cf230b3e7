//! # curveskel-algorithms
//!
//! Curve-skeleton extraction algorithms: the quadric/sampling cost model,
//! the greedy edge-collapse engine, skeleton tree finalization, geodesic
//! MST reconnection, SWC serialization, and radius estimation.
//!
//! The usual entry point is [`skeletonize`], which runs the full
//! pipeline on a [`curveskel_core::SurfaceMesh`].

pub mod collapse;
pub mod membership;
pub mod progress;
pub mod quadric;
pub mod radius;
pub mod reconnect;
pub mod serialize;
pub mod tree;

// Re-export commonly used items
pub use collapse::*;
pub use membership::*;
pub use progress::*;
pub use quadric::*;
pub use radius::*;
pub use reconnect::*;
pub use serialize::*;
pub use tree::*;
