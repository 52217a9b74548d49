//! Exact Plücker-space visibility between two convex polygons.
//!
//! Given two convex polygonal sources `A` and `B` and a set of triangle-mesh
//! occluders, [`are_visible`](query::are_visible) decides whether some
//! straight segment from `A` to `B` escapes every occluder. The infinite
//! set of candidate stabbing lines is represented exactly as a convex
//! polytope in 5-dimensional Plücker space and clipped by occluder-edge
//! hyperplanes and by the Plücker quadric (no sampling, no conservative
//! bounds) — see the module-level docs of [`solver`] for the recursion that
//! drives this.

pub mod api;
pub mod builder;
pub mod config;
pub mod debug;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod plucker;
pub mod polygon;
pub mod polyhedron;
pub mod polytope;
pub mod query;
pub mod ray;
pub mod result;
pub mod silhouette;
pub mod splitter;
pub mod solver;
pub mod synthetic;
pub mod tolerance;

pub use api::*;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
