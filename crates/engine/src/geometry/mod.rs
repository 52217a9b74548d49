//! Arithmetic, vectors, and predicates (C1, C3).
//!
//! Every structural decision in the splitter, builder, and solver consults
//! one of these functions rather than comparing floats directly; the
//! tolerance policy (`crate::tolerance::ToleranceConfig`) is the only place
//! that names an ε.

mod hull;
mod plane;
mod predicates;
mod quadric;

pub use hull::convex_hull_planes;
pub use plane::{Plane, Ray};
pub use predicates::{
    classify_point, clip_polygon_by_plane, interp_weights, interpolate_plucker,
    interpolate_point3, plane_intersect_line, ray_aabb_hits, ray_triangle_hits, Side,
};
pub use quadric::{back_to_3d, plucker_edge_quadric_roots, QuadricRoot};
