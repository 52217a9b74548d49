//! Curated re-export surface (the CLI and tests depend on this, not on the
//! module tree directly).

pub use crate::config::VisibilityConfig;
pub use crate::debug::{DebugSink, NullDebugSink};
pub use crate::error::{EngineError, Result};
pub use crate::mesh::{MeshDesc, Scene, TriangleMesh};
pub use crate::polygon::ConvexPolygon;
pub use crate::query::{are_visible, are_visible_with_debug, VisibilityExactQuery};
pub use crate::ray::{BruteForceRayBackend, RayBackend, RayHit, RayHits};
pub use crate::result::VisibilityResult;
pub use crate::tolerance::ToleranceConfig;
