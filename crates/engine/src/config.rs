//! Query configuration (§6). Constructed directly in code; no file format
//! is in scope (the demo's `key = value` format is explicitly out of scope).

/// Options recognised by [`crate::query::are_visible`].
#[derive(Clone, Copy, Debug)]
pub struct VisibilityConfig {
    /// Enable the §4.4 neighbour test that discards non-silhouette edges.
    pub silhouette_optimisation: bool,
    /// Normalise every Plücker point at creation time.
    pub hypersphere_normalisation: bool,
    /// Use one representative line per polytope for occluder finding
    /// instead of all extremal stabbing lines.
    pub representative_line_sampling: bool,
    /// Stop at the first aperture found instead of continuing to search.
    pub detect_aperture_only: bool,
    /// Accepted for API parity with an accelerated ray backend; a no-op
    /// unless the caller supplies one via [`crate::ray::RayBackend`].
    pub use_accelerated_ray_backend: bool,
    /// Recursion depth at which the solver gives up and returns `Failure`.
    pub max_recursion_depth: usize,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            silhouette_optimisation: true,
            hypersphere_normalisation: true,
            representative_line_sampling: true,
            detect_aperture_only: false,
            use_accelerated_ray_backend: false,
            max_recursion_depth: 2000,
        }
    }
}
