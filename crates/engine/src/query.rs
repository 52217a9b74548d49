//! The top-level query object and entry point (§6).

use nalgebra::Vector3;

use crate::builder::build_initial_polytope;
use crate::config::VisibilityConfig;
use crate::debug::{DebugSink, NullDebugSink};
use crate::mesh::Scene;
use crate::polygon::ConvexPolygon;
use crate::polyhedron::Polyhedron;
use crate::result::VisibilityResult;
use crate::silhouette::extract_silhouettes;
use crate::solver::{resolve_internal, SolverContext};
use crate::tolerance::ToleranceConfig;

/// Owns the state of a single query: one polyhedron, one silhouette
/// container, one pair of sources. Not `Sync` — one query must not be
/// driven from two threads at once (§5).
pub struct VisibilityExactQuery<'a> {
    scene: &'a Scene,
    config: VisibilityConfig,
    tol: ToleranceConfig,
}

impl<'a> VisibilityExactQuery<'a> {
    pub fn new(scene: &'a Scene, config: VisibilityConfig, tol: ToleranceConfig) -> Self {
        Self { scene, config, tol }
    }

    pub fn run(
        &self,
        vertices_a: &[Vector3<f64>],
        vertices_b: &[Vector3<f64>],
        debug: &mut dyn DebugSink,
    ) -> VisibilityResult {
        self.run_inner(vertices_a, vertices_b, debug).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "query failed");
            VisibilityResult::Failure
        })
    }

    fn run_inner(
        &self,
        vertices_a: &[Vector3<f64>],
        vertices_b: &[Vector3<f64>],
        debug: &mut dyn DebugSink,
    ) -> crate::error::Result<VisibilityResult> {
        let approx_ab = centroid(vertices_b) - centroid(vertices_a);
        let a = ConvexPolygon::new(vertices_a.to_vec(), approx_ab)?;
        let b = ConvexPolygon::new(vertices_b.to_vec(), -approx_ab)?;

        let mut polyhedron = Polyhedron::new();
        let initial_polytope = build_initial_polytope(&a, &b, &mut polyhedron, &self.tol)?;

        let mut silhouettes = Vec::new();
        if self.scene.mesh_count() > 0 {
            silhouettes = extract_silhouettes(
                self.scene,
                &a,
                &b,
                &self.tol,
                self.config.silhouette_optimisation,
            );
        }

        let mut ctx = SolverContext {
            scene: self.scene,
            polyhedron: &mut polyhedron,
            silhouettes: &mut silhouettes,
            config: &self.config,
            tol: &self.tol,
            debug,
            approx_normal: approx_ab.try_normalize(f64::EPSILON).unwrap_or(approx_ab),
            found_visible: false,
        };

        resolve_internal(&mut ctx, initial_polytope, Vec::new(), Vec::new(), 0)
    }
}

fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    let sum: Vector3<f64> = points.iter().fold(Vector3::zeros(), |acc, p| acc + p);
    sum / (points.len() as f64)
}

/// The programmatic entry point (§6).
pub fn are_visible(
    scene: &Scene,
    vertices_a: &[Vector3<f64>],
    vertices_b: &[Vector3<f64>],
    config: VisibilityConfig,
) -> VisibilityResult {
    are_visible_with_debug(scene, vertices_a, vertices_b, config, &mut NullDebugSink)
}

pub fn are_visible_with_debug(
    scene: &Scene,
    vertices_a: &[Vector3<f64>],
    vertices_b: &[Vector3<f64>],
    config: VisibilityConfig,
    debug: &mut dyn DebugSink,
) -> VisibilityResult {
    let tol = ToleranceConfig::default();
    let query = VisibilityExactQuery::new(scene, config, tol);
    query.run(vertices_a, vertices_b, debug)
}
