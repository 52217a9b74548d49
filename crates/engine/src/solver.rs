//! Aperture-finder solver (C11): the top-level recursion that orchestrates
//! every other component (§4.6).

use nalgebra::Vector3;

use crate::config::VisibilityConfig;
use crate::debug::DebugSink;
use crate::error::EngineError;
use crate::geometry::{back_to_3d, Ray};
use crate::mesh::Scene;
use crate::plucker::PluckerPoint;
use crate::polyhedron::Polyhedron;
use crate::polytope::Polytope;
use crate::ray::{BruteForceRayBackend, RayBackend};
use crate::result::VisibilityResult;
use crate::silhouette::Silhouette;
use crate::tolerance::{sign, Sign, ToleranceConfig};

pub struct SolverContext<'a> {
    pub scene: &'a Scene,
    pub polyhedron: &'a mut Polyhedron,
    pub silhouettes: &'a mut Vec<Silhouette>,
    pub config: &'a VisibilityConfig,
    pub tol: &'a ToleranceConfig,
    pub debug: &'a mut dyn DebugSink,
    pub approx_normal: Vector3<f64>,
    pub found_visible: bool,
}

/// Recursion entry point. Mirrors `resolve_internal` verbatim: pick a
/// silhouette edge, lift and split, recurse, or conclude.
pub fn resolve_internal(
    ctx: &mut SolverContext,
    mut polytope: Polytope,
    mut occluders: Vec<usize>,
    mut polytope_lines: Vec<PluckerPoint>,
    depth: usize,
) -> Result<VisibilityResult, EngineError> {
    if depth > ctx.config.max_recursion_depth {
        tracing::warn!(depth, "recursion depth cap exceeded");
        return Err(EngineError::RecursionDepthExceeded {
            cap: ctx.config.max_recursion_depth,
        });
    }

    polytope.recompute_quadric_cache(ctx.polyhedron, ctx.tol);
    if !polytope.has_real_edge() {
        return Ok(VisibilityResult::Hidden);
    }

    if occluders.is_empty() {
        polytope_lines = collect_polytope_lines(ctx, &mut polytope);
        for line in &polytope_lines {
            let Some((p0, p1)) = back_to_3d(line) else {
                continue;
            };
            ctx.debug.add_sampling_line(p0, p1);
            let ray = Ray::segment(p0, p1);
            let backend = BruteForceRayBackend::new(ctx.scene, ctx.silhouettes);
            let hits = backend.intersect(&ray);
            if hits.is_empty() {
                ctx.found_visible = true;
                if ctx.config.detect_aperture_only {
                    return Ok(VisibilityResult::Visible);
                }
            }
            for hit in hits.hits {
                if !occluders.contains(&hit.geometry_id) {
                    occluders.push(hit.geometry_id);
                }
            }
        }
    }

    if is_occluded(ctx, &occluders, &polytope_lines) {
        return Ok(VisibilityResult::Hidden);
    }

    let Some((sil_idx, edge_idx)) = pick_active_edge(ctx.silhouettes, &occluders) else {
        if ctx.found_visible {
            return Ok(VisibilityResult::Visible);
        }
        return Ok(VisibilityResult::Unknown);
    };

    ctx.silhouettes[sil_idx].mark_inactive(edge_idx);

    let (face, edge_in_face) = {
        let e = &ctx.silhouettes[sil_idx].edges[edge_idx];
        (e.face, e.edge_in_face)
    };
    let mesh_id = ctx.silhouettes[sil_idx].mesh_id;
    let (a3, b3) = ctx.scene.mesh(mesh_id).edge_vertices(face as usize, edge_in_face as usize);

    let h_idx = match ctx.silhouettes[sil_idx].edges[edge_idx].hyperplane {
        Some(idx) => idx,
        None => {
            let line = PluckerPoint::from_points(a3, b3);
            let idx = ctx
                .polyhedron
                .push(line, Vec::new(), ctx.config.hypersphere_normalisation, ctx.tol);
            ctx.silhouettes[sil_idx].edges[edge_idx].hyperplane = Some(idx);
            idx
        }
    };

    let outcome = if is_edge_inside_polytope(a3, b3, &polytope, ctx.approx_normal, &*ctx.polyhedron, ctx.tol) {
        let split_result = crate::splitter::split(&polytope, h_idx as u32, ctx.polyhedron, ctx.tol);
        match split_result.kind {
            crate::splitter::SplitKind::Boundary => {
                let h = ctx.polyhedron.point(h_idx);
                let rep_negative = polytope
                    .representative_line()
                    .map(|line| sign(h.dot(&line), ctx.tol.eps_plane) != Sign::Pos)
                    .unwrap_or(true);

                ctx.silhouettes[sil_idx].push_processed(edge_idx);

                let left_occluders = if rep_negative { occluders.clone() } else { Vec::new() };
                let left_result = resolve_internal(
                    ctx,
                    split_result.left,
                    left_occluders,
                    polytope_lines.clone(),
                    depth + 1,
                )?;

                let right_occluders = if !rep_negative { occluders.clone() } else { Vec::new() };
                let right_result =
                    resolve_internal(ctx, split_result.right, right_occluders, polytope_lines, depth + 1)?;

                ctx.silhouettes[sil_idx].pop_processed();

                combine(left_result, right_result)
            }
            _ => resolve_internal(ctx, polytope.clone(), occluders.clone(), polytope_lines, depth + 1)?,
        }
    } else {
        resolve_internal(ctx, polytope, occluders, polytope_lines, depth + 1)?
    };

    ctx.silhouettes[sil_idx].mark_active(edge_idx);
    Ok(outcome)
}

fn combine(left: VisibilityResult, right: VisibilityResult) -> VisibilityResult {
    use VisibilityResult::*;
    match (left, right) {
        (Visible, _) | (_, Visible) => Visible,
        (Failure, _) | (_, Failure) => Failure,
        (Hidden, Hidden) => Hidden,
        _ => Unknown,
    }
}

fn collect_polytope_lines(ctx: &mut SolverContext, polytope: &mut Polytope) -> Vec<PluckerPoint> {
    if ctx.config.representative_line_sampling {
        if let Some(line) = polytope.compute_representative_line(ctx.polyhedron, ctx.tol) {
            return vec![line];
        }
    }
    polytope
        .extremal_stabbing_lines()
        .iter()
        .map(|esl| esl.point)
        .collect()
}

/// A silhouette is fully occluding once every edge has been pushed at least
/// once (`available_edge_count() == 0`) and every collected line lies
/// strictly negative of every processed edge's hyperplane.
fn is_occluded(ctx: &SolverContext, occluders: &[usize], lines: &[PluckerPoint]) -> bool {
    if lines.is_empty() {
        return false;
    }
    occluders.iter().any(|&sil_idx| {
        let silhouette = &ctx.silhouettes[sil_idx];
        if silhouette.available_edge_count() != 0 {
            return false;
        }
        silhouette.processed_edges().iter().all(|&edge_idx| {
            let Some(h_idx) = silhouette.edges[edge_idx].hyperplane else {
                return false;
            };
            let h = ctx.polyhedron.point(h_idx);
            lines
                .iter()
                .all(|line| sign(h.dot(line), ctx.tol.eps_plane) == Sign::Neg)
        })
    })
}

fn pick_active_edge(silhouettes: &[Silhouette], occluders: &[usize]) -> Option<(usize, usize)> {
    for &sil_idx in occluders {
        if let Some(edge_idx) = silhouettes[sil_idx].first_active_edge() {
            return Some((sil_idx, edge_idx));
        }
    }
    None
}

fn is_edge_inside_polytope(
    a: Vector3<f64>,
    b: Vector3<f64>,
    polytope: &Polytope,
    approx_normal: Vector3<f64>,
    polyhedron: &Polyhedron,
    tol: &ToleranceConfig,
) -> bool {
    let e = b - a;
    let mut e1 = approx_normal.cross(&e);
    let norm = e1.norm();
    if norm <= f64::EPSILON {
        return false;
    }
    e1 = e1 / norm * e.norm();

    let h1 = PluckerPoint::from_points(a, a + e1);
    let has_point_inside_1 = polytope.vertices.iter().any(|&v| {
        let pos = sign(h1.dot(&polyhedron.point(v as usize)), tol.eps_plane);
        pos == Sign::Neg || pos == Sign::Zero
    });

    let h2 = PluckerPoint::from_points(b, b + e1);
    let has_point_inside_2 = polytope.vertices.iter().any(|&v| {
        let pos = sign(h2.dot(&polyhedron.point(v as usize)), tol.eps_plane);
        pos == Sign::Pos || pos == Sign::Zero
    });

    has_point_inside_1 && has_point_inside_2
}
