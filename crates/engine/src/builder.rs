//! Polytope builder (C9): builds the initial A×B polytope once per query
//! (§4.2). Edges of A and B become hyperplanes; every `(a_i, b_j)` pair
//! becomes a stabbing vertex.

use nalgebra::Vector3;

use crate::error::{EngineError, Result};
use crate::geometry::Plane;
use crate::plucker::PluckerPoint;
use crate::polygon::ConvexPolygon;
use crate::polyhedron::Polyhedron;
use crate::polytope::{Edge, Polytope};
use crate::tolerance::ToleranceConfig;

/// Clips A against B's plane and vice versa (step 1); builds hyperplanes,
/// stabbing vertices, and edges (steps 2-4); primes the quadric cache
/// (step 5).
pub fn build_initial_polytope(
    a: &ConvexPolygon,
    b: &ConvexPolygon,
    polyhedron: &mut Polyhedron,
    tol: &ToleranceConfig,
) -> Result<Polytope> {
    if planes_are_coincident(&a.plane, &b.plane, tol.eps_plane) {
        // A and B share a supporting plane: there is no half-space of one
        // that excludes the other, so the "disjoint supporting half-spaces"
        // assumption behind every later step cannot hold.
        return Err(EngineError::ClippingFailure);
    }

    let approx_ab = centroid(&b.vertices) - centroid(&a.vertices);
    if approx_ab.norm() <= tol.eps_plane {
        return Err(EngineError::ClippingFailure);
    }
    // The disjointness check is about geometry, not about which way the
    // caller happened to wind A/B's vertices: orient each plane toward the
    // other source before clipping, rather than trusting the raw winding.
    let a_clip_plane = orient_toward(&a.plane, approx_ab);
    let b_clip_plane = orient_toward(&b.plane, -approx_ab);

    let clipped_a = a.clip_against(&b_clip_plane, tol.eps_plane);
    let clipped_b = b.clip_against(&a_clip_plane, tol.eps_plane);
    if clipped_a.is_empty() || clipped_b.is_empty() {
        return Err(EngineError::ClippingFailure);
    }

    // Step 2: A's edges clockwise, B's edges counter-clockwise.
    let a_edge_count = a.edge_count();
    let b_edge_count = b.edge_count();
    let mut a_hyperplanes = Vec::with_capacity(a_edge_count);
    for i in 0..a_edge_count {
        let p0 = a.synthesized_vertex(i);
        let p1 = a.synthesized_vertex(i + 1);
        let line = PluckerPoint::from_points(p1, p0); // clockwise: reversed
        let idx = polyhedron.push(line, Vec::new(), false, tol);
        a_hyperplanes.push(idx as u32);
    }
    let mut b_hyperplanes = Vec::with_capacity(b_edge_count);
    for i in 0..b_edge_count {
        let p0 = b.synthesized_vertex(i);
        let p1 = b.synthesized_vertex(i + 1);
        let line = PluckerPoint::from_points(p0, p1); // counter-clockwise
        let idx = polyhedron.push(line, Vec::new(), false, tol);
        b_hyperplanes.push(idx as u32);
    }

    // Step 3: |A|*|B| stabbing vertices.
    let mut vertices = Vec::with_capacity(a_edge_count * b_edge_count);
    for i in 0..a_edge_count {
        let a_prev = a_hyperplanes[(i + a_edge_count - 1) % a_edge_count];
        let a_next = a_hyperplanes[i];
        for j in 0..b_edge_count {
            let b_prev = b_hyperplanes[(j + b_edge_count - 1) % b_edge_count];
            let b_next = b_hyperplanes[j];
            let pa = a.synthesized_vertex(i);
            let pb = b.synthesized_vertex(j);
            let line = PluckerPoint::from_points(pa, pb);
            let mut facets = vec![a_prev, a_next, b_prev, b_next];
            facets.sort_unstable();
            facets.dedup();
            let idx = polyhedron.push(line, facets, false, tol);
            vertices.push(idx as u32);
        }
    }

    // Step 4: connect every pair sharing >= 3 facets.
    let mut edges = Vec::new();
    for (pos, &v1) in vertices.iter().enumerate() {
        for &v2 in &vertices[pos + 1..] {
            let f1 = polyhedron.facet_set(v1 as usize);
            let f2 = polyhedron.facet_set(v2 as usize);
            if Polyhedron::facets_shared_at_least(f1, f2, 3) {
                edges.push(Edge::new(v1, v2));
            }
        }
    }

    let mut polytope = Polytope::new(vertices, edges);
    polytope.recompute_quadric_cache(polyhedron, tol);
    Ok(polytope)
}

/// `plane` flipped if needed so its normal has a non-negative dot with
/// `direction`.
fn orient_toward(plane: &Plane, direction: Vector3<f64>) -> Plane {
    if plane.n.dot(&direction) < 0.0 {
        Plane::new(-plane.n, -plane.c)
    } else {
        *plane
    }
}

/// True when `p1` and `p2` describe the same plane in space (normals
/// parallel, offsets matching under that orientation), within `eps`.
fn planes_are_coincident(p1: &Plane, p2: &Plane, eps: f64) -> bool {
    let n1 = p1.n.norm();
    let n2 = p2.n.norm();
    if n1 <= f64::EPSILON || n2 <= f64::EPSILON {
        return false;
    }
    let cross = p1.n.cross(&p2.n);
    if cross.norm() > eps * n1 * n2 {
        return false;
    }
    let sign = p1.n.dot(&p2.n).signum();
    (p1.c / n1 - sign * p2.c / n2).abs() <= eps
}

fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    let sum: Vector3<f64> = points.iter().fold(Vector3::zeros(), |acc, p| acc + p);
    sum / (points.len() as f64)
}
