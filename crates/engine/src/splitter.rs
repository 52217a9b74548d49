//! Polytope splitter (C10): clips a polytope by a single hyperplane into
//! negative/positive sub-polytopes (§4.3). The facet-set bookkeeping here
//! is grounded on the same "sorted `Vec`, re-sort only if broken, binary
//! search for membership" idiom the distilled spec names throughout C7.

use crate::geometry::interpolate_plucker;
use crate::plucker::PluckerPoint;
use crate::polyhedron::Polyhedron;
use crate::polytope::{Edge, Polytope};
use crate::tolerance::{sign, Sign, ToleranceConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitKind {
    /// Every vertex was classified `positive`; `P` passed through as-is.
    Positive,
    /// Every vertex was classified `negative`; `P` passed through as-is.
    Negative,
    /// `P` straddles `h`; `left`/`right` are genuinely new sub-polytopes.
    Boundary,
}

pub struct SplitResult {
    pub kind: SplitKind,
    pub left: Polytope,
    pub right: Polytope,
}

/// Split `source` by the hyperplane at polyhedron index `h_idx`.
pub fn split(
    source: &Polytope,
    h_idx: u32,
    polyhedron: &mut Polyhedron,
    tol: &ToleranceConfig,
) -> SplitResult {
    let h = polyhedron.point(h_idx as usize);

    let classes: Vec<Sign> = source
        .vertices
        .iter()
        .map(|&v| sign(h.dot(&polyhedron.point(v as usize)), tol.eps_plane))
        .collect();

    let any_negative = classes.iter().any(|&c| c == Sign::Neg);
    let any_positive = classes.iter().any(|&c| c == Sign::Pos);

    if !any_negative && !any_positive {
        // Entirely on the hyperplane: copy every edge into both sides,
        // attach h to every vertex's facet set.
        for &v in &source.vertices {
            polyhedron.attach_facet(v as usize, h_idx);
        }
        return SplitResult {
            kind: SplitKind::Boundary,
            left: source.clone(),
            right: source.clone(),
        };
    }
    if !any_negative {
        return SplitResult {
            kind: SplitKind::Positive,
            left: Polytope::default(),
            right: source.clone(),
        };
    }
    if !any_positive {
        return SplitResult {
            kind: SplitKind::Negative,
            left: source.clone(),
            right: Polytope::default(),
        };
    }

    // Attach h to on-boundary vertices.
    for (i, &v) in source.vertices.iter().enumerate() {
        if classes[i] == Sign::Zero {
            polyhedron.attach_facet(v as usize, h_idx);
        }
    }

    let mut left_vertices = Vec::new();
    let mut right_vertices = Vec::new();
    for (i, &v) in source.vertices.iter().enumerate() {
        match classes[i] {
            Sign::Neg | Sign::Zero => left_vertices.push(v),
            Sign::Pos => {}
        }
        match classes[i] {
            Sign::Pos | Sign::Zero => right_vertices.push(v),
            Sign::Neg => {}
        }
    }

    let class_of = |v: u32| -> Sign {
        source
            .vertices
            .iter()
            .position(|&x| x == v)
            .map(|i| classes[i])
            .expect("edge endpoint must be a polytope vertex")
    };

    let split_start = polyhedron.len();
    let mut left_edges = Vec::new();
    let mut right_edges = Vec::new();
    let mut new_vertices: Vec<u32> = Vec::new();

    for &edge in &source.edges {
        let c1 = class_of(edge.v1);
        let c2 = class_of(edge.v2);
        match (c1, c2) {
            (Sign::Pos, Sign::Pos) | (Sign::Pos, Sign::Zero) | (Sign::Zero, Sign::Pos) => {
                right_edges.push(edge);
            }
            (Sign::Neg, Sign::Neg) | (Sign::Neg, Sign::Zero) | (Sign::Zero, Sign::Neg) => {
                left_edges.push(edge);
            }
            (Sign::Zero, Sign::Zero) => {
                left_edges.push(edge);
                right_edges.push(edge);
            }
            (Sign::Neg, Sign::Pos) | (Sign::Pos, Sign::Neg) => {
                let (neg, pos) = if c1 == Sign::Neg {
                    (edge.v1, edge.v2)
                } else {
                    (edge.v2, edge.v1)
                };
                let m = split_edge(neg, pos, h_idx, h, polyhedron, tol, split_start);
                left_edges.push(Edge::new(neg, m));
                right_edges.push(Edge::new(m, pos));
                if !new_vertices.contains(&m) {
                    new_vertices.push(m);
                }
            }
        }
    }

    // New edges between newly created vertices sharing >= 3 facets.
    for (pi, &v1) in new_vertices.iter().enumerate() {
        for &v2 in &new_vertices[pi + 1..] {
            if v1 == v2 {
                continue;
            }
            let f1 = polyhedron.facet_set(v1 as usize);
            let f2 = polyhedron.facet_set(v2 as usize);
            if Polyhedron::facets_shared_at_least(f1, f2, 3) && !plucker_identical(polyhedron, v1, v2, tol) {
                let e = Edge::new(v1, v2);
                left_edges.push(e);
                right_edges.push(e);
            }
        }
    }

    for &v in &new_vertices {
        left_vertices.push(v);
        right_vertices.push(v);
    }
    dedup_u32(&mut left_vertices);
    dedup_u32(&mut right_vertices);

    collapse_identical_edges(&mut left_edges, polyhedron, tol);
    collapse_identical_edges(&mut right_edges, polyhedron, tol);
    dedup_edges(&mut left_edges);
    dedup_edges(&mut right_edges);

    let mut left = Polytope::new(left_vertices, left_edges);
    let mut right = Polytope::new(right_vertices, right_edges);
    left.recompute_quadric_cache(polyhedron, tol);
    right.recompute_quadric_cache(polyhedron, tol);

    SplitResult {
        kind: SplitKind::Boundary,
        left,
        right,
    }
}

#[allow(clippy::too_many_arguments)]
fn split_edge(
    neg: u32,
    pos: u32,
    h_idx: u32,
    h: PluckerPoint,
    polyhedron: &mut Polyhedron,
    tol: &ToleranceConfig,
    dedup_since: usize,
) -> u32 {
    let v1 = polyhedron.point(neg as usize);
    let v2 = polyhedron.point(pos as usize);
    let offset1 = h.dot(&v1);
    let offset2 = h.dot(&v2);

    let mut facets: Vec<u32> = polyhedron
        .facet_set(neg as usize)
        .iter()
        .copied()
        .filter(|f| polyhedron.facet_set(pos as usize).contains(f))
        .collect();
    facets.push(h_idx);
    facets.sort_unstable();
    facets.dedup();

    if let Some(existing) = polyhedron.find_facet_set_since(dedup_since, &facets) {
        return existing as u32;
    }

    let point = interpolate_plucker(offset1, offset2, v1, v2, tol.eps_plane);
    polyhedron.push(point, facets, false, tol) as u32
}

fn plucker_identical(polyhedron: &Polyhedron, v1: u32, v2: u32, tol: &ToleranceConfig) -> bool {
    let p1 = polyhedron.point(v1 as usize);
    let p2 = polyhedron.point(v2 as usize);
    (p1.d - p2.d).norm() <= tol.eps_identical && (p1.l - p2.l).norm() <= tol.eps_identical
}

fn collapse_identical_edges(edges: &mut Vec<Edge>, polyhedron: &Polyhedron, tol: &ToleranceConfig) {
    edges.retain(|e| !plucker_identical(polyhedron, e.v1, e.v2, tol));
}

fn dedup_edges(edges: &mut Vec<Edge>) {
    edges.sort_unstable_by_key(|e| (e.v1, e.v2));
    edges.dedup();
}

fn dedup_u32(values: &mut Vec<u32>) {
    values.sort_unstable();
    values.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_initial_polytope;
    use crate::polygon::ConvexPolygon;
    use nalgebra::vector;
    use proptest::prelude::*;

    fn sample() -> (Polyhedron, Polytope, ToleranceConfig) {
        let a = ConvexPolygon::new(
            vec![
                vector![0.0, 0.0, 0.0],
                vector![1.0, 0.0, 0.0],
                vector![0.0, 1.0, 0.0],
            ],
            vector![0.0, 0.0, 1.0],
        )
        .unwrap();
        let b = ConvexPolygon::new(
            vec![
                vector![0.0, 0.0, 1.0],
                vector![1.0, 0.0, 1.0],
                vector![0.0, 1.0, 1.0],
            ],
            vector![0.0, 0.0, 1.0],
        )
        .unwrap();
        let tol = ToleranceConfig::default();
        let mut ph = Polyhedron::new();
        let polytope = build_initial_polytope(&a, &b, &mut ph, &tol).unwrap();
        (ph, polytope, tol)
    }

    #[test]
    fn splitting_by_a_far_away_plane_keeps_everything_on_one_side() {
        let (mut ph, polytope, tol) = sample();
        // A hyperplane whose Plücker dot is uniformly positive against every
        // stabbing vertex: the line through two points far outside the
        // source's convex hull in both directions.
        let far = PluckerPoint::from_points(vector![100.0, 100.0, 100.0], vector![100.0, 100.0, 101.0]);
        let h_idx = ph.push(far, Vec::new(), false, &tol);
        let result = split(&polytope, h_idx as u32, &mut ph, &tol);
        assert!(matches!(result.kind, SplitKind::Positive | SplitKind::Negative));
    }

    #[test]
    fn splitting_facet_sets_stay_sorted() {
        let (mut ph, polytope, tol) = sample();
        let h = PluckerPoint::from_points(vector![0.3, 0.3, 0.5], vector![0.6, 0.1, 0.5]);
        let h_idx = ph.push(h, Vec::new(), false, &tol) as u32;
        let result = split(&polytope, h_idx, &mut ph, &tol);
        for side in [&result.left, &result.right] {
            for &v in &side.vertices {
                let set = ph.facet_set(v as usize);
                let mut sorted = set.to_vec();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(set, sorted.as_slice());
            }
        }
    }

    proptest::proptest! {
        /// Facet-set monotonicity: a vertex carried from the source polytope
        /// into a split side never loses a facet, it only accumulates the
        /// splitting hyperplane.
        #[test]
        fn facet_sets_only_grow_across_a_split(hx in -2.0f64..2.0, hy in -2.0f64..2.0, hz in 0.2f64..0.8) {
            let (mut ph, polytope, tol) = sample();
            let before: std::collections::HashMap<u32, Vec<u32>> = polytope
                .vertices
                .iter()
                .map(|&v| (v, ph.facet_set(v as usize).to_vec()))
                .collect();

            let h = PluckerPoint::from_points(vector![hx, hy, hz], vector![hx + 0.1, hy - 0.1, hz]);
            let h_idx = ph.push(h, Vec::new(), false, &tol) as u32;
            let result = split(&polytope, h_idx, &mut ph, &tol);

            for side in [&result.left, &result.right] {
                for &v in &side.vertices {
                    if let Some(before_set) = before.get(&v) {
                        let after_set = ph.facet_set(v as usize);
                        for f in before_set {
                            prop_assert!(after_set.contains(f));
                        }
                    }
                }
            }
        }

        /// Containment under split: every vertex of the source polytope
        /// survives into at least one side (negative vertices into `left`,
        /// positive into `right`, boundary into both) — splitting drops
        /// vertices only by construction, never silently.
        #[test]
        fn every_source_vertex_survives_into_some_side(hx in -2.0f64..2.0, hy in -2.0f64..2.0, hz in 0.2f64..0.8) {
            let (mut ph, polytope, tol) = sample();
            let h = PluckerPoint::from_points(vector![hx, hy, hz], vector![hx + 0.1, hy - 0.1, hz]);
            let h_idx = ph.push(h, Vec::new(), false, &tol) as u32;
            let result = split(&polytope, h_idx, &mut ph, &tol);

            for &v in &polytope.vertices {
                let on_left = result.left.vertices.contains(&v);
                let on_right = result.right.vertices.contains(&v);
                prop_assert!(on_left || on_right);
            }
        }
    }
}
