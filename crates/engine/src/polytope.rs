//! Polytope skeleton (C8): a set of vertex indices into the polyhedron plus
//! an edge list, with caches for quadric-crossing edges and extremal
//! stabbing lines. Lifecycle: created by the builder (C9) or the splitter
//! (C10), mutated only by the splitter, dropped when the owning recursion
//! frame returns.

use crate::geometry::plucker_edge_quadric_roots;
use crate::plucker::PluckerPoint;
use crate::polyhedron::Polyhedron;
use crate::tolerance::ToleranceConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub v1: u32,
    pub v2: u32,
}

impl Edge {
    pub fn new(v1: u32, v2: u32) -> Self {
        if v1 <= v2 {
            Self { v1, v2 }
        } else {
            Self { v1: v2, v2: v1 }
        }
    }
}

/// An extremal stabbing line: a quadric-crossing point on one of the
/// polytope's edges, corresponding to a real 3D line tangent to the
/// visibility polytope.
#[derive(Clone, Copy, Debug)]
pub struct ExtremalStabbingLine {
    pub edge: Edge,
    pub point: PluckerPoint,
}

#[derive(Clone, Debug, Default)]
pub struct Polytope {
    pub vertices: Vec<u32>,
    pub edges: Vec<Edge>,
    esls: Vec<ExtremalStabbingLine>,
    representative_line: Option<PluckerPoint>,
}

impl Polytope {
    pub fn new(vertices: Vec<u32>, edges: Vec<Edge>) -> Self {
        Self {
            vertices,
            edges,
            esls: Vec::new(),
            representative_line: None,
        }
    }

    pub fn add_edge(&mut self, e: Edge) {
        if e.v1 == e.v2 {
            return;
        }
        if !self.edges.contains(&e) {
            self.edges.push(e);
        }
    }

    pub fn extremal_stabbing_lines(&self) -> &[ExtremalStabbingLine] {
        &self.esls
    }

    pub fn representative_line(&self) -> Option<PluckerPoint> {
        self.representative_line
    }

    /// Recompute the edge-quadric cache: every edge that crosses the
    /// quadric contributes its intersection point(s) as ESLs (§4.6).
    pub fn recompute_quadric_cache(&mut self, polyhedron: &Polyhedron, tol: &ToleranceConfig) {
        self.esls.clear();
        for &edge in &self.edges {
            let v1 = polyhedron.point(edge.v1 as usize);
            let v2 = polyhedron.point(edge.v2 as usize);
            for root in plucker_edge_quadric_roots(v1, v2, tol) {
                self.esls.push(ExtremalStabbingLine {
                    edge,
                    point: root.point,
                });
            }
        }
    }

    /// `true` if at least one edge of this polytope crosses (or touches)
    /// the quadric — i.e. the polytope still contains a real stabbing line.
    pub fn has_real_edge(&self) -> bool {
        !self.esls.is_empty()
    }

    /// Project the sum of this polytope's vertices onto the quadric,
    /// yielding a single "interior" representative line. Not formally a
    /// real line in general (the centroid need not lie on the quadric);
    /// practically useful as an occluder-finding heuristic (§9).
    pub fn compute_representative_line(
        &mut self,
        polyhedron: &Polyhedron,
        tol: &ToleranceConfig,
    ) -> Option<PluckerPoint> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut sum = PluckerPoint::zero();
        for &v in &self.vertices {
            sum = sum + polyhedron.point(v as usize);
        }
        let avg = sum / (self.vertices.len() as f64);
        let line = project_onto_quadric(avg, tol);
        self.representative_line = line;
        line
    }
}

/// Project an (in general imaginary) Plücker point onto the quadric via the
/// closed-form solution: writing `p = (a, b)`, find scalar `mu` such that
/// `(a - mu*b)·(b - mu*a) = 0`, i.e. the root of
/// `p_val*mu^2 - q*mu + p_val = 0` with `p_val = a·b`, `q = |a|^2 + |b|^2`,
/// taken in the numerically stable form `mu = 2*p_val / (q + sqrt(q^2 -
/// 4*p_val^2))`. The discriminant is never negative: by AM-GM,
/// `|a·b| <= |a||b| <= q/2`. `None` only for the degenerate zero point.
fn project_onto_quadric(p: PluckerPoint, tol: &ToleranceConfig) -> Option<PluckerPoint> {
    let a = p.d;
    let b = p.l;
    let q = a.norm_squared() + b.norm_squared();
    if q <= tol.eps_quadric {
        return None;
    }
    let p_val = a.dot(&b);
    let discriminant = (q * q - 4.0 * p_val * p_val).max(0.0);
    let mu = 2.0 * p_val / (q + discriminant.sqrt());
    let projected = PluckerPoint::new(a - b * mu, b - a * mu);
    Some(projected.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::ToleranceConfig;
    use nalgebra::vector;

    #[test]
    fn edge_is_order_independent() {
        assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
    }

    #[test]
    fn self_loop_edges_are_rejected() {
        let mut poly = Polytope::new(vec![0, 1], vec![]);
        poly.add_edge(Edge::new(0, 0));
        assert!(poly.edges.is_empty());
    }

    #[test]
    fn project_onto_quadric_yields_a_real_nonzero_line() {
        let tol = ToleranceConfig::default();
        let off_quadric = PluckerPoint::new(vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 1.0]);
        let projected = project_onto_quadric(off_quadric, &tol).expect("real projection exists");
        assert!(projected.dot(&projected).abs() < 1e-9);
        assert!(projected.d.norm() > 1e-9 || projected.l.norm() > 1e-9);
        assert!(crate::geometry::back_to_3d(&projected).is_some());
    }

    #[test]
    fn project_onto_quadric_is_a_no_op_for_a_point_already_on_the_quadric() {
        let tol = ToleranceConfig::default();
        let on_quadric = PluckerPoint::from_points(vector![0.0, 0.0, 0.0], vector![1.0, 2.0, 3.0]);
        let projected = project_onto_quadric(on_quadric, &tol).expect("already real");
        let cross = on_quadric.d.cross(&projected.d);
        assert!(cross.norm() < 1e-9);
    }

    #[test]
    fn quadric_cache_detects_crossing_edge() {
        let tol = ToleranceConfig::default();
        let mut ph = Polyhedron::new();
        let on_quadric = PluckerPoint::from_points(vector![0.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]);
        let other = PluckerPoint::from_points(vector![0.0, 1.0, 0.0], vector![1.0, 1.0, 0.0]);
        let i0 = ph.push(on_quadric, vec![1, 2, 3], false, &tol);
        let i1 = ph.push(other, vec![4, 5, 6], false, &tol);
        let mut poly = Polytope::new(vec![i0 as u32, i1 as u32], vec![Edge::new(i0 as u32, i1 as u32)]);
        poly.recompute_quadric_cache(&ph, &tol);
        assert!(poly.has_real_edge());
    }
}
