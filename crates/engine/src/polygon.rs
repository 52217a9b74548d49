//! Convex polygon sources (A and B) — an ordered ring of 3D points with a
//! supporting plane, as described in §3's "Convex polygon" data model.

use nalgebra::Vector3;

use crate::error::{EngineError, Result};
use crate::geometry::{clip_polygon_by_plane, Plane};

/// An ordered ring of 3D points plus its supporting plane.
#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    pub vertices: Vec<Vector3<f64>>,
    pub plane: Plane,
}

impl ConvexPolygon {
    /// Build a source polygon. If `vertices` has fewer than 3 entries, a
    /// synthetic plane is adopted using `approx_normal` (the A→B centroid
    /// direction), matching §3's degenerate-source handling.
    pub fn new(vertices: Vec<Vector3<f64>>, approx_normal: Vector3<f64>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(EngineError::EmptyPolygon);
        }
        for v in &vertices {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(EngineError::NonFiniteVertex(format!("{v:?}")));
            }
        }
        let plane = if vertices.len() >= 3 {
            Plane::from_points(vertices[0], vertices[1], vertices[2])
                .unwrap_or_else(|| synthetic_plane(&vertices, approx_normal))
        } else {
            synthetic_plane(&vertices, approx_normal)
        };
        Ok(Self { vertices, plane })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of edge hyperplanes this source contributes to the builder
    /// (C9 step 2): `max(|vertices|, 3)`, since degenerate sources are
    /// synthesised up to a triangle.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.vertices.len().max(3)
    }

    /// Vertex `i` of the (possibly synthesised) polygon used for edge
    /// construction. For fewer than 3 real vertices, vertices are repeated
    /// around a tiny triangle anchored at the real point(s) so that exactly
    /// `edge_count()` edges are produced.
    pub fn synthesized_vertex(&self, i: usize) -> Vector3<f64> {
        if self.vertices.len() >= 3 {
            return self.vertices[i % self.vertices.len()];
        }
        // Degenerate source: place synthetic vertices in the supporting
        // plane around the real point(s), forming a tiny triangle.
        let k = i % 3;
        if self.vertices.len() == 1 {
            let basis = orthonormal_basis(self.plane.n);
            let angle = (k as f64) * std::f64::consts::TAU / 3.0;
            let offset = (basis.0 * angle.cos() + basis.1 * angle.sin()) * 1e-6;
            self.vertices[0] + offset
        } else {
            match k {
                0 => self.vertices[0],
                1 => self.vertices[1],
                _ => (self.vertices[0] + self.vertices[1]) / 2.0,
            }
        }
    }

    /// Clip this polygon against `other`'s plane with a guard band `eps`.
    pub fn clip_against(&self, other_plane: &Plane, eps: f64) -> Vec<Vector3<f64>> {
        clip_polygon_by_plane(&self.vertices, other_plane, eps)
    }
}

fn synthetic_plane(vertices: &[Vector3<f64>], approx_normal: Vector3<f64>) -> Plane {
    let n = if approx_normal.norm() > f64::EPSILON {
        approx_normal.normalize()
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };
    let c = n.dot(&vertices[0]);
    Plane::new(n, c)
}

fn orthonormal_basis(n: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = if n.norm() > f64::EPSILON {
        n.normalize()
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };
    let helper = if n.x.abs() < 0.9 {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    };
    let u = n.cross(&helper).normalize();
    let v = n.cross(&u);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn triangle_keeps_its_own_plane() {
        let poly = ConvexPolygon::new(
            vec![
                vector![0.0, 0.0, 0.0],
                vector![1.0, 0.0, 0.0],
                vector![0.0, 1.0, 0.0],
            ],
            vector![0.0, 0.0, 1.0],
        )
        .unwrap();
        assert_eq!(poly.edge_count(), 3);
        assert!((poly.plane.n.normalize().z.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn point_source_gets_synthetic_plane_and_three_edges() {
        let poly = ConvexPolygon::new(vec![vector![0.0, 0.0, 0.0]], vector![0.0, 0.0, 1.0]).unwrap();
        assert_eq!(poly.edge_count(), 3);
    }

    #[test]
    fn rejects_non_finite_vertices() {
        let err = ConvexPolygon::new(vec![vector![f64::NAN, 0.0, 0.0]], vector![0.0, 0.0, 1.0]);
        assert!(err.is_err());
    }
}
