//! The predicate layer (C3): every structural "which side" decision in the
//! engine funnels through these functions so the tolerance policy lives in
//! one place.

use nalgebra::Vector3;

use super::plane::{Plane, Ray};
use crate::plucker::PluckerPoint;
use crate::tolerance::{sign, Sign};

/// Classify `p` against the guard-banded half-space `plane.dot(p) <= eps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Interior,
    Boundary,
    Exterior,
}

#[inline]
pub fn classify_point(plane: &Plane, p: Vector3<f64>, eps: f64) -> Side {
    match sign(plane.dot(p), eps) {
        Sign::Neg => Side::Interior,
        Sign::Zero => Side::Boundary,
        Sign::Pos => Side::Exterior,
    }
}

/// Intersection of the infinite line `origin + t*dir` with `plane`.
pub fn plane_intersect_line(
    plane: &Plane,
    origin: Vector3<f64>,
    dir: Vector3<f64>,
    eps: f64,
) -> Option<Vector3<f64>> {
    let denom = plane.n.dot(&dir);
    if denom.abs() <= eps {
        return None;
    }
    let t = (plane.c - plane.n.dot(&origin)) / denom;
    Some(origin + dir * t)
}

/// Convex-combination weights for interpolating a crossing point from two
/// signed plane offsets (η at v1, γ at v2, opposite sign). Only `|offset|`
/// is used; the far vertex (larger magnitude) is weighted down. Degenerates
/// to an even split when both offsets are within ε of the plane
/// (cf. Bajaj–Pascucci numerically-robust interpolation).
pub fn interp_weights(offset1: f64, offset2: f64, eps: f64) -> (f64, f64) {
    let eta = offset1.abs();
    let gamma = offset2.abs();
    if eta > eps && gamma > eps {
        let sum = eta + gamma;
        (gamma / sum, eta / sum)
    } else {
        (0.5, 0.5)
    }
}

/// Interpolate a 3D point crossing `plane` between `v1` (offset1) and `v2` (offset2).
pub fn interpolate_point3(
    offset1: f64,
    offset2: f64,
    v1: Vector3<f64>,
    v2: Vector3<f64>,
    eps: f64,
) -> Vector3<f64> {
    let (a, b) = interp_weights(offset1, offset2, eps);
    v1 * a + v2 * b
}

/// Interpolate a Plücker vertex crossing a hyperplane between `v1` (offset1)
/// and `v2` (offset2). Used by the splitter (C10) to build split-induced
/// vertices.
pub fn interpolate_plucker(
    offset1: f64,
    offset2: f64,
    v1: PluckerPoint,
    v2: PluckerPoint,
    eps: f64,
) -> PluckerPoint {
    let (a, b) = interp_weights(offset1, offset2, eps);
    v1 * a + v2 * b
}

/// Sutherland–Hodgman clip of an ordered 3D polygon by `plane`'s positive
/// half-space (`plane.dot(p) >= -eps`), with an ε guard band that inflates
/// the kept half-space.
pub fn clip_polygon_by_plane(poly: &[Vector3<f64>], plane: &Plane, eps: f64) -> Vec<Vector3<f64>> {
    if poly.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(poly.len() + 1);
    let n = poly.len();
    for i in 0..n {
        let cur = poly[i];
        let prev = poly[(i + n - 1) % n];
        let cur_off = plane.dot(cur);
        let prev_off = plane.dot(prev);
        let cur_in = cur_off >= -eps;
        let prev_in = prev_off >= -eps;
        if cur_in {
            if !prev_in {
                if let Some(p) = plane_intersect_line(plane, prev, cur - prev, 1e-15) {
                    out.push(p);
                }
            }
            out.push(cur);
        } else if prev_in {
            if let Some(p) = plane_intersect_line(plane, prev, cur - prev, 1e-15) {
                out.push(p);
            }
        }
    }
    out
}

/// Watertight ray-triangle intersection (Woop, Benthin & Wald 2013 variant).
/// Returns the hit parameter `t` if the ray crosses the triangle within
/// `[ray.t_near, ray.t_far]`; triangles are tested double-sided.
pub fn ray_triangle_hits(
    ray: &Ray,
    v0: Vector3<f64>,
    v1: Vector3<f64>,
    v2: Vector3<f64>,
) -> Option<f64> {
    // Dominant axis of the ray direction.
    let ax = ray.dir.x.abs();
    let ay = ray.dir.y.abs();
    let az = ray.dir.z.abs();
    let (kz, kx, ky) = if ax >= ay && ax >= az {
        (0usize, 1usize, 2usize)
    } else if ay >= az {
        (1, 2, 0)
    } else {
        (2, 0, 1)
    };
    let mut kx = kx;
    let mut ky = ky;
    let kz = kz;
    if ray.dir[kz] < 0.0 {
        std::mem::swap(&mut kx, &mut ky);
    }
    let sx = ray.dir[kx] / ray.dir[kz];
    let sy = ray.dir[ky] / ray.dir[kz];
    let sz = 1.0 / ray.dir[kz];

    let a = v0 - ray.origin;
    let b = v1 - ray.origin;
    let c = v2 - ray.origin;

    let ax_ = a[kx] - sx * a[kz];
    let ay_ = a[ky] - sy * a[kz];
    let bx_ = b[kx] - sx * b[kz];
    let by_ = b[ky] - sy * b[kz];
    let cx_ = c[kx] - sx * c[kz];
    let cy_ = c[ky] - sy * c[kz];

    let u = cx_ * by_ - cy_ * bx_;
    let v = ax_ * cy_ - ay_ * cx_;
    let w = bx_ * ay_ - by_ * ax_;
    // Woop et al. recompute an exactly-zero barycentric at higher precision
    // than the ray's own scalar type; we ship `f64` only (our widest type),
    // so there is no higher-precision fallback to reach for here.

    if (u < 0.0 || v < 0.0 || w < 0.0) && (u > 0.0 || v > 0.0 || w > 0.0) {
        return None;
    }
    let det = u + v + w;
    if det == 0.0 {
        return None;
    }

    let az_ = sz * a[kz];
    let bz_ = sz * b[kz];
    let cz_ = sz * c[kz];
    let t = u * az_ + v * bz_ + w * cz_;

    let t = t / det;
    if t < ray.t_near || t > ray.t_far {
        return None;
    }
    Some(t)
}

/// Axis-aligned bounding box slab test.
pub fn ray_aabb_hits(ray: &Ray, lo: Vector3<f64>, hi: Vector3<f64>) -> bool {
    let mut t_min = ray.t_near;
    let mut t_max = ray.t_far;
    for axis in 0..3 {
        let d = ray.dir[axis];
        let o = ray.origin[axis];
        if d.abs() <= f64::EPSILON {
            if o < lo[axis] || o > hi[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (lo[axis] - o) * inv;
        let mut t1 = (hi[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}
