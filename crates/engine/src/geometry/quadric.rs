//! Plücker-edge ∩ quadric intersection, and back-projection of a Plücker
//! point on the quadric to a 3D line (§4.1).

use nalgebra::Vector3;

use crate::plucker::PluckerPoint;
use crate::tolerance::ToleranceConfig;

/// A root `t ∈ [0, 1]` of the quadric-edge intersection, with the
/// corresponding Plücker point already materialised.
#[derive(Clone, Copy, Debug)]
pub struct QuadricRoot {
    pub t: f64,
    pub point: PluckerPoint,
}

/// Roots of `f(t) = (v1 + t(v2-v1))·(v1 + t(v2-v1))` in `t ∈ [0, 1]`.
///
/// `v1`/`v2` may already lie on the quadric (within `tol.eps_quadric`); in
/// that case the endpoint itself is returned directly rather than re-derived
/// from the quadratic, matching the "vertex already on quadric" edge case.
pub fn plucker_edge_quadric_roots(
    v1: PluckerPoint,
    v2: PluckerPoint,
    tol: &ToleranceConfig,
) -> Vec<QuadricRoot> {
    let mut roots = Vec::new();
    if v1.dot(&v1).abs() <= tol.eps_quadric {
        roots.push(QuadricRoot { t: 0.0, point: v1 });
    }
    if v2.dot(&v2).abs() <= tol.eps_quadric {
        roots.push(QuadricRoot { t: 1.0, point: v2 });
    }
    if !roots.is_empty() {
        return roots;
    }

    let f = v2 - v1;
    let a = f.dot(&f);
    let b = f.dot(&v1);
    let c = v1.dot(&v1);

    let mut ts: Vec<f64> = Vec::new();
    if a.abs() <= tol.eps_quadric {
        if b.abs() > tol.eps_quadric {
            ts.push(-c / (2.0 * b));
        }
        // else: a ≈ 0 and b ≈ 0 → no root.
    } else {
        let delta = b * b - a * c;
        if delta < -tol.eps_quadric {
            // no real root
        } else if delta.abs() <= tol.eps_quadric {
            ts.push(-b / a);
        } else {
            let sqrt_delta = delta.sqrt();
            ts.push((-b + sqrt_delta) / a);
            ts.push((-b - sqrt_delta) / a);
        }
    }

    for t in ts {
        if t < -tol.eps_root || t > 1.0 + tol.eps_root {
            continue;
        }
        let t = t.clamp(0.0, 1.0);
        let mut point = v1 + (v2 - v1) * t;
        let mut tt = t;
        // One Newton-Raphson refinement pass driving f(t) to zero.
        for _ in 0..tol.newton_iters {
            let fv = point.dot(&point);
            if fv.abs() <= tol.eps_newton {
                break;
            }
            let deriv = 2.0 * a * tt + 2.0 * b;
            if deriv.abs() <= f64::EPSILON {
                break;
            }
            tt -= fv / deriv;
            tt = tt.clamp(0.0, 1.0);
            point = v1 + (v2 - v1) * tt;
        }
        roots.push(QuadricRoot { t: tt, point });
    }
    roots
}

/// Back-project a Plücker point (assumed on the quadric) to the two 3D
/// points defining its line. Picks the world axis whose |dot| with `d` is
/// largest to avoid dividing by a near-zero direction component.
pub fn back_to_3d(p: &PluckerPoint) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let d = p.d;
    let d2 = d.norm_squared();
    if d2 <= f64::EPSILON {
        return None;
    }
    let anchor = d.cross(&p.l) / d2;
    let dir = d / d.norm();

    let axis = if d.x.abs() >= d.y.abs() && d.x.abs() >= d.z.abs() {
        0
    } else if d.y.abs() >= d.z.abs() {
        1
    } else {
        2
    };
    let denom = dir[axis];
    if denom.abs() <= f64::EPSILON {
        return None;
    }
    let t_pos = (1.0 - anchor[axis]) / denom;
    let t_neg = (-1.0 - anchor[axis]) / denom;
    let p_pos = anchor + dir * t_pos;
    let p_neg = anchor + dir * t_neg;
    Some((p_neg, p_pos))
}
