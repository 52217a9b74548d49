//! 3D plane `n · x = c`, and the oriented ray used by the ray backend (C1).

use nalgebra::Vector3;

/// Plane `n · x = c`. `n` need not be unit length; callers that need a
/// consistent offset-magnitude (e.g. the splitter) normalise explicitly.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub n: Vector3<f64>,
    pub c: f64,
}

impl Plane {
    #[inline]
    pub fn new(n: Vector3<f64>, c: f64) -> Self {
        Self { n, c }
    }

    /// Plane through three points, outward normal via `(b-a) × (c-a)`.
    pub fn from_points(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        if n.norm() <= f64::EPSILON {
            return None;
        }
        Some(Self {
            n,
            c: n.dot(&a),
        })
    }

    /// Signed distance-like quantity: positive on the side `n` points to.
    #[inline]
    pub fn dot(&self, p: Vector3<f64>) -> f64 {
        self.n.dot(&p) - self.c
    }
}

/// Parametric ray `o + t*d`, restricted to `t ∈ [t_near, t_far]`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3<f64>,
    pub dir: Vector3<f64>,
    pub t_near: f64,
    pub t_far: f64,
}

impl Ray {
    pub fn new(origin: Vector3<f64>, dir: Vector3<f64>) -> Self {
        Self {
            origin,
            dir,
            t_near: 0.0,
            t_far: f64::INFINITY,
        }
    }

    /// Ray from `a` to `b`, clipped to the segment (`t_far = 1`).
    pub fn segment(a: Vector3<f64>, b: Vector3<f64>) -> Self {
        Self {
            origin: a,
            dir: b - a,
            t_near: 1e-6,
            t_far: 1.0 - 1e-6,
        }
    }
}
