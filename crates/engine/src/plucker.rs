//! Plücker point: the 6-coordinate oriented-line representation (C2).
//!
//! A line through 3D points `p, q` is encoded as `(d, l) = (q - p, p × q)`.
//! The permuted dot product `a·b = d_a·l_b + l_a·d_b` gives the relative
//! orientation of two lines, and a point lies on the Plücker quadric
//! (corresponds to a real 3D line) iff `self · self == 0`.

use nalgebra::Vector3;

use crate::tolerance::{sign, Sign};

/// A point in 6D Plücker space, stored as a direction/location pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PluckerPoint {
    pub d: Vector3<f64>,
    pub l: Vector3<f64>,
}

impl PluckerPoint {
    #[inline]
    pub fn new(d: Vector3<f64>, l: Vector3<f64>) -> Self {
        Self { d, l }
    }

    /// Build the oriented line through `p` then `q`.
    #[inline]
    pub fn from_points(p: Vector3<f64>, q: Vector3<f64>) -> Self {
        Self {
            d: q - p,
            l: p.cross(&q),
        }
    }

    #[inline]
    pub fn zero() -> Self {
        Self {
            d: Vector3::zeros(),
            l: Vector3::zeros(),
        }
    }

    /// Permuted Plücker dot product. Sign gives relative orientation of two
    /// lines: 0 = meet, <0 = skew ccw, >0 = skew cw.
    #[inline]
    pub fn dot(&self, other: &PluckerPoint) -> f64 {
        self.d.dot(&other.l) + self.l.dot(&other.d)
    }

    #[inline]
    pub fn squared_plucker_norm(&self) -> f64 {
        self.d.norm_squared() + self.l.norm_squared()
    }

    /// Project onto the unit hypersphere. No-op (within ε) if already normalised.
    pub fn normalized(&self) -> PluckerPoint {
        let norm = self.squared_plucker_norm().sqrt();
        if norm <= f64::EPSILON {
            return *self;
        }
        PluckerPoint {
            d: self.d / norm,
            l: self.l / norm,
        }
    }

    /// Classify this point against the Plücker quadric (`self · self`).
    #[inline]
    pub fn quadric_sign(&self, eps: f64) -> Sign {
        sign(self.dot(self), eps)
    }

    /// Distance between two lines; handles the skew and parallel cases
    /// separately (parallel: direction cross product vanishes).
    pub fn distance(&self, other: &PluckerPoint, eps: f64) -> f64 {
        let cross_dirs = self.d.cross(&other.d);
        let div = cross_dirs.norm();
        if div.abs() > eps {
            (self.dot(other)).abs() / div
        } else {
            let l1l1 = 1.0 / self.d.norm_squared();
            let l2 = other.d.norm();
            let s = l2 * l1l1.sqrt();
            let l = other.l / s;
            self.d.cross(&(self.l - l)).norm() * l1l1
        }
    }
}

impl std::ops::Add for PluckerPoint {
    type Output = PluckerPoint;
    #[inline]
    fn add(self, rhs: PluckerPoint) -> PluckerPoint {
        PluckerPoint {
            d: self.d + rhs.d,
            l: self.l + rhs.l,
        }
    }
}

impl std::ops::Sub for PluckerPoint {
    type Output = PluckerPoint;
    #[inline]
    fn sub(self, rhs: PluckerPoint) -> PluckerPoint {
        PluckerPoint {
            d: self.d - rhs.d,
            l: self.l - rhs.l,
        }
    }
}

impl std::ops::Mul<f64> for PluckerPoint {
    type Output = PluckerPoint;
    #[inline]
    fn mul(self, rhs: f64) -> PluckerPoint {
        PluckerPoint {
            d: self.d * rhs,
            l: self.l * rhs,
        }
    }
}

impl std::ops::Div<f64> for PluckerPoint {
    type Output = PluckerPoint;
    #[inline]
    fn div(self, rhs: f64) -> PluckerPoint {
        PluckerPoint {
            d: self.d / rhs,
            l: self.l / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn line_through_two_points_lies_on_quadric() {
        let p = vector![0.0, 0.0, 0.0];
        let q = vector![1.0, 2.0, 3.0];
        let line = PluckerPoint::from_points(p, q);
        assert!(line.dot(&line).abs() < 1e-12);
    }

    #[test]
    fn normalizing_is_idempotent() {
        let p = vector![0.0, 0.0, 0.0];
        let q = vector![1.0, 2.0, 3.0];
        let line = PluckerPoint::from_points(p, q).normalized();
        let twice = line.normalized();
        assert!((line.d - twice.d).norm() < 1e-12);
        assert!((line.l - twice.l).norm() < 1e-12);
    }

    #[test]
    fn dot_sign_reflects_orientation() {
        // Two lines through a common point meet: dot == 0.
        let origin = vector![0.0, 0.0, 0.0];
        let a = PluckerPoint::from_points(origin, vector![1.0, 0.0, 0.0]);
        let b = PluckerPoint::from_points(origin, vector![0.0, 1.0, 0.0]);
        assert!(a.dot(&b).abs() < 1e-12);
    }

    #[test]
    fn skew_lines_have_nonzero_distance() {
        let a = PluckerPoint::from_points(vector![0.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]);
        let b = PluckerPoint::from_points(vector![0.0, 0.0, 1.0], vector![0.0, 1.0, 1.0]);
        let dist = a.distance(&b, 1e-9);
        assert!((dist - 1.0).abs() < 1e-9);
    }
}
