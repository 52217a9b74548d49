//! Convex hull of the A∪B source vertices, as a set of outward-oriented
//! supporting planes — used by the silhouette extractor's "inside the
//! shaft" test (§4.4).

use nalgebra::Vector3;

use super::plane::Plane;

/// Supporting planes of the convex hull of `points`, each oriented so every
/// point of the input set satisfies `plane.dot(p) <= eps`.
///
/// Brute-force O(n³) candidate-triangle enumeration, adequate for the small
/// vertex counts (sum of two source polygons) this is ever called with.
pub fn convex_hull_planes(points: &[Vector3<f64>], eps: f64) -> Vec<Plane> {
    let n = points.len();
    let mut planes = Vec::new();
    if n < 3 {
        return planes;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let Some(mut plane) = Plane::from_points(points[i], points[j], points[k]) else {
                    continue;
                };
                let mut max_pos = 0.0_f64;
                let mut max_neg = 0.0_f64;
                for p in points {
                    let d = plane.dot(*p);
                    if d > max_pos {
                        max_pos = d;
                    }
                    if d < max_neg {
                        max_neg = d;
                    }
                }
                let is_face = max_pos <= eps || max_neg >= -eps;
                if !is_face {
                    continue;
                }
                if max_pos > eps {
                    // every point satisfies dot <= eps on the *other* side; flip.
                    plane = Plane::new(-plane.n, -plane.c);
                }
                planes.push(plane);
            }
        }
    }
    planes
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn hull_of_two_parallel_squares_keeps_all_points_inside() {
        let points = vec![
            vector![0.0, 0.0, 0.0],
            vector![1.0, 0.0, 0.0],
            vector![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            vector![1.0, 0.0, 1.0],
            vector![0.0, 1.0, 1.0],
        ];
        let planes = convex_hull_planes(&points, 1e-9);
        assert!(!planes.is_empty());
        for plane in &planes {
            for p in &points {
                assert!(plane.dot(*p) <= 1e-6);
            }
        }
    }
}
