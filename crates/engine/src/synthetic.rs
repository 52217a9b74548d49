//! Procedural occluder and source generation, shared by the demo CLI and
//! the test suites.
//!
//! Mirrors `generateRegularGrid`/`generateSlot`/`generateRegularPolygon` from
//! a synthetic mesh builder used to drive visibility test suites: every
//! shape here is reproducible from a `(seed, index)` replay token rather
//! than from global RNG state.

use nalgebra::{vector, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mesh::MeshDesc;

/// Replay token making a synthetic scene reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn rng(self) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ self.index.wrapping_mul(0x9E3779B97F4A7C15))
    }
}

/// An axis-aligned unit square in the `z = height` plane, `[-half, half]^2`,
/// triangulated as two triangles.
pub fn axis_aligned_slab(half: f64, height: f64) -> MeshDesc {
    let vertices = vec![
        vector![-half, -half, height],
        vector![half, -half, height],
        vector![half, half, height],
        vector![-half, half, height],
    ];
    MeshDesc {
        vertices,
        indices: vec![[0, 1, 2], [0, 2, 3]],
        normals: None,
    }
}

/// The same slab with a centred square hole of half-width `hole_half`,
/// triangulated as an octagonal ring of 8 triangles.
pub fn holed_slab(half: f64, hole_half: f64, height: f64) -> MeshDesc {
    let outer = [
        vector![-half, -half, height],
        vector![half, -half, height],
        vector![half, half, height],
        vector![-half, half, height],
    ];
    let inner = [
        vector![-hole_half, -hole_half, height],
        vector![hole_half, -hole_half, height],
        vector![hole_half, hole_half, height],
        vector![-hole_half, hole_half, height],
    ];
    let mut vertices = Vec::with_capacity(8);
    vertices.extend_from_slice(&outer);
    vertices.extend_from_slice(&inner);

    let mut indices = Vec::with_capacity(8);
    for i in 0..4 {
        let o0 = i as u32;
        let o1 = ((i + 1) % 4) as u32;
        let n0 = 4 + i as u32;
        let n1 = 4 + ((i + 1) % 4) as u32;
        indices.push([o0, o1, n1]);
        indices.push([o0, n1, n0]);
    }

    MeshDesc {
        vertices,
        indices,
        normals: None,
    }
}

/// Vertices of a regular `n`-gon source of circumradius `radius`, centred
/// at `center`, lying in the `z = center.z` plane.
pub fn regular_ngon_source(center: Vector3<f64>, radius: f64, n: usize) -> Vec<Vector3<f64>> {
    let n = n.max(3);
    (0..n)
        .map(|i| {
            let theta = (i as f64) * std::f64::consts::TAU / (n as f64);
            center + vector![radius * theta.cos(), radius * theta.sin(), 0.0]
        })
        .collect()
}

/// A regular grid of unit squares in the `z = height` plane, `subdivision`
/// cells per side, randomly perturbed in-plane by up to `jitter` using the
/// replay token — mirrors `generateRegularGrid` + `addRandomness`.
pub fn jittered_grid(subdivision: usize, height: f64, jitter: f64, token: ReplayToken) -> MeshDesc {
    let subdivision = subdivision.max(1);
    let mut rng = token.rng();
    let n = subdivision + 1;
    let mut vertices = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let x = (i as f64) / (subdivision as f64) - 0.5;
            let y = (j as f64) / (subdivision as f64) - 0.5;
            let dx = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
            let dy = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
            vertices.push(vector![x + dx, y + dy, height]);
        }
    }
    let mut indices = Vec::with_capacity(subdivision * subdivision * 2);
    for j in 0..subdivision {
        for i in 0..subdivision {
            let v00 = (j * n + i) as u32;
            let v10 = (j * n + i + 1) as u32;
            let v01 = ((j + 1) * n + i) as u32;
            let v11 = ((j + 1) * n + i + 1) as u32;
            indices.push([v00, v10, v11]);
            indices.push([v00, v11, v01]);
        }
    }
    MeshDesc {
        vertices,
        indices,
        normals: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holed_slab_has_eight_triangles_and_eight_vertices() {
        let mesh = holed_slab(1.0, 0.1, 0.5);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 8);
    }

    #[test]
    fn jittered_grid_is_reproducible_from_the_same_token() {
        let token = ReplayToken { seed: 7, index: 1 };
        let a = jittered_grid(4, 0.0, 0.05, token);
        let b = jittered_grid(4, 0.0, 0.05, token);
        assert_eq!(a.vertices, b.vertices);
    }

    #[test]
    fn regular_ngon_has_requested_vertex_count() {
        let verts = regular_ngon_source(Vector3::zeros(), 1.0, 6);
        assert_eq!(verts.len(), 6);
    }
}
