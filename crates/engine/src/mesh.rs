//! Indexed triangle meshes and the occluder set (C4).

use nalgebra::Vector3;
use std::collections::HashMap;

use crate::error::{EngineError, Result};

/// Borrowed/owned description of a mesh handed to [`Scene::add_occluder`].
#[derive(Clone, Debug)]
pub struct MeshDesc {
    pub vertices: Vec<Vector3<f64>>,
    pub indices: Vec<[u32; 3]>,
    pub normals: Option<Vec<Vector3<f64>>>,
}

/// A triangle mesh plus its lazily-computed face adjacency and AABB.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    pub vertices: Vec<Vector3<f64>>,
    pub indices: Vec<[u32; 3]>,
    pub normals: Option<Vec<Vector3<f64>>>,
    /// `adjacency[face][edge]` is the neighbour face sharing that edge, or -1.
    pub adjacency: Vec<[i32; 3]>,
    pub aabb_lo: Vector3<f64>,
    pub aabb_hi: Vector3<f64>,
}

impl TriangleMesh {
    pub fn face_count(&self) -> usize {
        self.indices.len()
    }

    pub fn face_vertices(&self, face: usize) -> [Vector3<f64>; 3] {
        let idx = self.indices[face];
        [
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        ]
    }

    /// Edge `e` of `face`, as a pair of vertex indices (v_e, v_{e+1 mod 3}).
    pub fn edge_vertices(&self, face: usize, edge: usize) -> (Vector3<f64>, Vector3<f64>) {
        let idx = self.indices[face];
        let a = idx[edge % 3] as usize;
        let b = idx[(edge + 1) % 3] as usize;
        (self.vertices[a], self.vertices[b])
    }
}

fn build_adjacency(vertices: &[Vector3<f64>], indices: &[[u32; 3]]) -> Vec<[i32; 3]> {
    let mut edge_to_face: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
    let mut adjacency = vec![[-1i32; 3]; indices.len()];
    let _ = vertices;

    for (face, tri) in indices.iter().enumerate() {
        for e in 0..3 {
            let a = tri[e];
            let b = tri[(e + 1) % 3];
            let key = (a.min(b), a.max(b));
            if let Some(&(other_face, other_edge)) = edge_to_face.get(&key) {
                adjacency[face][e] = other_face as i32;
                adjacency[other_face][other_edge] = face as i32;
            } else {
                edge_to_face.insert(key, (face, e));
            }
        }
    }
    adjacency
}

fn compute_aabb(vertices: &[Vector3<f64>]) -> (Vector3<f64>, Vector3<f64>) {
    let mut lo = Vector3::from_element(f64::INFINITY);
    let mut hi = Vector3::from_element(f64::NEG_INFINITY);
    for v in vertices {
        lo = lo.zip_map(v, f64::min);
        hi = hi.zip_map(v, f64::max);
    }
    (lo, hi)
}

/// A read-only occluder set: indexed meshes plus their precomputed adjacency.
///
/// `Sync` by construction — all per-mesh bookkeeping is computed once in
/// [`Scene::prepare`], not lazily behind interior mutability, so a `Scene`
/// can be shared across concurrently-running queries (§5).
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pending: Vec<MeshDesc>,
    meshes: Vec<TriangleMesh>,
    prepared: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an occluder mesh. Takes effect once [`prepare`](Self::prepare) runs.
    pub fn add_occluder(&mut self, desc: MeshDesc) -> usize {
        self.prepared = false;
        let id = self.meshes.len() + self.pending.len();
        self.pending.push(desc);
        id
    }

    /// Compute face adjacency and AABBs for every occluder added so far.
    pub fn prepare(&mut self) -> Result<()> {
        for desc in self.pending.drain(..) {
            for v in &desc.vertices {
                if !v.iter().all(|c| c.is_finite()) {
                    return Err(EngineError::NonFiniteVertex(format!("{v:?}")));
                }
            }
            let adjacency = build_adjacency(&desc.vertices, &desc.indices);
            let (aabb_lo, aabb_hi) = compute_aabb(&desc.vertices);
            self.meshes.push(TriangleMesh {
                vertices: desc.vertices,
                indices: desc.indices,
                normals: desc.normals,
                adjacency,
                aabb_lo,
                aabb_hi,
            });
        }
        self.prepared = true;
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn mesh(&self, id: usize) -> &TriangleMesh {
        &self.meshes[id]
    }

    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn unit_square() -> MeshDesc {
        MeshDesc {
            vertices: vec![
                vector![-1.0, -1.0, 0.0],
                vector![1.0, -1.0, 0.0],
                vector![1.0, 1.0, 0.0],
                vector![-1.0, 1.0, 0.0],
            ],
            indices: vec![[0, 1, 2], [0, 2, 3]],
            normals: None,
        }
    }

    #[test]
    fn adjacent_triangles_share_the_diagonal_edge() {
        let mut scene = Scene::new();
        scene.add_occluder(unit_square());
        scene.prepare().unwrap();
        let mesh = scene.mesh(0);
        // Face 0 edge 1 is (v1,v2); face 1 edge 2 is (v3,v0). The shared
        // diagonal is (v0,v2): face0 edge2=(v2,v0), face1 edge0=(v0,v2).
        assert_eq!(mesh.adjacency[0][2], 1);
        assert_eq!(mesh.adjacency[1][0], 0);
    }

    #[test]
    fn aabb_covers_all_vertices() {
        let mut scene = Scene::new();
        scene.add_occluder(unit_square());
        scene.prepare().unwrap();
        let mesh = scene.mesh(0);
        assert_eq!(mesh.aabb_lo, vector![-1.0, -1.0, 0.0]);
        assert_eq!(mesh.aabb_hi, vector![1.0, 1.0, 0.0]);
    }

    #[test]
    fn rejects_non_finite_vertex() {
        let mut scene = Scene::new();
        let mut desc = unit_square();
        desc.vertices[0].x = f64::NAN;
        scene.add_occluder(desc);
        assert!(scene.prepare().is_err());
    }
}
