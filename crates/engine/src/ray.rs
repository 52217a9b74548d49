//! Ray backend protocol (C6): a pure intersection oracle the solver casts
//! representative/extremal stabbing lines through.

use std::collections::HashSet;

use crate::geometry::{ray_triangle_hits, Ray};
use crate::mesh::Scene;
use crate::silhouette::Silhouette;

/// One triangle hit: which mesh, which face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RayHit {
    pub geometry_id: usize,
    pub face_id: u32,
}

#[derive(Clone, Debug, Default)]
pub struct RayHits {
    pub hits: Vec<RayHit>,
}

impl RayHits {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// A pure intersection oracle. The brute-force implementation below is the
/// only one in scope; an accelerated (BVH/third-party) backend is an
/// external collaborator that implements the same trait (§4.5).
pub trait RayBackend {
    fn intersect(&self, ray: &Ray) -> RayHits;
}

/// Iterates every face of every silhouette and tests it directly — O(faces)
/// per ray, correct but not accelerated. Triangles are tested double-sided.
pub struct BruteForceRayBackend<'a> {
    scene: &'a Scene,
    silhouettes: &'a [Silhouette],
}

impl<'a> BruteForceRayBackend<'a> {
    pub fn new(scene: &'a Scene, silhouettes: &'a [Silhouette]) -> Self {
        Self { scene, silhouettes }
    }
}

impl<'a> RayBackend for BruteForceRayBackend<'a> {
    fn intersect(&self, ray: &Ray) -> RayHits {
        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for silhouette in self.silhouettes {
            let mesh = self.scene.mesh(silhouette.mesh_id);
            for &face in &silhouette.faces {
                let key = RayHit {
                    geometry_id: silhouette.mesh_id,
                    face_id: face,
                };
                if seen.contains(&key) {
                    continue;
                }
                let [v0, v1, v2] = mesh.face_vertices(face as usize);
                if ray_triangle_hits(ray, v0, v1, v2).is_some() {
                    seen.insert(key);
                    hits.push(key);
                }
            }
        }
        RayHits { hits }
    }
}
