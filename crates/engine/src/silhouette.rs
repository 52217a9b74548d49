//! Silhouette extraction (C5): flood-fills occluder faces lying in the
//! shaft between sources A and B, recording boundary edges as candidates
//! for splitting the stabbing polytope.

use nalgebra::Vector3;

use crate::geometry::{convex_hull_planes, Plane};
use crate::mesh::{Scene, TriangleMesh};
use crate::polygon::ConvexPolygon;
use crate::tolerance::ToleranceConfig;

/// One candidate splitting edge of a silhouette, lifted into the polyhedron
/// lazily by the solver (C11) on first use.
#[derive(Clone, Debug)]
pub struct SilhouetteEdge {
    pub face: u32,
    pub edge_in_face: u8,
    /// Index into the shared polyhedron, once lifted. `None` = "not yet
    /// lifted" (the original's hyperplane-index-0 sentinel).
    pub hyperplane: Option<usize>,
    pub active: bool,
}

/// A connected, flood-filled region of one occluder mesh.
#[derive(Clone, Debug)]
pub struct Silhouette {
    pub mesh_id: usize,
    pub faces: Vec<u32>,
    pub edges: Vec<SilhouetteEdge>,
    active_count: usize,
    processed_stack: Vec<usize>,
}

impl Silhouette {
    fn new(mesh_id: usize) -> Self {
        Self {
            mesh_id,
            faces: Vec::new(),
            edges: Vec::new(),
            active_count: 0,
            processed_stack: Vec::new(),
        }
    }

    fn push_edge(&mut self, face: u32, edge_in_face: u8) {
        self.edges.push(SilhouetteEdge {
            face,
            edge_in_face,
            hyperplane: None,
            active: true,
        });
        self.active_count += 1;
    }

    pub fn available_edge_count(&self) -> usize {
        self.active_count
    }

    /// `true` once every edge has been pushed onto the processed stack at
    /// least once — the silhouette fully occludes the current polytope.
    pub fn is_exhausted(&self) -> bool {
        self.active_count == 0 && !self.processed_stack.is_empty()
    }

    pub fn first_active_edge(&self) -> Option<usize> {
        self.edges.iter().position(|e| e.active)
    }

    pub fn mark_inactive(&mut self, idx: usize) {
        if self.edges[idx].active {
            self.edges[idx].active = false;
            self.active_count -= 1;
        }
    }

    pub fn mark_active(&mut self, idx: usize) {
        if !self.edges[idx].active {
            self.edges[idx].active = true;
            self.active_count += 1;
        }
    }

    pub fn push_processed(&mut self, idx: usize) {
        self.processed_stack.push(idx);
    }

    pub fn pop_processed(&mut self) -> Option<usize> {
        self.processed_stack.pop()
    }

    pub fn processed_edges(&self) -> &[usize] {
        &self.processed_stack
    }
}

struct SourcePlanes {
    /// `plane[i]` oriented so the *other* source lies on its positive side.
    a: Plane,
    b: Plane,
}

fn oriented_source_planes(a: &ConvexPolygon, b: &ConvexPolygon) -> SourcePlanes {
    let b_centroid = centroid(&b.vertices);
    let a_centroid = centroid(&a.vertices);
    let mut pa = a.plane;
    if pa.dot(b_centroid) < 0.0 {
        pa = Plane::new(-pa.n, -pa.c);
    }
    let mut pb = b.plane;
    if pb.dot(a_centroid) < 0.0 {
        pb = Plane::new(-pb.n, -pb.c);
    }
    SourcePlanes { a: pa, b: pb }
}

fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    let sum: Vector3<f64> = points.iter().fold(Vector3::zeros(), |acc, p| acc + p);
    sum / (points.len().max(1) as f64)
}

/// `true` if some vertex of `tri` lies strictly on the positive side of `plane`.
fn has_vertex_on_front_side(plane: &Plane, tri: &[Vector3<f64>; 3]) -> bool {
    tri.iter().any(|v| plane.dot(*v) > 0.0)
}

/// `true` if the source polygon's plane is crossed by `plane` (i.e. the
/// source has vertices on both sides, within `eps`).
fn plane_intersects_polygon(plane: &Plane, verts: &[Vector3<f64>], eps: f64) -> bool {
    let mut saw_pos = false;
    let mut saw_neg = false;
    for v in verts {
        let d = plane.dot(*v);
        if d > eps {
            saw_pos = true;
        } else if d < -eps {
            saw_neg = true;
        }
        if saw_pos && saw_neg {
            return true;
        }
    }
    false
}

fn face_plane(tri: &[Vector3<f64>; 3]) -> Option<Plane> {
    Plane::from_points(tri[0], tri[1], tri[2])
}

fn is_edge_potentially_inside_shaft(
    shaft_planes: &[Plane],
    a: Vector3<f64>,
    b: Vector3<f64>,
) -> bool {
    let center = (a + b) * 0.5;
    let radius = (b - a).norm() * 0.5;
    shaft_planes.iter().all(|p| p.dot(center) > -radius)
}

struct SilhouetteBuilder<'a> {
    mesh: &'a TriangleMesh,
    sources: &'a SourcePlanes,
    a_verts: &'a [Vector3<f64>],
    b_verts: &'a [Vector3<f64>],
    hull_planes: Vec<Plane>,
    tol: f64,
    between_cache: Vec<Option<bool>>,
}

impl<'a> SilhouetteBuilder<'a> {
    fn is_between_source_planes(&mut self, face: usize) -> bool {
        if let Some(cached) = self.between_cache[face] {
            return cached;
        }
        let tri = self.mesh.face_vertices(face);
        let inside = has_vertex_on_front_side(&self.sources.a, &tri)
            && has_vertex_on_front_side(&self.sources.b, &tri);
        self.between_cache[face] = Some(inside);
        inside
    }

    fn is_potential_silhouette_edge(&mut self, face0: usize, face1: usize) -> bool {
        if !self.is_between_source_planes(face0) || !self.is_between_source_planes(face1) {
            return false;
        }
        let tri0 = self.mesh.face_vertices(face0);
        let tri1 = self.mesh.face_vertices(face1);
        let (Some(plane0), Some(plane1)) = (face_plane(&tri0), face_plane(&tri1)) else {
            return false;
        };

        for verts in [self.a_verts, self.b_verts] {
            if plane_intersects_polygon(&plane0, verts, self.tol)
                || plane_intersects_polygon(&plane1, verts, self.tol)
            {
                continue;
            }
            let probe = verts[0];
            let d0 = plane0.dot(probe);
            let d1 = plane1.dot(probe);
            if d0.signum() == d1.signum() {
                return false;
            }
        }

        if plane0.c.signum() != plane1.c.signum() {
            return true;
        }

        tri0.iter().any(|v| plane1.dot(*v).abs() >= self.tol)
    }

    fn extract(&mut self, mesh_id: usize, optimisation: bool) -> Vec<Silhouette> {
        let face_count = self.mesh.face_count();
        let mut processed = vec![false; face_count];
        let mut silhouettes = Vec::new();

        for start in 0..face_count {
            if processed[start] {
                continue;
            }
            let mut stack = vec![start];
            let mut silhouette = Silhouette::new(mesh_id);

            while let Some(face) = stack.pop() {
                if processed[face] {
                    continue;
                }
                processed[face] = true;

                let mut face_is_inside_hull = false;
                for edge in 0..3 {
                    let (ev0, ev1) = self.mesh.edge_vertices(face, edge);
                    if !is_edge_potentially_inside_shaft(&self.hull_planes, ev0, ev1) {
                        continue;
                    }
                    face_is_inside_hull = true;
                    let neighbour = self.mesh.adjacency[face][edge];
                    let is_boundary = neighbour < 0;
                    let neighbour_breaks_silhouette = !optimisation
                        || is_boundary
                        || !self.is_potential_silhouette_edge(face, neighbour as usize);
                    if neighbour_breaks_silhouette {
                        silhouette.push_edge(face as u32, edge as u8);
                    } else if !processed[neighbour as usize] {
                        stack.push(neighbour as usize);
                    }
                }
                if face_is_inside_hull {
                    silhouette.faces.push(face as u32);
                }
            }
            silhouettes.push(silhouette);
        }
        silhouettes
    }
}

/// Extract silhouettes of every occluder mesh in `scene` with respect to
/// sources `a`, `b`. Runs once per occluder per query (§2).
pub fn extract_silhouettes(
    scene: &Scene,
    a: &ConvexPolygon,
    b: &ConvexPolygon,
    tol: &ToleranceConfig,
    optimisation: bool,
) -> Vec<Silhouette> {
    let sources = oriented_source_planes(a, b);
    let mut all_points: Vec<Vector3<f64>> = a.vertices.clone();
    all_points.extend(b.vertices.iter().copied());
    let hull_planes = convex_hull_planes(&all_points, tol.eps_plane);

    let mut result = Vec::new();
    for (mesh_id, mesh) in scene.meshes().iter().enumerate() {
        let mut builder = SilhouetteBuilder {
            mesh,
            sources: &sources,
            a_verts: &a.vertices,
            b_verts: &b.vertices,
            hull_planes: hull_planes.clone(),
            tol: tol.eps_plane,
            between_cache: vec![None; mesh.face_count()],
        };
        result.extend(builder.extract(mesh_id, optimisation));
    }
    result
}
