//! Polyhedron store (C7): an append-only arena of Plücker points, each
//! carrying a combinatorial facet set and a cached quadric position.

use crate::plucker::PluckerPoint;
use crate::tolerance::{sign, Sign, ToleranceConfig};

/// Facet sets are the combinatorial identity of a vertex: two vertices
/// sharing a facet set are the same vertex. Always kept sorted+deduped.
pub type FacetSet = Vec<u32>;

#[derive(Clone, Debug)]
pub struct PolyhedronEntry {
    pub point: PluckerPoint,
    pub quadric_position: Sign,
    pub normalised: bool,
    pub facet_set: FacetSet,
}

impl PolyhedronEntry {
    pub fn facet_set(&self) -> &[u32] {
        &self.facet_set
    }

    pub fn quadric_position(&self) -> Sign {
        self.quadric_position
    }
}

/// Append-only arena. Indices handed out never move or get invalidated.
#[derive(Clone, Debug, Default)]
pub struct Polyhedron {
    entries: Vec<PolyhedronEntry>,
}

impl Polyhedron {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> &PolyhedronEntry {
        &self.entries[idx]
    }

    pub fn point(&self, idx: usize) -> PluckerPoint {
        self.entries[idx].point
    }

    pub fn facet_set(&self, idx: usize) -> &[u32] {
        &self.entries[idx].facet_set
    }

    /// Append a Plücker point with an already-sorted facet set, computing
    /// its quadric position under `tol`. Returns the new index.
    pub fn push(
        &mut self,
        mut point: PluckerPoint,
        mut facet_set: FacetSet,
        normalise: bool,
        tol: &ToleranceConfig,
    ) -> usize {
        facet_set.sort_unstable();
        facet_set.dedup();
        if normalise {
            point = point.normalized();
        }
        let quadric_position = point.quadric_sign(tol.eps_quadric);
        self.entries.push(PolyhedronEntry {
            point,
            quadric_position,
            normalised: normalise,
            facet_set,
        });
        self.entries.len() - 1
    }

    /// Add `h` to the facet set of `idx`, re-sorting only if it breaks
    /// monotonicity (mirrors `insert_halfspace`'s "append, re-sort iff
    /// needed" idiom).
    pub fn attach_facet(&mut self, idx: usize, h: u32) {
        let set = &mut self.entries[idx].facet_set;
        if set.binary_search(&h).is_ok() {
            return;
        }
        set.push(h);
        if set.len() < 2 || set[set.len() - 2] > h {
            set.sort_unstable();
        }
    }

    /// Number of facets shared between two facet sets via a sorted merge scan.
    pub fn shared_facet_count(a: &[u32], b: &[u32]) -> usize {
        let (mut i, mut j) = (0, 0);
        let mut shared = 0;
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    pub fn facets_shared_at_least(a: &[u32], b: &[u32], k: usize) -> bool {
        Self::shared_facet_count(a, b) >= k
    }

    /// Search entries appended at or after `since` for one whose facet set
    /// equals `facet_set` exactly (splitter-time vertex deduplication).
    pub fn find_facet_set_since(&self, since: usize, facet_set: &[u32]) -> Option<usize> {
        (since..self.entries.len()).find(|&i| self.entries[i].facet_set == facet_set)
    }

    pub fn classify(&self, idx: usize, h_idx: usize, eps: f64) -> Sign {
        let h = self.entries[h_idx].point;
        sign(h.dot(&self.entries[idx].point), eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn attach_facet_keeps_set_sorted() {
        let mut ph = Polyhedron::new();
        let tol = ToleranceConfig::default();
        let p = PluckerPoint::new(vector![1.0, 0.0, 0.0], vector![0.0, 0.0, 0.0]);
        let idx = ph.push(p, vec![1, 3, 5], false, &tol);
        ph.attach_facet(idx, 2);
        let set = ph.facet_set(idx);
        let mut sorted = set.to_vec();
        sorted.sort_unstable();
        assert_eq!(set, sorted.as_slice());
    }

    #[test]
    fn shared_facet_count_counts_intersection() {
        assert_eq!(Polyhedron::shared_facet_count(&[1, 2, 3, 4], &[2, 4, 6]), 2);
        assert!(Polyhedron::facets_shared_at_least(&[1, 2, 3], &[1, 2, 3], 3));
        assert!(!Polyhedron::facets_shared_at_least(&[1, 2, 3], &[4, 5, 6], 1));
    }

    #[test]
    fn dedup_lookup_finds_matching_facet_set() {
        let mut ph = Polyhedron::new();
        let tol = ToleranceConfig::default();
        let p = PluckerPoint::new(vector![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0]);
        ph.push(p, vec![1, 2, 3], false, &tol);
        let since = ph.len();
        let q = PluckerPoint::new(vector![0.0, 1.0, 0.0], vector![1.0, 0.0, 0.0]);
        ph.push(q, vec![4, 5, 6], false, &tol);
        assert_eq!(ph.find_facet_set_since(since, &[4, 5, 6]), Some(since));
        assert_eq!(ph.find_facet_set_since(since, &[1, 2, 3]), None);
    }
}
