//! Property tests for the universal laws that must hold regardless of the
//! specific source geometry: reciprocity and orientation invariance.

use nalgebra::{vector, Vector3};
use proptest::prelude::*;
use visibility_engine::synthetic::holed_slab;
use visibility_engine::{are_visible, Scene, VisibilityConfig, VisibilityResult};

fn test_holed_slab() -> visibility_engine::MeshDesc {
    holed_slab(1.0, 0.1, 0.5)
}

fn triangle_at(z: f64, dx: f64, dy: f64) -> Vec<Vector3<f64>> {
    vec![
        vector![0.0 + dx, 0.0 + dy, z],
        vector![1.0 + dx, 0.0 + dy, z],
        vector![0.0 + dx, 1.0 + dy, z],
    ]
}

proptest! {
    /// Reciprocity (law 1): swapping which source is "A" and which is "B"
    /// never changes the reported result, with or without an occluder in
    /// the way.
    #[test]
    fn reciprocity_holds_for_offset_triangle_pairs(
        dx in -0.3f64..0.3,
        dy in -0.3f64..0.3,
        with_occluder in any::<bool>(),
    ) {
        let mut scene = Scene::new();
        if with_occluder {
            scene.add_occluder(test_holed_slab());
        }
        scene.prepare().unwrap();

        let a = triangle_at(0.0, 0.0, 0.0);
        let b = triangle_at(1.0, dx, dy);

        let forward = are_visible(&scene, &a, &b, VisibilityConfig::default());
        let backward = are_visible(&scene, &b, &a, VisibilityConfig::default());
        prop_assert_eq!(forward, backward);
    }

    /// Orientation invariance (law 8): a geometric visibility fact does not
    /// depend on which way the caller happened to wind a source polygon's
    /// vertices.
    #[test]
    fn winding_order_does_not_change_the_result(
        dx in -0.3f64..0.3,
        dy in -0.3f64..0.3,
        with_occluder in any::<bool>(),
    ) {
        let mut scene = Scene::new();
        if with_occluder {
            scene.add_occluder(test_holed_slab());
        }
        scene.prepare().unwrap();

        let a = triangle_at(0.0, 0.0, 0.0);
        let b = triangle_at(1.0, dx, dy);
        let mut b_reversed = b.clone();
        b_reversed.reverse();

        let normal = are_visible(&scene, &a, &b, VisibilityConfig::default());
        let reversed = are_visible(&scene, &a, &b_reversed, VisibilityConfig::default());

        // Both must agree on being decisive (Visible/Hidden) or both must
        // fail together; a winding flip must never turn a decisive result
        // into the opposite decisive result.
        match (normal, reversed) {
            (VisibilityResult::Visible, VisibilityResult::Hidden)
            | (VisibilityResult::Hidden, VisibilityResult::Visible) => {
                prop_assert!(false, "winding flip changed a decisive result");
            }
            _ => {}
        }
    }
}
