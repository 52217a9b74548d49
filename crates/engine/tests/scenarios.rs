//! End-to-end scenarios with literal inputs (S1–S6).

use nalgebra::{vector, Vector3};
use visibility_engine::synthetic::{axis_aligned_slab, holed_slab};
use visibility_engine::{are_visible, Scene, VisibilityConfig, VisibilityResult};

fn opaque_slab() -> visibility_engine::MeshDesc {
    axis_aligned_slab(1.0, 0.5)
}

fn test_holed_slab() -> visibility_engine::MeshDesc {
    holed_slab(1.0, 0.1, 0.5)
}

fn s1_sources() -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
    let a = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
    ];
    let b = vec![
        vector![0.0, 0.0, 1.0],
        vector![1.0, 0.0, 1.0],
        vector![0.0, 1.0, 1.0],
    ];
    (a, b)
}

#[test]
fn s1_empty_scene_is_visible() {
    let mut scene = Scene::new();
    scene.prepare().unwrap();
    let (a, b) = s1_sources();
    let result = are_visible(&scene, &a, &b, VisibilityConfig::default());
    assert_eq!(result, VisibilityResult::Visible);
}

#[test]
fn s2_opaque_slab_hides_the_sources() {
    let mut scene = Scene::new();
    scene.add_occluder(opaque_slab());
    scene.prepare().unwrap();
    let (a, b) = s1_sources();
    let result = are_visible(&scene, &a, &b, VisibilityConfig::default());
    assert_eq!(result, VisibilityResult::Hidden);
}

#[test]
fn s3_holed_slab_has_an_aperture() {
    let mut scene = Scene::new();
    scene.add_occluder(test_holed_slab());
    scene.prepare().unwrap();
    let (a, b) = s1_sources();
    let result = are_visible(&scene, &a, &b, VisibilityConfig::default());
    assert_eq!(result, VisibilityResult::Visible);
}

#[test]
fn s4_point_to_point_through_the_hole_is_visible() {
    let mut scene = Scene::new();
    scene.add_occluder(test_holed_slab());
    scene.prepare().unwrap();
    let a = vec![vector![0.0, 0.0, 0.0]];
    let b = vec![vector![0.0, 0.0, 1.0]];
    let result = are_visible(&scene, &a, &b, VisibilityConfig::default());
    assert_eq!(result, VisibilityResult::Visible);
}

#[test]
fn s5_segment_to_segment_with_no_occluder_is_visible() {
    let mut scene = Scene::new();
    scene.prepare().unwrap();
    let a = vec![vector![0.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]];
    let b = vec![vector![0.0, 1.0, 1.0], vector![1.0, 1.0, 1.0]];
    let result = are_visible(&scene, &a, &b, VisibilityConfig::default());
    assert_eq!(result, VisibilityResult::Visible);
}

#[test]
fn s6_overlapping_coplanar_sources_report_failure() {
    let mut scene = Scene::new();
    scene.prepare().unwrap();
    let a = vec![
        vector![0.0, 0.0, 0.0],
        vector![2.0, 0.0, 0.0],
        vector![2.0, 2.0, 0.0],
        vector![0.0, 2.0, 0.0],
    ];
    let b = vec![
        vector![1.0, 1.0, 0.0],
        vector![3.0, 1.0, 0.0],
        vector![3.0, 3.0, 0.0],
        vector![1.0, 3.0, 0.0],
    ];
    let result = are_visible(&scene, &a, &b, VisibilityConfig::default());
    assert_eq!(result, VisibilityResult::Failure);
}

#[test]
fn reciprocity_holds_across_the_holed_slab_scenario() {
    let mut scene = Scene::new();
    scene.add_occluder(test_holed_slab());
    scene.prepare().unwrap();
    let (a, b) = s1_sources();
    let forward = are_visible(&scene, &a, &b, VisibilityConfig::default());
    let backward = are_visible(&scene, &b, &a, VisibilityConfig::default());
    assert_eq!(forward, backward);
}
