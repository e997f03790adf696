//! Tracking, lazy creation and teardown

use super::*;
use crate::scene::constant;
use crate::sync::BoundingSphereState;

#[test]
fn test_added_then_removed_never_creates_a_primitive() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("transient")).unwrap();
    harness.collection.remove(id);

    let stats = harness.tick(0.0);
    assert_eq!(stats.tracked, 0);
    assert_eq!(harness.backend.stats().added, 0);
}

#[test]
fn test_hidden_entity_is_tracked_without_a_primitive() {
    let mut harness = Harness::new();
    let mut entity = conic_entity("hidden");
    entity.show = false;
    let id = harness.collection.add(entity).unwrap();

    let stats = harness.tick(0.0);
    assert_eq!(stats.tracked, 1);
    assert!(harness.visualizers.conic().is_tracked(id));
    assert_eq!(harness.backend.stats().added, 0);

    harness.collection.remove(id);
    harness.tick(1.0);
    assert_eq!(harness.backend.stats().added, 0);
    assert_eq!(harness.visualizers.conic().tracked_count(), 0);
}

#[test]
fn test_incomplete_entities_are_not_tracked() {
    let mut harness = Harness::new();
    let mut entity = conic_entity("no-orientation");
    entity.orientation = None;
    let without_orientation = harness.collection.add(entity).unwrap();
    let without_sensor = harness.collection.add(posed("plain")).unwrap();

    let stats = harness.tick(0.0);
    assert_eq!(stats.tracked, 0);
    assert!(!harness.visualizers.conic().is_tracked(without_orientation));
    assert!(!harness.visualizers.conic().is_tracked(without_sensor));
}

#[test]
fn test_losing_a_required_property_destroys_the_primitive() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("sat")).unwrap();
    let stats = harness.tick(0.0);
    assert_eq!(stats.created, 1);
    assert_eq!(harness.backend.live_primitives(), 1);

    harness.collection.get_mut(id).unwrap().position = None;
    let stats = harness.tick(1.0);
    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.tracked, 0);
    assert_eq!(harness.backend.live_primitives(), 0);
    assert_eq!(harness.backend.live_geometries(), 0);
}

#[test]
fn test_each_kind_is_synchronized_independently() {
    let mut harness = Harness::new();
    let conic = harness.collection.add(conic_entity("conic")).unwrap();
    let rectangular = harness.collection.add(rectangular_entity("rectangular")).unwrap();
    let custom = harness.collection.add(custom_entity("custom")).unwrap();

    let stats = harness.tick(0.0);
    assert_eq!(stats.tracked, 3);
    assert_eq!(stats.visible, 3);
    assert_eq!(stats.created, 3);

    assert!(harness.visualizers.conic().is_tracked(conic));
    assert!(harness.visualizers.rectangular().is_tracked(rectangular));
    assert!(harness.visualizers.custom_pattern().is_tracked(custom));
    assert!(!harness.visualizers.conic().is_tracked(rectangular));

    let rectangular_volume = harness.visualizers.rectangular().volume(rectangular).unwrap();
    assert_eq!(rectangular_volume.boundary().len(), 4);
    assert_eq!(rectangular_volume.owner(), Some(rectangular));

    // Default material is translucent: two color commands per volume
    assert_eq!(harness.commands.len(), 6);
    harness.teardown();
}

#[test]
fn test_teardown_releases_every_resource_exactly_once() {
    let mut harness = Harness::new();
    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(harness.collection.add(conic_entity(&format!("conic-{i}"))).unwrap());
        harness.collection.add(rectangular_entity(&format!("rect-{i}"))).unwrap();
        harness.collection.add(custom_entity(&format!("custom-{i}"))).unwrap();
    }
    harness.tick(0.0);

    // Force a rebuild so some buffers are replaced before teardown
    for &id in &ids {
        let entity = harness.collection.get_mut(id).unwrap();
        if let Some(graphics) = entity.conic_sensor.as_mut() {
            graphics.radius = constant(2000.0);
        }
    }
    let stats = harness.tick(1.0);
    assert_eq!(stats.rebuilt, ids.len());

    harness.collection.remove(ids[0]);
    harness.tick(2.0);
    harness.teardown();

    let backend_stats = harness.backend.stats();
    assert_eq!(backend_stats.uploads, backend_stats.releases);
    assert_eq!(backend_stats.added, backend_stats.removed);
    assert_eq!(backend_stats.invalid_releases, 0);
    assert_eq!(harness.backend.live_primitives(), 0);
    assert_eq!(harness.backend.live_geometries(), 0);
    assert_eq!(harness.visualizers.live_volumes(), 0);
}

#[test]
fn test_bounding_sphere_states() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("sat")).unwrap();
    let stranger = harness.collection.add(posed("stranger")).unwrap();

    assert_eq!(harness.visualizers.bounding_sphere(id), BoundingSphereState::Failed);

    harness.tick(0.0);
    match harness.visualizers.bounding_sphere(id) {
        BoundingSphereState::Done(sphere) => {
            assert!(sphere.contains_point(&Vec3::new(7_000_000.0, 0.0, 0.0), 1e-6));
        }
        other => panic!("expected known bounds, got {other:?}"),
    }
    assert_eq!(harness.visualizers.bounding_sphere(stranger), BoundingSphereState::Failed);

    harness.collection.get_mut(id).unwrap().show = false;
    harness.tick(1.0);
    assert_eq!(harness.visualizers.bounding_sphere(id), BoundingSphereState::Pending);
    harness.teardown();
}
