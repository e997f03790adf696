//! Field-level change detection

use super::*;
use crate::foundation::time::TimeInterval;
use crate::scene::{SampledProperty, TimeIntervalCollectionProperty};
use crate::sensors::{Color, MaterialSpec};

#[test]
fn test_unchanged_snapshot_triggers_no_rebuild() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("sat")).unwrap();

    let first = harness.tick(0.0);
    assert_eq!(first.rebuilt, 1);

    let second = harness.tick(0.0);
    assert_eq!(second.rebuilt, 0);
    assert_eq!(second.created, 0);

    let third = harness.tick(5.0);
    assert_eq!(third.rebuilt, 0);

    let volume = harness.visualizers.conic().volume(id).unwrap();
    assert_eq!(volume.geometry_rebuilds(), 1);
    assert_eq!(volume.pipeline_rebuilds(), 1);
    assert_eq!(harness.backend.stats().uploads, 1);
    harness.teardown();
}

#[test]
fn test_moving_entity_updates_transform_only() {
    let mut harness = Harness::new();
    let mut entity = conic_entity("moving");
    entity.position = Some(Box::new(
        SampledProperty::new()
            .with_sample(JulianDate(0.0), Vec3::new(7_000_000.0, 0.0, 0.0))
            .with_sample(JulianDate(100.0), Vec3::new(0.0, 7_000_000.0, 0.0)),
    ));
    let id = harness.collection.add(entity).unwrap();

    harness.tick(0.0);
    let start = harness.visualizers.conic().volume(id).unwrap().world_bounding_sphere().unwrap();

    let stats = harness.tick(50.0);
    assert_eq!(stats.rebuilt, 0);
    let moved = harness.visualizers.conic().volume(id).unwrap().world_bounding_sphere().unwrap();
    assert!((moved.center - start.center).norm() > 1_000_000.0);

    // Outside the sampled range the position is undefined and the sensor hides
    let stats = harness.tick(150.0);
    assert_eq!(stats.visible, 0);
    assert!(harness.commands.is_empty());
    harness.teardown();
}

#[test]
fn test_hidden_entities_skip_property_resolution() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("sat")).unwrap();
    harness.tick(0.0);

    {
        let entity = harness.collection.get_mut(id).unwrap();
        entity.show = false;
        if let Some(graphics) = entity.conic_sensor.as_mut() {
            graphics.radius = constant(5000.0);
        }
    }
    let stats = harness.tick(1.0);
    assert_eq!(stats.visible, 0);
    assert_eq!(stats.rebuilt, 0);
    assert!(harness.commands.is_empty());
    let volume = harness.visualizers.conic().volume(id).unwrap();
    assert!(!volume.show());
    assert_eq!(volume.radius(), 1000.0);

    harness.collection.get_mut(id).unwrap().show = true;
    let stats = harness.tick(2.0);
    assert_eq!(stats.visible, 1);
    assert_eq!(stats.rebuilt, 1);
    assert_eq!(harness.visualizers.conic().volume(id).unwrap().radius(), 5000.0);
    harness.teardown();
}

#[test]
fn test_sensor_show_property_hides_volume() {
    let mut harness = Harness::new();
    let mut entity = conic_entity("blinking");
    if let Some(graphics) = entity.conic_sensor.as_mut() {
        graphics.show = Some(Box::new(
            TimeIntervalCollectionProperty::new()
                .with_interval(TimeInterval::closed(JulianDate(0.0), JulianDate(10.0)), true)
                .with_interval(TimeInterval::closed(JulianDate(10.5), JulianDate(20.0)), false),
        ));
    }
    harness.collection.add(entity).unwrap();

    assert_eq!(harness.tick(5.0).visible, 1);
    assert_eq!(harness.tick(15.0).visible, 0);
    // Undefined show resolves to the default of shown
    assert_eq!(harness.tick(30.0).visible, 1);
    harness.teardown();
}

#[test]
fn test_interval_radius_rebuilds_on_boundary_crossing() {
    let mut harness = Harness::new();
    let mut entity = conic_entity("stepping");
    if let Some(graphics) = entity.conic_sensor.as_mut() {
        graphics.radius = Some(Box::new(
            TimeIntervalCollectionProperty::new()
                .with_interval(TimeInterval::closed(JulianDate(0.0), JulianDate(10.0)), 100.0)
                .with_interval(TimeInterval::closed(JulianDate(10.5), JulianDate(20.0)), 200.0),
        ));
    }
    harness.collection.add(entity).unwrap();

    assert_eq!(harness.tick(1.0).rebuilt, 1);
    assert_eq!(harness.tick(2.0).rebuilt, 0);
    assert_eq!(harness.tick(12.0).rebuilt, 1);
    assert_eq!(harness.tick(13.0).rebuilt, 0);
    harness.teardown();
}

#[test]
fn test_invalid_runtime_shape_draws_nothing() {
    let mut harness = Harness::new();
    let mut entity = rectangular_entity("too-wide");
    if let Some(graphics) = entity.rectangular_sensor.as_mut() {
        graphics.shape.x_half_angle = constant(2.0);
    }
    let id = harness.collection.add(entity).unwrap();

    let stats = harness.tick(0.0);
    assert_eq!(stats.visible, 1);
    assert!(harness.commands.is_empty());
    assert!(harness.visualizers.rectangular().volume(id).unwrap().mesh().is_none());
    assert_eq!(harness.backend.live_geometries(), 0);
    harness.teardown();
}

#[test]
fn test_invalid_runtime_radius_keeps_previous_value() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("sat")).unwrap();
    harness.tick(0.0);

    if let Some(graphics) = harness.collection.get_mut(id).unwrap().conic_sensor.as_mut() {
        graphics.radius = constant(-50.0);
    }
    let stats = harness.tick(1.0);
    assert_eq!(stats.rebuilt, 0);
    assert_eq!(harness.visualizers.conic().volume(id).unwrap().radius(), 1000.0);
    harness.teardown();
}

#[test]
fn test_material_kind_change_rebuilds_pipeline_only() {
    let mut harness = Harness::new();
    let id = harness.collection.add(conic_entity("sat")).unwrap();
    harness.tick(0.0);
    let first_material = harness.visualizers.conic().volume(id).unwrap().material().id;

    // Same kind, new color: identity kept
    if let Some(graphics) = harness.collection.get_mut(id).unwrap().conic_sensor.as_mut() {
        graphics.material = constant(MaterialSpec::Color(Color::new(0.0, 1.0, 0.0, 0.5)));
    }
    harness.tick(1.0);
    let volume = harness.visualizers.conic().volume(id).unwrap();
    assert_eq!(volume.material().id, first_material);
    assert_eq!(volume.pipeline_rebuilds(), 1);

    if let Some(graphics) = harness.collection.get_mut(id).unwrap().conic_sensor.as_mut() {
        graphics.material = constant(MaterialSpec::Stripe {
            even: Color::WHITE,
            odd: Color::new(0.0, 0.0, 1.0, 0.5),
            repeat: 4.0,
        });
    }
    let stats = harness.tick(2.0);
    let volume = harness.visualizers.conic().volume(id).unwrap();
    assert_ne!(volume.material().id, first_material);
    assert_eq!(volume.pipeline_rebuilds(), 2);
    assert_eq!(stats.rebuilt, 0);
    harness.teardown();
}

#[test]
fn test_opaque_material_draws_single_command() {
    let mut harness = Harness::new();
    let mut entity = conic_entity("opaque");
    if let Some(graphics) = entity.conic_sensor.as_mut() {
        graphics.material = constant(MaterialSpec::Color(Color::RED));
        graphics.intersection_color = constant(Color::YELLOW);
        graphics.intersection_width = constant(3.0);
    }
    let id = harness.collection.add(entity).unwrap();
    harness.tick(0.0);

    assert_eq!(harness.commands.len(), 1);
    let command = &harness.commands[0];
    assert_eq!(command.owner, Some(id));
    assert_eq!(command.intersection_color, Color::YELLOW);
    assert_eq!(command.intersection_width, 3.0);
    assert!(command.render_state.depth_write);
    harness.teardown();
}
