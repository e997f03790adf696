//! Scenario tests driving synchronizers against a headless backend

mod diffing;
mod lifecycle;

use crate::core::config::SensorEngineConfig;
use crate::foundation::math::utils::deg_to_rad;
use crate::foundation::math::{Quat, Vec3};
use crate::foundation::time::JulianDate;
use crate::render::{DrawCommand, FrameState, HeadlessBackend};
use crate::scene::{
    constant, ConicSensorGraphics, CustomPatternSensorGraphics, Entity, EntityCollection,
    RectangularSensorGraphics,
};
use crate::sensors::{BoundaryPolygon, Direction};
use super::{SensorVisualizers, SyncStats};

/// Collection, visualizers and backend wired together
struct Harness {
    collection: EntityCollection,
    visualizers: SensorVisualizers,
    backend: HeadlessBackend,
    commands: Vec<DrawCommand>,
    frame_number: u64,
}

impl Harness {
    fn new() -> Self {
        crate::foundation::logging::init_for_tests();
        Self {
            collection: EntityCollection::new(),
            visualizers: SensorVisualizers::new(&SensorEngineConfig::default()),
            backend: HeadlessBackend::new(),
            commands: Vec::new(),
            frame_number: 0,
        }
    }

    fn tick(&mut self, seconds: f64) -> SyncStats {
        self.commands.clear();
        self.frame_number += 1;
        self.visualizers.update(
            &mut self.collection,
            JulianDate(seconds),
            &FrameState::scene_3d(self.frame_number),
            &mut self.backend,
            &mut self.commands,
        )
    }

    fn teardown(&mut self) {
        self.visualizers.destroy(&mut self.backend);
    }
}

fn posed(name: &str) -> Entity {
    Entity::new(name)
        .with_position(constant(Vec3::new(7_000_000.0, 0.0, 0.0)))
        .with_orientation(constant(Quat::identity()))
}

fn conic_entity(name: &str) -> Entity {
    let mut graphics = ConicSensorGraphics::new();
    graphics.shape.outer_half_angle = constant(deg_to_rad(30.0));
    graphics.radius = constant(1000.0);
    posed(name).with_conic_sensor(graphics)
}

fn rectangular_entity(name: &str) -> Entity {
    let mut graphics = RectangularSensorGraphics::new();
    graphics.shape.x_half_angle = constant(deg_to_rad(20.0));
    graphics.shape.y_half_angle = constant(deg_to_rad(10.0));
    graphics.radius = constant(500.0);
    posed(name).with_rectangular_sensor(graphics)
}

fn custom_entity(name: &str) -> Entity {
    let cone = deg_to_rad(15.0);
    let polygon: BoundaryPolygon = (0..6)
        .map(|i| Direction::new(f64::from(i) * deg_to_rad(60.0), cone))
        .collect();
    let mut graphics = CustomPatternSensorGraphics::new();
    graphics.shape.directions = constant(polygon);
    graphics.radius = constant(250.0);
    posed(name).with_custom_pattern_sensor(graphics)
}
