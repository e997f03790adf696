//! Scene entities

use crate::foundation::math::{Quat, Vec3};
use crate::foundation::time::{JulianDate, TimeInterval};
use super::graphics::{ConicSensorGraphics, CustomPatternSensorGraphics, RectangularSensorGraphics};
use super::property::PropertySlot;

/// A named scene object that may carry sensor graphics
#[derive(Debug)]
pub struct Entity {
    name: String,
    /// Entity-level visibility
    pub show: bool,
    /// Time span the entity exists in; `None` means always
    pub availability: Option<TimeInterval>,
    /// World position of the sensor apex
    pub position: PropertySlot<Vec3>,
    /// Sensor frame orientation
    pub orientation: PropertySlot<Quat>,
    /// Conic sensor attached to this entity
    pub conic_sensor: Option<ConicSensorGraphics>,
    /// Rectangular sensor attached to this entity
    pub rectangular_sensor: Option<RectangularSensorGraphics>,
    /// Custom pattern sensor attached to this entity
    pub custom_pattern_sensor: Option<CustomPatternSensorGraphics>,
}

impl Entity {
    /// Create a shown entity with no properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            show: true,
            availability: None,
            position: None,
            orientation: None,
            conic_sensor: None,
            rectangular_sensor: None,
            custom_pattern_sensor: None,
        }
    }

    /// Unique name within the owning collection
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entity itself is shown
    pub fn is_showing(&self) -> bool {
        self.show
    }

    /// Whether the entity exists at `time`
    pub fn is_available(&self, time: JulianDate) -> bool {
        self.availability.map_or(true, |interval| interval.contains(time))
    }

    /// Builder: set the position property
    pub fn with_position(mut self, position: PropertySlot<Vec3>) -> Self {
        self.position = position;
        self
    }

    /// Builder: set the orientation property
    pub fn with_orientation(mut self, orientation: PropertySlot<Quat>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Builder: attach a conic sensor
    pub fn with_conic_sensor(mut self, graphics: ConicSensorGraphics) -> Self {
        self.conic_sensor = Some(graphics);
        self
    }

    /// Builder: attach a rectangular sensor
    pub fn with_rectangular_sensor(mut self, graphics: RectangularSensorGraphics) -> Self {
        self.rectangular_sensor = Some(graphics);
        self
    }

    /// Builder: attach a custom pattern sensor
    pub fn with_custom_pattern_sensor(mut self, graphics: CustomPatternSensorGraphics) -> Self {
        self.custom_pattern_sensor = Some(graphics);
        self
    }
}
