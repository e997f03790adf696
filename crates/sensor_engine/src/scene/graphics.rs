//! Sensor graphics bundles attached to entities
//!
//! The parameters shared by every sensor kind live in [`SensorGraphics`];
//! the kind-specific angular parameters live in its `shape`.

use crate::sensors::{BoundaryPolygon, Color, MaterialSpec};
use super::property::PropertySlot;

/// Time-varying description of one sensor volume
#[derive(Debug, Default)]
pub struct SensorGraphics<S> {
    /// Whether the sensor is drawn
    pub show: PropertySlot<bool>,
    /// Reach of the volume in meters; undefined means infinite
    pub radius: PropertySlot<f64>,
    /// Whether ellipsoid and radius outlines are drawn
    pub show_intersection: PropertySlot<bool>,
    /// Outline color
    pub intersection_color: PropertySlot<Color>,
    /// Outline width in pixels
    pub intersection_width: PropertySlot<f64>,
    /// Whether parts behind the ellipsoid stay visible
    pub show_through_ellipsoid: PropertySlot<bool>,
    /// Surface material
    pub material: PropertySlot<MaterialSpec>,
    /// Kind-specific angular parameters
    pub shape: S,
}

impl<S: Default> SensorGraphics<S> {
    /// Create graphics with every property undefined
    pub fn new() -> Self {
        Self::default()
    }
}

/// Angular parameters of a cone, wedge or annular wedge
#[derive(Debug, Default)]
pub struct ConicShape {
    /// Half-angle of the inner hole, radians
    pub inner_half_angle: PropertySlot<f64>,
    /// Half-angle of the outer edge, radians
    pub outer_half_angle: PropertySlot<f64>,
    /// Clock angle the wedge starts at, radians
    pub minimum_clock_angle: PropertySlot<f64>,
    /// Clock angle the wedge ends at, radians
    pub maximum_clock_angle: PropertySlot<f64>,
}

/// Angular parameters of a rectangular pyramid
#[derive(Debug, Default)]
pub struct RectangularShape {
    /// Half-angle about the sensor's y axis, radians
    pub x_half_angle: PropertySlot<f64>,
    /// Half-angle about the sensor's x axis, radians
    pub y_half_angle: PropertySlot<f64>,
}

/// An arbitrary boundary given as a direction list
#[derive(Debug, Default)]
pub struct CustomPatternShape {
    /// Ordered boundary directions
    pub directions: PropertySlot<BoundaryPolygon>,
}

/// Graphics of a conic sensor
pub type ConicSensorGraphics = SensorGraphics<ConicShape>;
/// Graphics of a rectangular sensor
pub type RectangularSensorGraphics = SensorGraphics<RectangularShape>;
/// Graphics of a custom pattern sensor
pub type CustomPatternSensorGraphics = SensorGraphics<CustomPatternShape>;
