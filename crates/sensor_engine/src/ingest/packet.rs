//! Declarative sensor packets
//!
//! Wire shapes for JSON scene documents. Every value field accepts either a
//! bare constant or a list of interval-qualified values:
//!
//! ```json
//! { "radius": 1000.0 }
//! { "radius": [ { "interval": "0/60", "value": 1000.0 },
//!               { "interval": "60/120", "value": 2000.0 } ] }
//! ```
//!
//! Angles are radians, distances meters, times seconds on the scene clock.

use serde::{Serialize, Deserialize};

use crate::sensors::{Color, DirectionEncoding, MaterialSpec};

/// One value valid over one interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalValue<T> {
    /// `"start/stop"` in scene seconds
    pub interval: String,
    /// Value over the interval
    pub value: T,
}

/// A constant or a list of interval-qualified values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PacketValue<T> {
    /// Piecewise values
    Intervals(Vec<IntervalValue<T>>),
    /// One value for all time
    Constant(T),
}

/// Properties shared by every sensor kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonSensorPacket {
    /// Sensor visibility
    pub show: Option<PacketValue<bool>>,
    /// Reach in meters; must not be negative
    pub radius: Option<PacketValue<f64>>,
    /// Outline visibility
    pub show_intersection: Option<PacketValue<bool>>,
    /// Outline color
    pub intersection_color: Option<PacketValue<Color>>,
    /// Outline width in pixels
    pub intersection_width: Option<PacketValue<f64>>,
    /// Draw through the ellipsoid
    pub show_through_ellipsoid: Option<PacketValue<bool>>,
    /// Lateral surface material
    pub lateral_surface_material: Option<PacketValue<MaterialSpec>>,
}

/// Conic sensor properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConicSensorPacket {
    /// Shared properties
    #[serde(flatten)]
    pub common: CommonSensorPacket,
    /// Inner half-angle in `[0, π]`
    pub inner_half_angle: Option<PacketValue<f64>>,
    /// Outer half-angle in `[0, π]`
    pub outer_half_angle: Option<PacketValue<f64>>,
    /// Minimum clock angle
    pub minimum_clock_angle: Option<PacketValue<f64>>,
    /// Maximum clock angle
    pub maximum_clock_angle: Option<PacketValue<f64>>,
}

/// Rectangular sensor properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RectangularSensorPacket {
    /// Shared properties
    #[serde(flatten)]
    pub common: CommonSensorPacket,
    /// X half-angle in `[0, π/2]`
    pub x_half_angle: Option<PacketValue<f64>>,
    /// Y half-angle in `[0, π/2]`
    pub y_half_angle: Option<PacketValue<f64>>,
}

/// Custom pattern sensor properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomPatternSensorPacket {
    /// Shared properties
    #[serde(flatten)]
    pub common: CommonSensorPacket,
    /// Boundary directions in any of the four encodings
    pub directions: Option<PacketValue<DirectionEncoding>>,
}

/// Update for one named entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SensorPacket {
    /// Entity name
    pub id: String,
    /// Remove the entity instead of updating it
    pub delete: bool,
    /// Entity-level visibility
    pub show: Option<bool>,
    /// `"start/stop"` span the entity exists in
    pub availability: Option<String>,
    /// Cartesian position `[x, y, z]`
    pub position: Option<PacketValue<[f64; 3]>>,
    /// Unit quaternion `[x, y, z, w]`
    pub orientation: Option<PacketValue<[f64; 4]>>,
    /// Conic sensor
    pub conic_sensor: Option<ConicSensorPacket>,
    /// Rectangular sensor
    pub rectangular_sensor: Option<RectangularSensorPacket>,
    /// Custom pattern sensor
    pub custom_pattern_sensor: Option<CustomPatternSensorPacket>,
}
