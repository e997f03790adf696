//! Sensor kinds
//!
//! A [`SensorKind`] tells the generic synchronizer where its graphics live
//! on an entity, how to resolve the kind-specific angular parameters at a
//! time, and how to turn those resolved parameters into a boundary.

use std::fmt;

use crate::foundation::math::constants::{FRAC_PI_4, PI, TAU};
use crate::foundation::time::JulianDate;
use crate::scene::{
    value_of, value_or, ConicShape, CustomPatternShape, Entity, RectangularShape, SensorGraphics,
};
use crate::sensors::sampler::{validate_conic_half_angle, validate_rectangular_half_angle};
use crate::sensors::{BoundaryPolygon, BoundarySampler, SensorResult};

/// One family of sensor shapes
pub trait SensorKind {
    /// Angular parameters stored on the graphics bundle
    type Shape: fmt::Debug;

    /// Angular parameters resolved at one time, compared tick to tick
    type Snapshot: Clone + PartialEq + fmt::Debug;

    /// Name used in logs
    const NAME: &'static str;

    /// This kind's graphics on an entity, if attached
    fn graphics(entity: &Entity) -> Option<&SensorGraphics<Self::Shape>>;

    /// Resolve the angular parameters, applying documented defaults
    fn resolve_shape(shape: &Self::Shape, time: JulianDate) -> Self::Snapshot;

    /// Produce the boundary for resolved parameters
    fn boundary(snapshot: &Self::Snapshot, sampler: &BoundarySampler) -> SensorResult<BoundaryPolygon>;
}

/// Resolved conic parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicAngles {
    /// Inner half-angle, default 0
    pub inner_half_angle: f64,
    /// Outer half-angle, default π
    pub outer_half_angle: f64,
    /// Minimum clock angle, default 0
    pub minimum_clock_angle: f64,
    /// Maximum clock angle, default 2π
    pub maximum_clock_angle: f64,
}

/// Cones, pie-slice wedges and annular wedges
#[derive(Debug, Clone, Copy, Default)]
pub struct ConicSensor;

impl SensorKind for ConicSensor {
    type Shape = ConicShape;
    type Snapshot = ConicAngles;
    const NAME: &'static str = "conic";

    fn graphics(entity: &Entity) -> Option<&SensorGraphics<ConicShape>> {
        entity.conic_sensor.as_ref()
    }

    fn resolve_shape(shape: &ConicShape, time: JulianDate) -> ConicAngles {
        ConicAngles {
            inner_half_angle: value_or(&shape.inner_half_angle, time, 0.0),
            outer_half_angle: value_or(&shape.outer_half_angle, time, PI),
            minimum_clock_angle: value_or(&shape.minimum_clock_angle, time, 0.0),
            maximum_clock_angle: value_or(&shape.maximum_clock_angle, time, TAU),
        }
    }

    fn boundary(angles: &ConicAngles, sampler: &BoundarySampler) -> SensorResult<BoundaryPolygon> {
        let inner = validate_conic_half_angle("innerHalfAngle", angles.inner_half_angle)?;
        let outer = validate_conic_half_angle("outerHalfAngle", angles.outer_half_angle)?;
        let polygon = sampler.conic(angles.minimum_clock_angle, angles.maximum_clock_angle, inner, outer);
        polygon.validate()?;
        Ok(polygon)
    }
}

/// Resolved rectangular parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangularAngles {
    /// Half-angle about y, default π/4
    pub x_half_angle: f64,
    /// Half-angle about x, default π/4
    pub y_half_angle: f64,
}

/// Rectangular pyramids
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangularSensor;

impl SensorKind for RectangularSensor {
    type Shape = RectangularShape;
    type Snapshot = RectangularAngles;
    const NAME: &'static str = "rectangular";

    fn graphics(entity: &Entity) -> Option<&SensorGraphics<RectangularShape>> {
        entity.rectangular_sensor.as_ref()
    }

    fn resolve_shape(shape: &RectangularShape, time: JulianDate) -> RectangularAngles {
        RectangularAngles {
            x_half_angle: value_or(&shape.x_half_angle, time, FRAC_PI_4),
            y_half_angle: value_or(&shape.y_half_angle, time, FRAC_PI_4),
        }
    }

    fn boundary(angles: &RectangularAngles, sampler: &BoundarySampler) -> SensorResult<BoundaryPolygon> {
        let x = validate_rectangular_half_angle("xHalfAngle", angles.x_half_angle)?;
        let y = validate_rectangular_half_angle("yHalfAngle", angles.y_half_angle)?;
        Ok(sampler.rectangular(x, y))
    }
}

/// Arbitrary direction-list boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomPatternSensor;

impl SensorKind for CustomPatternSensor {
    type Shape = CustomPatternShape;
    type Snapshot = Option<BoundaryPolygon>;
    const NAME: &'static str = "custom pattern";

    fn graphics(entity: &Entity) -> Option<&SensorGraphics<CustomPatternShape>> {
        entity.custom_pattern_sensor.as_ref()
    }

    fn resolve_shape(shape: &CustomPatternShape, time: JulianDate) -> Option<BoundaryPolygon> {
        value_of(&shape.directions, time)
    }

    fn boundary(directions: &Option<BoundaryPolygon>, _sampler: &BoundarySampler) -> SensorResult<BoundaryPolygon> {
        let polygon = directions.clone().unwrap_or_default();
        polygon.validate()?;
        Ok(polygon)
    }
}
