//! Boundary directions and their ingestion encodings
//!
//! A sensor's angular footprint is described by [`Direction`] samples
//! measured in the sensor frame: the cone angle is the angle from +Z, the
//! clock angle is measured in the XY plane from +X towards +Y.

use serde::{Serialize, Deserialize};

use super::{SensorError, SensorResult};
use crate::foundation::math::Vec3;

/// A spherical boundary sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Clock angle in radians
    pub clock: f64,
    /// Cone angle from +Z in radians
    pub cone: f64,
    /// Magnitude, 1 for points on the unit sphere
    pub magnitude: f64,
}

impl Direction {
    /// Create a unit direction
    pub fn new(clock: f64, cone: f64) -> Self {
        Self {
            clock,
            cone,
            magnitude: 1.0,
        }
    }

    /// Create a direction with an explicit magnitude
    pub fn with_magnitude(clock: f64, cone: f64, magnitude: f64) -> Self {
        Self {
            clock,
            cone,
            magnitude,
        }
    }

    /// Convert a Cartesian vector, keeping its length as the magnitude
    ///
    /// The zero vector maps to the +Z direction with zero magnitude.
    pub fn from_cartesian(v: &Vec3) -> Self {
        let magnitude = v.norm();
        if magnitude == 0.0 {
            return Self::with_magnitude(0.0, 0.0, 0.0);
        }
        let cone = (v.z / magnitude).clamp(-1.0, 1.0).acos();
        let clock = v.y.atan2(v.x);
        Self::with_magnitude(clock, cone, magnitude)
    }

    /// Same direction on the unit sphere
    pub fn normalized(&self) -> Self {
        Self::new(self.clock, self.cone)
    }

    /// Position on the unit sphere, ignoring magnitude
    pub fn unit_vector(&self) -> Vec3 {
        let (sin_cone, cos_cone) = self.cone.sin_cos();
        let (sin_clock, cos_clock) = self.clock.sin_cos();
        Vec3::new(sin_cone * cos_clock, sin_cone * sin_clock, cos_cone)
    }

    /// Both angles are finite
    pub fn is_usable(&self) -> bool {
        self.clock.is_finite() && self.cone.is_finite()
    }
}

/// An ordered, closed polygon of directions
///
/// Order is significant: consecutive samples are adjacent edges of the
/// footprint, and the last sample connects back to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryPolygon {
    directions: Vec<Direction>,
}

impl BoundaryPolygon {
    /// Wrap directions without validation
    pub fn new(directions: Vec<Direction>) -> Self {
        Self { directions }
    }

    /// Wrap directions, requiring at least three usable samples
    pub fn try_new(directions: Vec<Direction>) -> SensorResult<Self> {
        let polygon = Self::new(directions);
        polygon.validate()?;
        Ok(polygon)
    }

    /// An empty polygon, which renders nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check that at least three directions are usable
    pub fn validate(&self) -> SensorResult<()> {
        let usable = self.usable_count();
        if usable < 3 {
            return Err(SensorError::TooFewDirections(usable));
        }
        Ok(())
    }

    /// Number of samples with finite angles
    pub fn usable_count(&self) -> usize {
        self.directions.iter().filter(|d| d.is_usable()).count()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Whether the polygon has no samples
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Samples in traversal order
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Iterate samples in traversal order
    pub fn iter(&self) -> impl Iterator<Item = &Direction> {
        self.directions.iter()
    }

    /// Append a sample
    pub fn push(&mut self, direction: Direction) {
        self.directions.push(direction);
    }
}

impl FromIterator<Direction> for BoundaryPolygon {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The four interchangeable flat-array encodings a direction list may arrive in
///
/// Serialized externally tagged in camel case, e.g.
/// `{"unitSpherical": [clock0, cone0, clock1, cone1, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectionEncoding {
    /// `(clock, cone)` pairs on the unit sphere
    UnitSpherical(Vec<f64>),
    /// `(clock, cone, magnitude)` triples
    Spherical(Vec<f64>),
    /// `(x, y, z)` unit vectors
    UnitCartesian(Vec<f64>),
    /// `(x, y, z)` vectors of any length
    Cartesian(Vec<f64>),
}

impl DirectionEncoding {
    fn values(&self) -> &[f64] {
        match self {
            Self::UnitSpherical(values)
            | Self::Spherical(values)
            | Self::UnitCartesian(values)
            | Self::Cartesian(values) => values,
        }
    }

    fn stride(&self) -> usize {
        match self {
            Self::UnitSpherical(_) => 2,
            _ => 3,
        }
    }

    /// Decode into the canonical direction form
    ///
    /// Fails if the flat array length is not a multiple of the tuple size or
    /// if fewer than three usable directions result.
    pub fn to_polygon(&self) -> SensorResult<BoundaryPolygon> {
        let values = self.values();
        let stride = self.stride();
        if values.len() % stride != 0 {
            return Err(SensorError::InvalidDirectionData(format!(
                "expected a multiple of {stride} values, got {}",
                values.len()
            )));
        }

        let directions = values
            .chunks_exact(stride)
            .map(|chunk| match self {
                Self::UnitSpherical(_) => Direction::new(chunk[0], chunk[1]),
                Self::Spherical(_) => Direction::with_magnitude(chunk[0], chunk[1], chunk[2]),
                Self::UnitCartesian(_) => {
                    Direction::from_cartesian(&Vec3::new(chunk[0], chunk[1], chunk[2])).normalized()
                }
                Self::Cartesian(_) => Direction::from_cartesian(&Vec3::new(chunk[0], chunk[1], chunk[2])),
            })
            .collect();

        BoundaryPolygon::try_new(directions)
    }
}
