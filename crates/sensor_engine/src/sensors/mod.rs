//! Sensor volume construction
//!
//! Everything needed to turn angular sensor parameters into a renderable
//! volume and to judge which parts of it are hidden by the reference
//! ellipsoid:
//!
//! ```text
//! BoundarySampler ──► BoundaryPolygon ──► build_mesh ──► VolumeMesh
//!                                                           │
//!                    ShadowClassifier (per surface point)   ▼
//!                                                      SensorVolume
//! ```

pub mod direction;
pub mod sampler;
pub mod mesher;
pub mod shadow;
pub mod material;
pub mod volume;

pub use direction::{Direction, BoundaryPolygon, DirectionEncoding};
pub use sampler::BoundarySampler;
pub use mesher::{build_mesh, VolumeMesh, VolumeTriangle};
pub use shadow::{ShadowClassifier, BoundaryTolerance, SurfaceClass, DiscardReason, OutlineParams};
pub use material::{Color, Material, MaterialId, MaterialSpec, MaterialAllocator, MaterialUpdate};
pub use volume::{SensorVolume, DirtyFlags};

use crate::render::BackendError;
use thiserror::Error;

/// Errors raised when configuring sensor volumes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Radius was negative or NaN
    #[error("Radius must be greater than or equal to zero, got {0}")]
    NegativeRadius(f64),

    /// A boundary needs at least three usable directions
    #[error("Boundary needs at least 3 usable directions, got {0}")]
    TooFewDirections(usize),

    /// A half-angle fell outside its allowed range
    #[error("{name} must be in [0, {max}] radians, got {value}")]
    HalfAngleOutOfRange {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Upper bound
        max: f64,
    },

    /// Direction data could not be decoded
    #[error("Invalid direction data: {0}")]
    InvalidDirectionData(String),

    /// Intersection width was negative or NaN
    #[error("Intersection width must be non-negative, got {0}")]
    NegativeWidth(f64),

    /// The render backend rejected an operation
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Reject negative or NaN radii; infinity is allowed
pub fn validate_radius(radius: f64) -> SensorResult<f64> {
    if radius >= 0.0 {
        Ok(radius)
    } else {
        Err(SensorError::NegativeRadius(radius))
    }
}

/// Reject negative or NaN intersection widths
pub fn validate_width(width: f64) -> SensorResult<f64> {
    if width >= 0.0 && width.is_finite() {
        Ok(width)
    } else {
        Err(SensorError::NegativeWidth(width))
    }
}
