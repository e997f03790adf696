//! # Unified Configuration System
//!
//! Consolidates the tunables of the sensor pipeline into one serializable
//! structure. Every section carries `#[serde(default)]` so a file only needs
//! to mention the values it overrides.
//!
//! ## Configuration Categories
//!
//! - **Sampling**: angular step of boundary sampling, rectangular tangent cap
//! - **Volume**: the sentinel distance that stands in for an infinite radius
//! - **Ellipsoid**: radii of the reference body used for the horizon test
//! - **Outline**: tolerances of the intersection outline predicates
//! - **Defaults**: values applied when an entity leaves a property undefined

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::geometry::Ellipsoid;
use crate::sensors::material::Color;
use crate::sensors::sampler::BoundarySampler;
use crate::sensors::shadow::{BoundaryTolerance, ShadowClassifier};

/// Distance from the Sun to Pluto in meters, used when a radius is infinite
pub const FAR_RADIUS: f64 = 5_906_376_272_000.0;

/// # Sampling Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Clock-angle step between consecutive boundary samples, in degrees
    pub clock_step_degrees: f64,
    /// Half-angles of rectangular sensors are capped here before taking tangents
    pub rectangular_cap_degrees: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            clock_step_degrees: 2.0,
            rectangular_cap_degrees: 89.0,
        }
    }
}

/// # Volume Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Radius used in place of an infinite sensor radius
    pub far_radius: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self { far_radius: FAR_RADIUS }
    }
}

/// # Reference Ellipsoid Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipsoidConfig {
    /// Semi-axes of the ellipsoid in meters
    pub radii: [f64; 3],
}

impl Default for EllipsoidConfig {
    fn default() -> Self {
        let wgs84 = Ellipsoid::wgs84();
        Self {
            radii: [wgs84.radii.x, wgs84.radii.y, wgs84.radii.z],
        }
    }
}

/// # Outline Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Relative tolerance of the ellipsoid-surface outline
    pub ellipsoid_epsilon: f64,
    /// Tolerance of the radius outline, relative to the sensor radius
    pub radius_epsilon: f64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            ellipsoid_epsilon: 1.0e-3,
            radius_epsilon: 1.0e-7,
        }
    }
}

/// # Sensor Defaults
///
/// Values a synchronizer applies when the entity leaves a property undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorDefaults {
    /// Color of the intersection outline
    pub intersection_color: Color,
    /// Width of the intersection outline in pixels
    pub intersection_width: f64,
    /// Color of the default lateral surface material
    pub material_color: Color,
    /// Whether the intersection outline is drawn
    pub show_intersection: bool,
    /// Whether the volume is drawn through the ellipsoid
    pub show_through_ellipsoid: bool,
}

impl Default for SensorDefaults {
    fn default() -> Self {
        Self {
            intersection_color: Color::WHITE,
            intersection_width: 1.0,
            material_color: Color::new(1.0, 0.0, 0.0, 0.5),
            show_intersection: true,
            show_through_ellipsoid: false,
        }
    }
}

/// # Sensor Engine Configuration
///
/// Top-level configuration handed to every synchronizer at construction.
///
/// ```rust
/// use sensor_engine::core::SensorEngineConfig;
///
/// let config = SensorEngineConfig::default().with_clock_step_degrees(1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorEngineConfig {
    /// Boundary sampling
    pub sampling: SamplingConfig,
    /// Volume sizing
    pub volume: VolumeConfig,
    /// Reference ellipsoid
    pub ellipsoid: EllipsoidConfig,
    /// Outline tolerances
    pub outline: OutlineConfig,
    /// Property defaults
    pub defaults: SensorDefaults,
}

impl SensorEngineConfig {
    /// Set the clock-angle sampling step
    pub fn with_clock_step_degrees(mut self, degrees: f64) -> Self {
        self.sampling.clock_step_degrees = degrees;
        self
    }

    /// Set the reference ellipsoid radii
    pub fn with_ellipsoid_radii(mut self, x: f64, y: f64, z: f64) -> Self {
        self.ellipsoid.radii = [x, y, z];
        self
    }

    /// Set the radius substituted for infinite sensor radii
    pub fn with_far_radius(mut self, far_radius: f64) -> Self {
        self.volume.far_radius = far_radius;
        self
    }

    /// Set the default property values
    pub fn with_defaults(mut self, defaults: SensorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Boundary sampler configured from the sampling section
    pub fn sampler(&self) -> BoundarySampler {
        BoundarySampler::new(
            self.sampling.clock_step_degrees.to_radians(),
            self.sampling.rectangular_cap_degrees.to_radians(),
        )
    }

    /// Reference ellipsoid configured from the ellipsoid section
    pub fn reference_ellipsoid(&self) -> Ellipsoid {
        let [x, y, z] = self.ellipsoid.radii;
        Ellipsoid::new(x, y, z)
    }

    /// Shadow classifier for the reference ellipsoid with configured tolerances
    pub fn shadow_classifier(&self) -> ShadowClassifier {
        ShadowClassifier::new(self.reference_ellipsoid()).with_tolerances(
            BoundaryTolerance::new(self.outline.ellipsoid_epsilon),
            BoundaryTolerance::new(self.outline.radius_epsilon),
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.sampling.clock_step_degrees;
        if !(step > 0.0 && step <= 90.0) {
            return Err(ConfigError::Invalid(format!(
                "clock_step_degrees must be in (0, 90], got {step}"
            )));
        }
        let cap = self.sampling.rectangular_cap_degrees;
        if !(cap > 0.0 && cap < 90.0) {
            return Err(ConfigError::Invalid(format!(
                "rectangular_cap_degrees must be in (0, 90), got {cap}"
            )));
        }
        if !(self.volume.far_radius.is_finite() && self.volume.far_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "far_radius must be positive and finite, got {}",
                self.volume.far_radius
            )));
        }
        if self.ellipsoid.radii.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "ellipsoid radii must be positive, got {:?}",
                self.ellipsoid.radii
            )));
        }
        if self.defaults.intersection_width < 0.0 {
            return Err(ConfigError::Invalid(
                "intersection_width cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for SensorEngineConfig {}
