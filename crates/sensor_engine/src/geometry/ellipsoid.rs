//! Reference ellipsoid

use crate::foundation::math::Vec3;

/// An axis-aligned ellipsoid centred at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-axes along x, y and z
    pub radii: Vec3,
    /// Component-wise reciprocal of `radii`
    pub inverse_radii: Vec3,
}

impl Ellipsoid {
    /// Create an ellipsoid from its semi-axes
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let radii = Vec3::new(x, y, z);
        Self {
            radii,
            inverse_radii: Vec3::new(1.0 / x, 1.0 / y, 1.0 / z),
        }
    }

    /// The WGS84 earth ellipsoid
    pub fn wgs84() -> Self {
        Self::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179_3)
    }

    /// The unit sphere
    pub fn unit_sphere() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Map a point into the space where this ellipsoid is the unit sphere
    pub fn scale_to_unit(&self, point: &Vec3) -> Vec3 {
        point.component_mul(&self.inverse_radii)
    }

    /// Implicit surface value `|scale(p)|² - 1`
    ///
    /// Negative inside, zero on the surface, positive outside.
    pub fn surface_value(&self, point: &Vec3) -> f64 {
        self.scale_to_unit(point).norm_squared() - 1.0
    }

    /// Check whether a point lies strictly inside
    pub fn contains(&self, point: &Vec3) -> bool {
        self.surface_value(point) < 0.0
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_surface_value_sign() {
        let ellipsoid = Ellipsoid::new(2.0, 2.0, 1.0);
        assert!(ellipsoid.surface_value(&Vec3::zeros()) < 0.0);
        assert_abs_diff_eq!(ellipsoid.surface_value(&Vec3::new(2.0, 0.0, 0.0)), 0.0);
        assert_abs_diff_eq!(ellipsoid.surface_value(&Vec3::new(0.0, 0.0, 1.0)), 0.0);
        assert!(ellipsoid.surface_value(&Vec3::new(0.0, 0.0, 1.5)) > 0.0);
    }

    #[test]
    fn test_wgs84_polar_radius_is_smaller() {
        let wgs84 = Ellipsoid::wgs84();
        assert!(wgs84.radii.z < wgs84.radii.x);
        assert!(wgs84.contains(&Vec3::new(0.0, 0.0, 6_357_000.0 - 1_000.0)));
    }
}
