//! Boundary sampling
//!
//! Converts high-level sensor parameters into a [`BoundaryPolygon`]:
//!
//! - **Conic**: a full circle, a pie-slice wedge closed at the apex, or an
//!   annular wedge when an inner half-angle is given.
//! - **Rectangular**: four corner directions of a pyramid with independent
//!   x and y half-angles.
//!
//! The output is always a single consistent traversal; nothing downstream
//! sorts samples.

use super::{BoundaryPolygon, Direction, SensorError, SensorResult};
use crate::foundation::math::constants::{HALF_PI, PI, TAU};

/// Slack used when deciding whether a stepped angle reached its limit
const ANGLE_EPSILON: f64 = 1.0e-10;

/// Produces boundary polygons with a fixed clock-angle step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySampler {
    step: f64,
    rectangular_cap: f64,
}

impl Default for BoundarySampler {
    fn default() -> Self {
        Self::new(2.0_f64.to_radians(), 89.0_f64.to_radians())
    }
}

impl BoundarySampler {
    /// Create a sampler with a clock step and a rectangular half-angle cap, both in radians
    pub fn new(step: f64, rectangular_cap: f64) -> Self {
        Self {
            step,
            rectangular_cap,
        }
    }

    /// Clock-angle step in radians
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of samples a full circle produces: `ceil(2π / step)`
    pub fn full_circle_count(&self) -> usize {
        // The epsilon keeps exact divisors such as 2° from rounding up
        ((TAU / self.step) - ANGLE_EPSILON).ceil() as usize
    }

    /// Sample a conic sensor footprint
    ///
    /// With `minimum_clock == 0` and `maximum_clock == 2π` the result is a
    /// full circle at the outer half-angle. A nonzero inner half-angle is
    /// ignored in that case and no hole is carved.
    ///
    /// Otherwise the outer edge is walked from the minimum to the maximum
    /// clock angle. With an inner half-angle the walk returns along the
    /// inner edge, forming an annular wedge; without one the polygon closes
    /// at the apex with a single cone-angle-0 sample.
    ///
    /// A maximum below the minimum is unwrapped by one turn.
    pub fn conic(
        &self,
        minimum_clock: f64,
        maximum_clock: f64,
        inner_half_angle: f64,
        outer_half_angle: f64,
    ) -> BoundaryPolygon {
        let mut directions = Vec::new();

        if minimum_clock == 0.0 && maximum_clock == TAU {
            let count = self.full_circle_count();
            directions.reserve(count);
            for i in 0..count {
                directions.push(Direction::new(i as f64 * self.step, outer_half_angle));
            }
            return BoundaryPolygon::new(directions);
        }

        let maximum_clock = if maximum_clock < minimum_clock {
            maximum_clock + TAU
        } else {
            maximum_clock
        };

        let mut i = 0_usize;
        loop {
            let angle = minimum_clock + i as f64 * self.step;
            if angle >= maximum_clock - ANGLE_EPSILON {
                break;
            }
            directions.push(Direction::new(angle, outer_half_angle));
            i += 1;
        }
        directions.push(Direction::new(maximum_clock, outer_half_angle));

        if inner_half_angle != 0.0 {
            let mut i = 0_usize;
            loop {
                let angle = maximum_clock - i as f64 * self.step;
                if angle <= minimum_clock + ANGLE_EPSILON {
                    break;
                }
                directions.push(Direction::new(angle, inner_half_angle));
                i += 1;
            }
            directions.push(Direction::new(minimum_clock, inner_half_angle));
        } else {
            directions.push(Direction::new(maximum_clock, 0.0));
        }

        BoundaryPolygon::new(directions)
    }

    /// Sample a rectangular pyramid footprint
    ///
    /// Both half-angles are capped just under 90° so their tangents stay
    /// finite. The four corners share one cone angle and are arranged
    /// symmetrically about both axes.
    pub fn rectangular(&self, x_half_angle: f64, y_half_angle: f64) -> BoundaryPolygon {
        let tan_x = x_half_angle.min(self.rectangular_cap).tan();
        let tan_y = y_half_angle.min(self.rectangular_cap).tan();
        let theta = tan_x.atan2(tan_y);
        let cone = (tan_x * tan_x + tan_y * tan_y).sqrt().atan();

        BoundaryPolygon::new(vec![
            Direction::new(theta, cone),
            Direction::new(PI - theta, cone),
            Direction::new(PI + theta, cone),
            Direction::new(-theta, cone),
        ])
    }
}

/// Reject rectangular half-angles outside `[0, π/2]`
pub fn validate_rectangular_half_angle(name: &'static str, value: f64) -> SensorResult<f64> {
    if (0.0..=HALF_PI).contains(&value) {
        Ok(value)
    } else {
        Err(SensorError::HalfAngleOutOfRange {
            name,
            value,
            max: HALF_PI,
        })
    }
}

/// Reject conic half-angles outside `[0, π]`
pub fn validate_conic_half_angle(name: &'static str, value: f64) -> SensorResult<f64> {
    if (0.0..=PI).contains(&value) {
        Ok(value)
    } else {
        Err(SensorError::HalfAngleOutOfRange {
            name,
            value,
            max: PI,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils::deg_to_rad;
    use approx::assert_relative_eq;

    #[test]
    fn test_full_circle_count_and_cone_angle() {
        let sampler = BoundarySampler::default();
        let outer = deg_to_rad(30.0);
        let polygon = sampler.conic(0.0, TAU, 0.0, outer);

        assert_eq!(polygon.len(), 180);
        assert_eq!(polygon.len(), sampler.full_circle_count());
        assert!(polygon.iter().all(|d| d.cone == outer && d.magnitude == 1.0));
    }

    #[test]
    fn test_full_circle_count_with_uneven_step() {
        let sampler = BoundarySampler::new(deg_to_rad(7.0), deg_to_rad(89.0));
        let polygon = sampler.conic(0.0, TAU, 0.0, 0.5);
        assert_eq!(polygon.len(), (360.0_f64 / 7.0).ceil() as usize);
    }

    #[test]
    fn test_full_circle_ignores_inner_half_angle() {
        let sampler = BoundarySampler::default();
        let polygon = sampler.conic(0.0, TAU, deg_to_rad(10.0), deg_to_rad(30.0));
        assert_eq!(polygon.len(), 180);
        assert!(polygon.iter().all(|d| d.cone == deg_to_rad(30.0)));
    }

    #[test]
    fn test_pie_slice_closes_at_apex() {
        let sampler = BoundarySampler::default();
        let max_clock = deg_to_rad(10.0);
        let polygon = sampler.conic(0.0, max_clock, 0.0, deg_to_rad(20.0));
        let directions = polygon.directions();

        // 0, 2, 4, 6, 8 degrees, then exactly 10 degrees, then the apex sample
        assert_eq!(directions.len(), 7);
        assert_eq!(directions[5].clock, max_clock);
        assert_eq!(directions[5].cone, deg_to_rad(20.0));
        assert_eq!(directions[6].clock, max_clock);
        assert_eq!(directions[6].cone, 0.0);
    }

    #[test]
    fn test_annular_wedge_returns_along_inner_edge() {
        let sampler = BoundarySampler::default();
        let min_clock = deg_to_rad(-4.0);
        let max_clock = deg_to_rad(4.0);
        let inner = deg_to_rad(5.0);
        let outer = deg_to_rad(15.0);
        let polygon = sampler.conic(min_clock, max_clock, inner, outer);
        let directions = polygon.directions();

        // outer: -4, -2, 0, 2, then 4; inner: 4, 2, 0, -2, then -4
        assert_eq!(directions.len(), 10);
        assert!(directions[..5].iter().all(|d| d.cone == outer));
        assert!(directions[5..].iter().all(|d| d.cone == inner));
        assert_eq!(directions[4].clock, max_clock);
        assert_eq!(directions[5].clock, max_clock);
        assert_eq!(directions[9].clock, min_clock);
    }

    #[test]
    fn test_rectangular_square_corners() {
        let sampler = BoundarySampler::default();
        let polygon = sampler.rectangular(deg_to_rad(45.0), deg_to_rad(45.0));

        assert_eq!(polygon.len(), 4);
        let expected_cone = (1.0_f64 / 3.0_f64.sqrt()).acos();
        for direction in polygon.iter() {
            assert_relative_eq!(direction.cone, expected_cone, epsilon = 1e-12);
            assert_relative_eq!(direction.cone.to_degrees(), 54.7356, epsilon = 1e-4);
        }

        let clocks: Vec<f64> = polygon.iter().map(|d| d.clock.to_degrees()).collect();
        assert_relative_eq!(clocks[0], 45.0, epsilon = 1e-9);
        assert_relative_eq!(clocks[1], 135.0, epsilon = 1e-9);
        assert_relative_eq!(clocks[2], 225.0, epsilon = 1e-9);
        assert_relative_eq!(clocks[3], -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rectangular_caps_ninety_degrees() {
        let sampler = BoundarySampler::default();
        let polygon = sampler.rectangular(HALF_PI, HALF_PI);
        assert!(polygon.iter().all(|d| d.cone.is_finite() && d.cone < HALF_PI));
    }

    #[test]
    fn test_rectangular_half_angle_validation() {
        assert!(validate_rectangular_half_angle("xHalfAngle", HALF_PI).is_ok());
        assert!(matches!(
            validate_rectangular_half_angle("xHalfAngle", deg_to_rad(91.0)),
            Err(SensorError::HalfAngleOutOfRange { name: "xHalfAngle", .. })
        ));
    }
}
