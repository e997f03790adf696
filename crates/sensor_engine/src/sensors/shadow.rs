//! Horizon occlusion and outline classification
//!
//! Both predicates work in the space where the reference ellipsoid is the
//! unit sphere (every coordinate multiplied by the inverse radii).
//!
//! The occlusion test asks whether the segment from the sensor apex to a
//! surface point passes behind the ellipsoid's horizon as seen from the
//! apex. With `q` the scaled apex and `test = |q|² - 1`, the point `p` is in
//! shadow iff it is behind the silhouette plane and inside the silhouette
//! cone:
//!
//! ```text
//! d = (scale(p) - q) · q
//! d < -test  &&  d / |scale(p) - q| < -sqrt(test)
//! ```
//!
//! The outline predicates only decide where the intersection outline is
//! drawn; they never influence occlusion or culling.

use crate::foundation::math::Vec3;
use crate::geometry::Ellipsoid;

/// Tolerance of one outline surface, as a multiple of the outline width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryTolerance {
    /// Scalar tolerance per pixel of outline width
    pub epsilon: f64,
}

impl BoundaryTolerance {
    /// Create a tolerance
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

/// Why a surface point is not drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The point lies inside the reference ellipsoid
    InsideEllipsoid,
    /// The point is behind the ellipsoid horizon as seen from the apex
    Occluded,
    /// The point is farther from the apex than the sensor radius
    BeyondRadius,
}

/// Classification of one point on a sensor volume's surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceClass {
    /// The point is not drawn
    Discarded(DiscardReason),
    /// The point is drawn, possibly as part of an outline
    Visible {
        /// Near the ellipsoid surface, drawn in the intersection color
        on_ellipsoid_outline: bool,
        /// Near the radius limit, drawn in the intersection color
        on_radius_outline: bool,
    },
}

impl SurfaceClass {
    /// Whether the point is drawn at all
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    /// Whether the point is drawn in the intersection color
    pub fn is_outline(&self) -> bool {
        matches!(
            self,
            Self::Visible { on_ellipsoid_outline: true, .. } | Self::Visible { on_radius_outline: true, .. }
        )
    }
}

/// Per-volume inputs of a classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineParams {
    /// Sensor radius; infinity disables the radius cut
    pub radius: f64,
    /// Skip the ellipsoid discard and occlusion tests
    pub show_through_ellipsoid: bool,
    /// Whether outlines are drawn at all
    pub show_intersection: bool,
    /// Outline width in pixels
    pub intersection_width: f64,
    /// Screen-space rate of change of the ellipsoid surface value, if known
    pub ellipsoid_rate: Option<f64>,
    /// Screen-space rate of change of the apex distance, if known
    pub radius_rate: Option<f64>,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            radius: f64::INFINITY,
            show_through_ellipsoid: false,
            show_intersection: true,
            intersection_width: 1.0,
            ellipsoid_rate: None,
            radius_rate: None,
        }
    }
}

/// Whether `point` is hidden behind `ellipsoid` as seen from `apex`
///
/// Returns `None` when the apex is strictly inside the ellipsoid: the
/// horizon is undefined there and the caller chooses a fallback.
/// A point coinciding with the apex is never occluded.
pub fn is_occluded(ellipsoid: &Ellipsoid, apex: &Vec3, point: &Vec3) -> Option<bool> {
    let q = ellipsoid.scale_to_unit(apex);
    let test = q.norm_squared() - 1.0;
    if test < 0.0 {
        return None;
    }

    let to_point = ellipsoid.scale_to_unit(point) - q;
    let d = to_point.dot(&q);
    Some(d < -test && d / to_point.norm() < -test.sqrt())
}

/// Whether an implicit-surface value is within the outline tolerance of zero
///
/// `width` is the outline width in pixels and `epsilon` the per-pixel
/// tolerance. With a rate-of-change estimate `delta` the test adapts so the
/// outline stays roughly `width` pixels wide on screen. It also admits a
/// point whose neighbour is within tolerance, but not when both are far
/// from zero and merely differ by about `delta`.
pub fn is_near_boundary(value: f64, width: f64, epsilon: f64, delta: Option<f64>) -> bool {
    let tolerance = width * epsilon;
    let magnitude = value.abs();
    match delta {
        Some(delta) => {
            let delta = delta.abs();
            let pixels = width * delta;
            (magnitude < tolerance && magnitude < pixels)
                || (delta < 10.0 * tolerance && magnitude - delta < tolerance && magnitude < pixels)
        }
        None => magnitude < tolerance,
    }
}

/// Classifies sensor surface points against one reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowClassifier {
    ellipsoid: Ellipsoid,
    ellipsoid_tolerance: BoundaryTolerance,
    radius_tolerance: BoundaryTolerance,
}

impl ShadowClassifier {
    /// Create a classifier with default outline tolerances
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            ellipsoid_tolerance: BoundaryTolerance::new(1.0e-3),
            radius_tolerance: BoundaryTolerance::new(1.0e-7),
        }
    }

    /// Replace the outline tolerances
    pub fn with_tolerances(mut self, ellipsoid: BoundaryTolerance, radius: BoundaryTolerance) -> Self {
        self.ellipsoid_tolerance = ellipsoid;
        self.radius_tolerance = radius;
        self
    }

    /// The reference ellipsoid
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Horizon test from `apex` to `point`; see [`is_occluded`]
    pub fn is_occluded(&self, apex: &Vec3, point: &Vec3) -> Option<bool> {
        is_occluded(&self.ellipsoid, apex, point)
    }

    /// Run the full per-point pipeline
    ///
    /// Unless showing through the ellipsoid, points inside the ellipsoid or
    /// in its shadow are discarded; an apex inside the ellipsoid counts as
    /// "never occluded". Points beyond the radius are discarded next. What
    /// remains is tested against the ellipsoid and radius outlines.
    pub fn classify(&self, apex: &Vec3, point: &Vec3, params: &OutlineParams) -> SurfaceClass {
        let ellipsoid_value = self.ellipsoid.surface_value(point);

        if !params.show_through_ellipsoid {
            if ellipsoid_value < 0.0 {
                return SurfaceClass::Discarded(DiscardReason::InsideEllipsoid);
            }
            if self.is_occluded(apex, point).unwrap_or(false) {
                return SurfaceClass::Discarded(DiscardReason::Occluded);
            }
        }

        let distance = (point - apex).norm();
        if distance > params.radius {
            return SurfaceClass::Discarded(DiscardReason::BeyondRadius);
        }

        if !params.show_intersection {
            return SurfaceClass::Visible {
                on_ellipsoid_outline: false,
                on_radius_outline: false,
            };
        }

        let on_ellipsoid_outline = is_near_boundary(
            ellipsoid_value,
            params.intersection_width,
            self.ellipsoid_tolerance.epsilon,
            params.ellipsoid_rate,
        );
        let on_radius_outline = params.radius.is_finite()
            && is_near_boundary(
                distance - params.radius,
                params.intersection_width,
                self.radius_tolerance.epsilon * params.radius.max(1.0),
                params.radius_rate,
            );

        SurfaceClass::Visible {
            on_ellipsoid_outline,
            on_radius_outline,
        }
    }
}

impl Default for ShadowClassifier {
    fn default() -> Self {
        Self::new(Ellipsoid::wgs84())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Ellipsoid {
        Ellipsoid::unit_sphere()
    }

    #[test]
    fn test_point_at_apex_is_not_occluded() {
        let apex = Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(is_occluded(&unit(), &apex, &apex), Some(false));
    }

    #[test]
    fn test_far_side_is_occluded() {
        let apex = Vec3::new(3.0, 0.0, 0.0);
        let behind = Vec3::new(-2.0, 0.0, 0.0);
        assert_eq!(is_occluded(&unit(), &apex, &behind), Some(true));
    }

    #[test]
    fn test_near_side_and_beside_are_visible() {
        let apex = Vec3::new(3.0, 0.0, 0.0);
        // In front of the silhouette plane
        assert_eq!(is_occluded(&unit(), &apex, &Vec3::new(1.5, 0.0, 0.0)), Some(false));
        // Behind the plane but outside the silhouette cone
        assert_eq!(is_occluded(&unit(), &apex, &Vec3::new(-2.0, 5.0, 0.0)), Some(false));
    }

    #[test]
    fn test_apex_inside_is_not_computable() {
        let apex = Vec3::new(0.5, 0.0, 0.0);
        assert_eq!(is_occluded(&unit(), &apex, &Vec3::new(-3.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_occlusion_respects_ellipsoid_scaling() {
        let ellipsoid = Ellipsoid::new(10.0, 10.0, 1.0);
        let apex = Vec3::new(0.0, 0.0, 3.0);
        // Straight through the flattened body
        assert_eq!(is_occluded(&ellipsoid, &apex, &Vec3::new(0.0, 0.0, -3.0)), Some(true));
        // Grazes past the x extent
        assert_eq!(is_occluded(&ellipsoid, &apex, &Vec3::new(30.0, 0.0, -3.0)), Some(false));
    }

    #[test]
    fn test_near_boundary_fixed_epsilon() {
        assert!(is_near_boundary(0.0005, 1.0, 1.0e-3, None));
        assert!(!is_near_boundary(0.002, 1.0, 1.0e-3, None));
        // Wider outlines admit more
        assert!(is_near_boundary(0.002, 3.0, 1.0e-3, None));
    }

    #[test]
    fn test_near_boundary_adaptive() {
        // Within tolerance and within the pixel footprint
        assert!(is_near_boundary(0.0005, 1.0, 1.0e-3, Some(0.001)));
        // Steep gradient spreads the outline: a neighbour pixel crosses zero
        assert!(is_near_boundary(0.0015, 1.0, 1.0e-3, Some(0.002)));
        // Both far from zero and merely one delta apart
        assert!(!is_near_boundary(1.0, 1.0, 1.0e-3, Some(1.0)));
    }

    #[test]
    fn test_classify_discards_in_order() {
        let classifier = ShadowClassifier::new(unit());
        let apex = Vec3::new(3.0, 0.0, 0.0);
        let params = OutlineParams {
            radius: 10.0,
            ..OutlineParams::default()
        };

        assert_eq!(
            classifier.classify(&apex, &Vec3::new(0.2, 0.0, 0.0), &params),
            SurfaceClass::Discarded(DiscardReason::InsideEllipsoid)
        );
        assert_eq!(
            classifier.classify(&apex, &Vec3::new(-2.0, 0.0, 0.0), &params),
            SurfaceClass::Discarded(DiscardReason::Occluded)
        );
        assert_eq!(
            classifier.classify(&apex, &Vec3::new(3.0, 20.0, 0.0), &params),
            SurfaceClass::Discarded(DiscardReason::BeyondRadius)
        );
        assert!(classifier
            .classify(&apex, &Vec3::new(3.0, 5.0, 0.0), &params)
            .is_visible());
    }

    #[test]
    fn test_classify_show_through_ellipsoid() {
        let classifier = ShadowClassifier::new(unit());
        let apex = Vec3::new(3.0, 0.0, 0.0);
        let params = OutlineParams {
            show_through_ellipsoid: true,
            ..OutlineParams::default()
        };
        assert!(classifier.classify(&apex, &Vec3::new(-2.0, 0.0, 0.0), &params).is_visible());
        assert!(classifier.classify(&apex, &Vec3::new(0.2, 0.0, 0.0), &params).is_visible());
    }

    #[test]
    fn test_classify_apex_inside_falls_back_to_visible() {
        let classifier = ShadowClassifier::new(unit());
        let apex = Vec3::new(0.5, 0.0, 0.0);
        let class = classifier.classify(&apex, &Vec3::new(-3.0, 0.0, 0.0), &OutlineParams::default());
        assert!(class.is_visible());
    }

    #[test]
    fn test_classify_outlines() {
        let classifier = ShadowClassifier::new(unit());
        let apex = Vec3::new(3.0, 0.0, 0.0);
        let params = OutlineParams {
            radius: 2.5,
            ..OutlineParams::default()
        };

        // On the near surface of the sphere
        let on_surface = classifier.classify(&apex, &Vec3::new(1.0, 0.0, 0.0), &params);
        assert_eq!(
            on_surface,
            SurfaceClass::Visible {
                on_ellipsoid_outline: true,
                on_radius_outline: false
            }
        );

        // Exactly at the radius limit, in empty space
        let at_radius = classifier.classify(&apex, &Vec3::new(3.0, 2.5, 0.0), &params);
        assert_eq!(
            at_radius,
            SurfaceClass::Visible {
                on_ellipsoid_outline: false,
                on_radius_outline: true
            }
        );

        let hidden_outline = OutlineParams {
            show_intersection: false,
            ..params
        };
        assert!(!classifier
            .classify(&apex, &Vec3::new(1.0, 0.0, 0.0), &hidden_outline)
            .is_outline());
    }
}
