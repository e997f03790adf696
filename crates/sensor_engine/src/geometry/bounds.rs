//! Bounding spheres for culling sensor volumes

use crate::foundation::math::{maximum_scale, Mat4, Point3, Vec3};

/// A bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f64,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 0.0)
    }
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Compute a tight-ish sphere enclosing `points`
    ///
    /// Runs Ritter's two-pass algorithm seeded from the widest pair of axis
    /// extremes, and also the naive sphere centred on the axis-aligned box.
    /// The smaller of the two is returned. An empty slice yields a zero sphere.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let mut x_min = *first;
        let mut y_min = *first;
        let mut z_min = *first;
        let mut x_max = *first;
        let mut y_max = *first;
        let mut z_max = *first;

        for point in &points[1..] {
            if point.x < x_min.x {
                x_min = *point;
            }
            if point.x > x_max.x {
                x_max = *point;
            }
            if point.y < y_min.y {
                y_min = *point;
            }
            if point.y > y_max.y {
                y_max = *point;
            }
            if point.z < z_min.z {
                z_min = *point;
            }
            if point.z > z_max.z {
                z_max = *point;
            }
        }

        // Seed from the pair of extremes with the largest span
        let x_span = (x_max - x_min).norm_squared();
        let y_span = (y_max - y_min).norm_squared();
        let z_span = (z_max - z_min).norm_squared();

        let (mut diameter_a, mut diameter_b) = (x_min, x_max);
        let mut max_span = x_span;
        if y_span > max_span {
            max_span = y_span;
            diameter_a = y_min;
            diameter_b = y_max;
        }
        if z_span > max_span {
            diameter_a = z_min;
            diameter_b = z_max;
        }

        let mut ritter_center = (diameter_a + diameter_b) * 0.5;
        let mut radius_squared = (diameter_b - ritter_center).norm_squared();
        let mut ritter_radius = radius_squared.sqrt();

        // Box-centred sphere
        let min_box = Vec3::new(x_min.x, y_min.y, z_min.z);
        let max_box = Vec3::new(x_max.x, y_max.y, z_max.z);
        let naive_center = (min_box + max_box) * 0.5;
        let mut naive_radius: f64 = 0.0;

        for point in points {
            naive_radius = naive_radius.max((point - naive_center).norm());

            let old_center_to_point_squared = (point - ritter_center).norm_squared();
            if old_center_to_point_squared > radius_squared {
                let old_center_to_point = old_center_to_point_squared.sqrt();
                ritter_radius = (ritter_radius + old_center_to_point) * 0.5;
                radius_squared = ritter_radius * ritter_radius;
                let old_to_new = old_center_to_point - ritter_radius;
                ritter_center = (ritter_center * ritter_radius + point * old_to_new) / old_center_to_point;
            }
        }

        if ritter_radius < naive_radius {
            Self::new(ritter_center, ritter_radius)
        } else {
            Self::new(naive_center, naive_radius)
        }
    }

    /// Apply an affine transform
    ///
    /// The center is transformed as a point and the radius grows by the
    /// largest axis scale of the matrix.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let center = matrix.transform_point(&Point3::from(self.center)).coords;
        Self::new(center, self.radius * maximum_scale(matrix))
    }

    /// Check if a point is inside or on the sphere, with a relative tolerance
    pub fn contains_point(&self, point: &Vec3, tolerance: f64) -> bool {
        (point - self.center).norm() <= self.radius * (1.0 + tolerance) + tolerance
    }
}
