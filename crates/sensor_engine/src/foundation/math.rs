//! Math utilities and types
//!
//! Sensor geometry is evaluated in double precision: volumes sized to an
//! "infinite" radius reach solar-system distances, and the horizon test
//! works in ellipsoid-scaled coordinates where single precision loses
//! the fragment-level detail. Vertex data is narrowed to `f32` only when it
//! is handed to a render backend.

pub use nalgebra::{
    Vector3,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f64>>;

/// Build a model matrix from an orientation and a translation
///
/// Equivalent to `T * R`: points are rotated into the parent frame first,
/// then moved to `position`.
pub fn model_matrix(position: &Vec3, orientation: &Quat) -> Mat4 {
    Mat4::new_translation(position) * orientation.to_homogeneous()
}

/// Angle between two vectors in radians, in `[0, π]`
///
/// Returns 0 when either vector has zero length so degenerate samples
/// produce zero-area faces instead of NaNs.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    // atan2 of |a x b| and a . b keeps precision for nearly parallel vectors
    let cross = a.cross(b).norm();
    let dot = a.dot(b);
    cross.atan2(dot)
}

/// Largest axis scale of an affine matrix
pub fn maximum_scale(matrix: &Mat4) -> f64 {
    let x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).norm();
    let y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).norm();
    let z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).norm();
    x.max(y).max(z)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// 2 * Pi
    pub const TAU: f64 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f64 = PI * 0.5;

    /// Pi / 4
    pub const FRAC_PI_4: f64 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }
}
