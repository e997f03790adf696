//! Geometric primitives shared by meshing, culling and occlusion
//!
//! Provides bounding spheres for the sensor volumes and the reference
//! ellipsoid that the horizon test is measured against.

mod bounds;
mod ellipsoid;

pub use bounds::BoundingSphere;
pub use ellipsoid::Ellipsoid;
