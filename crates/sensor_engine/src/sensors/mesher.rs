//! Volume meshing
//!
//! Turns a [`BoundaryPolygon`] and a radius into a triangle fan rooted at
//! the sensor apex (the local origin).
//!
//! # Radius correction
//!
//! A polygon with straight edges under-approximates the curved cap of the
//! true sensor volume: the midpoint of each edge sits closer to the apex
//! than its endpoints. Every vertex is therefore pushed out to
//!
//! ```text
//! theta    = max(angle(prev, curr), angle(curr, next))
//! distance = radius / cos(theta / 2)
//! ```
//!
//! which keeps the edges, not only the vertices, at least `radius` away
//! from the apex.
//!
//! # Layout
//!
//! Each face is emitted as its own three vertices (apex, current, previous)
//! sharing one flat normal `normalize(current × previous)`. No vertex is
//! shared across faces.

use crate::foundation::math::{angle_between, Mat4, Vec3};
use crate::geometry::BoundingSphere;
use super::BoundaryPolygon;

/// Floor for `cos(theta / 2)` so antipodal neighbours cannot divide by zero
const MIN_HALF_ANGLE_COSINE: f64 = 1.0e-12;

/// Number of `f32` values per interleaved vertex (position + normal)
pub const FLOATS_PER_VERTEX: usize = 6;

/// One face of the fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeTriangle {
    /// Sensor apex, always the local origin
    pub apex: Vec3,
    /// Extended position of the current sample
    pub edge_a: Vec3,
    /// Extended position of the previous sample
    pub edge_b: Vec3,
    /// Flat face normal, zero for degenerate faces
    pub normal: Vec3,
}

/// Triangulated sensor volume in local space
#[derive(Debug, Clone)]
pub struct VolumeMesh {
    positions: Vec<Vec3>,
    triangles: Vec<VolumeTriangle>,
    bounding_sphere: BoundingSphere,
    bounding_sphere_wc: BoundingSphere,
}

impl VolumeMesh {
    /// Extended vertex positions, one per usable direction, in boundary order
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Fan faces in boundary order
    pub fn triangles(&self) -> &[VolumeTriangle] {
        &self.triangles
    }

    /// Number of faces
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of emitted vertices (three per face)
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Local-space bounding sphere over the apex and all extended vertices
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    /// World-space bounding sphere as of the last [`update_world_bounds`](Self::update_world_bounds)
    pub fn world_bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere_wc
    }

    /// Recompute the world-space bounding sphere from a model matrix
    pub fn update_world_bounds(&mut self, model_matrix: &Mat4) {
        self.bounding_sphere_wc = self.bounding_sphere.transform(model_matrix);
    }

    /// Interleaved `position, normal` vertex stream narrowed to `f32`
    pub fn interleaved_vertices(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertex_count() * FLOATS_PER_VERTEX);
        for triangle in &self.triangles {
            for position in [&triangle.apex, &triangle.edge_a, &triangle.edge_b] {
                data.extend_from_slice(&[
                    position.x as f32,
                    position.y as f32,
                    position.z as f32,
                    triangle.normal.x as f32,
                    triangle.normal.y as f32,
                    triangle.normal.z as f32,
                ]);
            }
        }
        data
    }
}

/// Build the mesh for a boundary at a finite radius
///
/// Non-finite samples are skipped. Returns `None` when fewer than three
/// usable samples remain; callers must render nothing in that state.
pub fn build_mesh(polygon: &BoundaryPolygon, radius: f64) -> Option<VolumeMesh> {
    let normals: Vec<Vec3> = polygon
        .iter()
        .filter(|d| d.is_usable())
        .map(|d| d.unit_vector())
        .collect();

    let count = normals.len();
    if count < 3 {
        return None;
    }

    let mut positions = Vec::with_capacity(count);
    for current in 0..count {
        let previous = (current + count - 1) % count;
        let next = (current + 1) % count;
        let n0 = &normals[previous];
        let n1 = &normals[current];
        let n2 = &normals[next];

        let theta = angle_between(n0, n1).max(angle_between(n1, n2));
        let distance = radius / (theta * 0.5).cos().max(MIN_HALF_ANGLE_COSINE);
        positions.push(n1 * distance);
    }

    let mut triangles = Vec::with_capacity(count);
    for current in 0..count {
        let previous = (current + count - 1) % count;
        let p1 = positions[current];
        let p0 = positions[previous];
        let normal = p1.cross(&p0).try_normalize(0.0).unwrap_or_else(Vec3::zeros);
        triangles.push(VolumeTriangle {
            apex: Vec3::zeros(),
            edge_a: p1,
            edge_b: p0,
            normal,
        });
    }

    let mut bounding_points = Vec::with_capacity(count + 1);
    bounding_points.push(Vec3::zeros());
    bounding_points.extend_from_slice(&positions);
    let bounding_sphere = BoundingSphere::from_points(&bounding_points);

    Some(VolumeMesh {
        positions,
        triangles,
        bounding_sphere,
        bounding_sphere_wc: bounding_sphere,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{BoundarySampler, Direction};
    use crate::foundation::math::constants::{HALF_PI, PI, TAU};
    use crate::foundation::math::utils::deg_to_rad;
    use approx::assert_relative_eq;

    fn square_cone() -> BoundaryPolygon {
        let cone = deg_to_rad(45.0);
        BoundaryPolygon::new(vec![
            Direction::new(0.0, cone),
            Direction::new(HALF_PI, cone),
            Direction::new(PI, cone),
            Direction::new(3.0 * HALF_PI, cone),
        ])
    }

    #[test]
    fn test_too_few_directions_yield_no_mesh() {
        let polygon = BoundaryPolygon::new(vec![Direction::new(0.0, 0.5), Direction::new(1.0, 0.5)]);
        assert!(build_mesh(&polygon, 10.0).is_none());
        assert!(build_mesh(&BoundaryPolygon::empty(), 10.0).is_none());
    }

    #[test]
    fn test_square_cone_vertices_are_extended() {
        let mesh = build_mesh(&square_cone(), 10.0).unwrap();

        // Adjacent corners of a 45° square cone are 60° apart
        let expected = 10.0 / deg_to_rad(30.0).cos();
        assert_eq!(mesh.positions().len(), 4);
        for position in mesh.positions() {
            assert_relative_eq!(position.norm(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_square_cone_bounding_sphere() {
        let mesh = build_mesh(&square_cone(), 10.0).unwrap();
        let sphere = mesh.bounding_sphere();

        assert!(sphere.contains_point(&Vec3::zeros(), 1e-9));
        for position in mesh.positions() {
            assert!(sphere.contains_point(position, 1e-9));
        }
        // Never larger than the sphere centred on the apex
        assert!(sphere.radius <= 10.0 / deg_to_rad(30.0).cos() + 1e-9);
    }

    #[test]
    fn test_square_cone_bounding_sphere_is_tight() {
        let mesh = build_mesh(&square_cone(), 10.0).unwrap();
        let sphere = mesh.bounding_sphere();

        // Corners sit at 10 / cos(30°) along 45° directions, so the apex and
        // all four corners lie on a sphere of radius d·sin(45°) centred on +Z
        let corner_distance = 10.0 / deg_to_rad(30.0).cos();
        let expected = corner_distance * deg_to_rad(45.0).sin();
        assert_relative_eq!(corner_distance, 11.547_005_383_792_515, epsilon = 1e-9);
        assert_relative_eq!(sphere.radius, expected, epsilon = 1e-6);
        assert_relative_eq!(sphere.radius, 8.164_965_809_277_259, epsilon = 1e-6);
        assert_relative_eq!(sphere.center, Vec3::new(0.0, 0.0, expected), epsilon = 1e-6);
    }

    #[test]
    fn test_vertices_cover_radius_for_sampled_boundaries() {
        let sampler = BoundarySampler::default();
        let radius = 250.0;
        let boundaries = [
            sampler.conic(0.0, TAU, 0.0, deg_to_rad(20.0)),
            sampler.conic(deg_to_rad(-30.0), deg_to_rad(60.0), deg_to_rad(5.0), deg_to_rad(40.0)),
            sampler.conic(0.0, deg_to_rad(90.0), 0.0, deg_to_rad(70.0)),
            sampler.rectangular(deg_to_rad(10.0), deg_to_rad(35.0)),
        ];

        for polygon in &boundaries {
            let mesh = build_mesh(polygon, radius).unwrap();
            for position in mesh.positions() {
                assert!(position.norm() >= radius - 1e-9);
            }
        }
    }

    #[test]
    fn test_fan_layout_and_normals() {
        let mesh = build_mesh(&square_cone(), 1.0).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertex_count(), 12);

        let positions = mesh.positions();
        for (i, triangle) in mesh.triangles().iter().enumerate() {
            let previous = (i + 3) % 4;
            assert_eq!(triangle.apex, Vec3::zeros());
            assert_eq!(triangle.edge_a, positions[i]);
            assert_eq!(triangle.edge_b, positions[previous]);
            assert_relative_eq!(triangle.normal.norm(), 1.0, epsilon = 1e-12);

            // Counter-clockwise boundary gives outward normals
            let centroid = (triangle.edge_a + triangle.edge_b) / 3.0;
            let outward = Vec3::new(centroid.x, centroid.y, 0.0);
            assert!(triangle.normal.dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_samples_are_tolerated() {
        let cone = deg_to_rad(30.0);
        let polygon = BoundaryPolygon::new(vec![
            Direction::new(0.0, cone),
            Direction::new(0.0, cone),
            Direction::new(HALF_PI, cone),
            Direction::new(PI, cone),
        ]);
        let mesh = build_mesh(&polygon, 5.0).unwrap();
        let degenerate = &mesh.triangles()[1];
        assert_eq!(degenerate.normal, Vec3::zeros());
        assert!(mesh.interleaved_vertices().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_radius_collapses_to_apex() {
        let mesh = build_mesh(&square_cone(), 0.0).unwrap();
        assert!(mesh.positions().iter().all(|p| *p == Vec3::zeros()));
        assert_eq!(mesh.bounding_sphere().radius, 0.0);
    }

    #[test]
    fn test_interleaved_layout() {
        let mesh = build_mesh(&square_cone(), 1.0).unwrap();
        let data = mesh.interleaved_vertices();
        assert_eq!(data.len(), mesh.vertex_count() * FLOATS_PER_VERTEX);
        // First vertex of every face is the apex
        assert_eq!(&data[0..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_world_bounds_follow_model_matrix() {
        let mut mesh = build_mesh(&square_cone(), 1.0).unwrap();
        let offset = Vec3::new(100.0, 0.0, 0.0);
        mesh.update_world_bounds(&Mat4::new_translation(&offset));
        assert_relative_eq!(
            mesh.world_bounding_sphere().center,
            mesh.bounding_sphere().center + offset,
            epsilon = 1e-9
        );
    }
}
