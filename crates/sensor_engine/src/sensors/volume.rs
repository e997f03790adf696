//! The sensor volume render primitive
//!
//! A [`SensorVolume`] owns one [`VolumeMesh`] and the backend resources it
//! was uploaded into. Its public parameters are plain setters; derived data
//! is only regenerated during [`SensorVolume::update`], and only for the
//! aspects marked dirty since the previous update:
//!
//! | Aspect       | Inputs                                  | Work on change                    |
//! |--------------|-----------------------------------------|-----------------------------------|
//! | `GEOMETRY`   | boundary, radius                        | rebuild mesh, re-upload vertices  |
//! | `TRANSFORM`  | model matrix                            | recompute world bounding sphere   |
//! | `APPEARANCE` | material kind, show-through-ellipsoid   | rebuild the backend pipeline      |
//!
//! Setters compare by value and leave the flags alone for unchanged input.

use bitflags::bitflags;

use super::mesher::build_mesh;
use super::shadow::{OutlineParams, ShadowClassifier, SurfaceClass};
use super::{
    validate_radius, validate_width, BoundaryPolygon, Color, Material, SensorResult, VolumeMesh,
};
use crate::core::config::FAR_RADIUS;
use crate::foundation::collections::{EntityId, GeometryHandle, PrimitiveId};
use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::geometry::BoundingSphere;
use crate::render::{
    CommandPass, CullFace, DrawCommand, FrameState, RenderBackend, RenderState, SceneMode,
};

bitflags! {
    /// Aspects of a volume awaiting regeneration
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// Boundary or radius changed
        const GEOMETRY = 1 << 0;
        /// Model matrix changed
        const TRANSFORM = 1 << 1;
        /// Material kind or depth behaviour changed
        const APPEARANCE = 1 << 2;
    }
}

/// A renderable sensor volume
#[derive(Debug)]
pub struct SensorVolume {
    id: PrimitiveId,
    owner: Option<EntityId>,

    show: bool,
    radius: f64,
    far_radius: f64,
    model_matrix: Mat4,
    boundary: BoundaryPolygon,
    material: Material,
    show_intersection: bool,
    intersection_color: Color,
    intersection_width: f64,
    show_through_ellipsoid: bool,

    dirty: DirtyFlags,
    mesh: Option<VolumeMesh>,
    geometry: Option<GeometryHandle>,
    bounds_matrix: Option<Mat4>,
    render_state: Option<RenderState>,
    geometry_rebuilds: u64,
    pipeline_rebuilds: u64,
    destroyed: bool,
}

impl SensorVolume {
    /// Register a new volume with the backend
    ///
    /// The volume starts shown, with an infinite radius, an identity
    /// transform and an empty boundary, so it draws nothing until a
    /// boundary is set.
    pub fn create(backend: &mut dyn RenderBackend, material: Material) -> Self {
        let id = backend.add_primitive();
        log::debug!("Created sensor volume {id:?}");
        Self {
            id,
            owner: None,
            show: true,
            radius: f64::INFINITY,
            far_radius: FAR_RADIUS,
            model_matrix: Mat4::identity(),
            boundary: BoundaryPolygon::empty(),
            material,
            show_intersection: true,
            intersection_color: Color::WHITE,
            intersection_width: 1.0,
            show_through_ellipsoid: false,
            dirty: DirtyFlags::all(),
            mesh: None,
            geometry: None,
            bounds_matrix: None,
            render_state: None,
            geometry_rebuilds: 0,
            pipeline_rebuilds: 0,
            destroyed: false,
        }
    }

    /// Set the entity reported by pick commands
    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the distance that replaces an infinite radius
    pub fn with_far_radius(mut self, far_radius: f64) -> Self {
        self.far_radius = far_radius;
        self
    }

    /// Backend id
    pub fn id(&self) -> PrimitiveId {
        self.id
    }

    /// Entity this volume visualizes
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Whether the volume is drawn
    pub fn show(&self) -> bool {
        self.show
    }

    /// Show or hide the volume
    ///
    /// Hidden volumes skip all work in [`update`](Self::update), including
    /// pending rebuilds.
    pub fn set_show(&mut self, show: bool) {
        self.show = show;
    }

    /// Configured radius, possibly infinite
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radius the mesh is built at; infinity maps to the far radius
    pub fn effective_radius(&self) -> f64 {
        if self.radius.is_finite() {
            self.radius
        } else {
            self.far_radius
        }
    }

    /// Set the radius, rejecting negative and NaN values
    pub fn set_radius(&mut self, radius: f64) -> SensorResult<()> {
        let radius = validate_radius(radius)?;
        if radius != self.radius {
            self.radius = radius;
            self.dirty |= DirtyFlags::GEOMETRY;
        }
        Ok(())
    }

    /// Current boundary
    pub fn boundary(&self) -> &BoundaryPolygon {
        &self.boundary
    }

    /// Set the boundary, rejecting polygons with fewer than three usable directions
    pub fn set_boundary(&mut self, boundary: BoundaryPolygon) -> SensorResult<()> {
        boundary.validate()?;
        if boundary != self.boundary {
            self.boundary = boundary;
            self.dirty |= DirtyFlags::GEOMETRY;
        }
        Ok(())
    }

    /// Drop the boundary so the volume draws nothing
    pub fn clear_boundary(&mut self) {
        if !self.boundary.is_empty() {
            self.boundary = BoundaryPolygon::empty();
            self.dirty |= DirtyFlags::GEOMETRY;
        }
    }

    /// Model-to-world transform
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    /// Set the model-to-world transform
    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        if model_matrix != self.model_matrix {
            self.model_matrix = model_matrix;
            self.dirty |= DirtyFlags::TRANSFORM;
        }
    }

    /// Surface material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Set the surface material
    ///
    /// Only an identity change schedules a pipeline rebuild; new uniform
    /// values under the same identity are picked up by the next command.
    pub fn set_material(&mut self, material: Material) {
        if material.id != self.material.id {
            self.dirty |= DirtyFlags::APPEARANCE;
        }
        self.material = material;
    }

    /// Whether the surface blends, derived from the material
    pub fn is_translucent(&self) -> bool {
        self.material.is_translucent()
    }

    /// Whether outlines are drawn
    pub fn show_intersection(&self) -> bool {
        self.show_intersection
    }

    /// Toggle ellipsoid and radius outlines
    pub fn set_show_intersection(&mut self, show: bool) {
        self.show_intersection = show;
    }

    /// Outline color
    pub fn intersection_color(&self) -> Color {
        self.intersection_color
    }

    /// Set the outline color
    pub fn set_intersection_color(&mut self, color: Color) {
        self.intersection_color = color;
    }

    /// Outline width in pixels
    pub fn intersection_width(&self) -> f64 {
        self.intersection_width
    }

    /// Set the outline width, rejecting negative and NaN values
    pub fn set_intersection_width(&mut self, width: f64) -> SensorResult<()> {
        self.intersection_width = validate_width(width)?;
        Ok(())
    }

    /// Whether parts behind the ellipsoid stay visible
    pub fn show_through_ellipsoid(&self) -> bool {
        self.show_through_ellipsoid
    }

    /// Show parts behind the ellipsoid
    pub fn set_show_through_ellipsoid(&mut self, show: bool) {
        if show != self.show_through_ellipsoid {
            self.show_through_ellipsoid = show;
            self.dirty |= DirtyFlags::APPEARANCE;
        }
    }

    /// Aspects awaiting regeneration
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Current mesh, absent until built or when the boundary is unusable
    pub fn mesh(&self) -> Option<&VolumeMesh> {
        self.mesh.as_ref()
    }

    /// World-space bounds of the current mesh
    pub fn world_bounding_sphere(&self) -> Option<BoundingSphere> {
        self.mesh.as_ref().map(VolumeMesh::world_bounding_sphere)
    }

    /// Live vertex buffer handle
    pub fn geometry_handle(&self) -> Option<GeometryHandle> {
        self.geometry
    }

    /// Number of geometry rebuilds so far
    pub fn geometry_rebuilds(&self) -> u64 {
        self.geometry_rebuilds
    }

    /// Number of pipeline rebuilds so far
    pub fn pipeline_rebuilds(&self) -> u64 {
        self.pipeline_rebuilds
    }

    /// Apex position in world space
    pub fn apex(&self) -> Vec3 {
        self.model_matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Mesh boundary vertices in world space, empty without a mesh
    pub fn world_vertices(&self) -> Vec<Vec3> {
        self.mesh.as_ref().map_or_else(Vec::new, |mesh| {
            mesh.positions()
                .iter()
                .map(|p| self.model_matrix.transform_point(&Point3::from(*p)).coords)
                .collect()
        })
    }

    /// Per-point classification inputs for this volume
    ///
    /// The configured radius is used as is, so an infinite radius never
    /// cuts points.
    pub fn outline_params(&self) -> OutlineParams {
        OutlineParams {
            radius: self.radius,
            show_through_ellipsoid: self.show_through_ellipsoid,
            show_intersection: self.show_intersection,
            intersection_width: self.intersection_width,
            ..OutlineParams::default()
        }
    }

    /// Classify a world-space surface point as seen from this volume's apex
    pub fn classify_point(&self, classifier: &ShadowClassifier, point: &Vec3) -> SurfaceClass {
        classifier.classify(&self.apex(), point, &self.outline_params())
    }

    /// Whether [`destroy`](Self::destroy) has run
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Regenerate dirty state and emit this frame's draw commands
    ///
    /// Does nothing unless the volume is shown and the scene is 3D. A
    /// boundary with fewer than three usable directions produces no mesh
    /// and no commands.
    pub fn update(
        &mut self,
        frame: &FrameState,
        backend: &mut dyn RenderBackend,
        commands: &mut Vec<DrawCommand>,
    ) -> SensorResult<()> {
        if self.destroyed || !self.show || frame.mode != SceneMode::Scene3D {
            return Ok(());
        }

        if self.dirty.contains(DirtyFlags::GEOMETRY) {
            self.rebuild_geometry(backend)?;
            self.dirty.remove(DirtyFlags::GEOMETRY);
        }

        let Some(mesh) = self.mesh.as_mut() else {
            return Ok(());
        };

        if self.bounds_matrix.as_ref() != Some(&self.model_matrix) {
            mesh.update_world_bounds(&self.model_matrix);
            self.bounds_matrix = Some(self.model_matrix);
        }
        self.dirty.remove(DirtyFlags::TRANSFORM);
        let vertex_count = mesh.vertex_count();
        let bounding_sphere = mesh.world_bounding_sphere();

        let render_state = RenderState::for_volume(self.is_translucent(), self.show_through_ellipsoid);
        if self.dirty.contains(DirtyFlags::APPEARANCE) || self.render_state != Some(render_state) {
            backend.rebuild_pipeline(self.id, &self.material, &render_state)?;
            self.render_state = Some(render_state);
            self.pipeline_rebuilds += 1;
            self.dirty.remove(DirtyFlags::APPEARANCE);
            log::trace!("Rebuilt pipeline of {:?} for material {:?}", self.id, self.material.id);
        }

        let Some(geometry) = self.geometry else {
            return Ok(());
        };

        let draw = |pass, cull| {
            self.command(pass, cull, geometry, vertex_count, bounding_sphere, render_state)
        };
        if frame.passes.render {
            if render_state.blending {
                commands.push(draw(CommandPass::Render, CullFace::Front));
            }
            commands.push(draw(CommandPass::Render, CullFace::Back));
        }
        if frame.passes.pick {
            commands.push(draw(CommandPass::Pick, CullFace::Back));
        }

        Ok(())
    }

    /// Release every backend resource; safe to call more than once
    pub fn destroy(&mut self, backend: &mut dyn RenderBackend) {
        if self.destroyed {
            return;
        }
        self.release_geometry(backend);
        self.mesh = None;
        if let Err(err) = backend.remove_primitive(self.id) {
            log::warn!("Failed to remove sensor volume {:?}: {err}", self.id);
        }
        self.destroyed = true;
        log::debug!("Destroyed sensor volume {:?}", self.id);
    }

    fn rebuild_geometry(&mut self, backend: &mut dyn RenderBackend) -> SensorResult<()> {
        self.release_geometry(backend);
        self.mesh = None;
        self.bounds_matrix = None;
        self.geometry_rebuilds += 1;

        let Some(mesh) = build_mesh(&self.boundary, self.effective_radius()) else {
            log::debug!(
                "Sensor volume {:?} has {} usable directions, drawing nothing",
                self.id,
                self.boundary.usable_count()
            );
            return Ok(());
        };

        let vertices = mesh.interleaved_vertices();
        let handle = backend.upload_geometry(self.id, bytemuck::cast_slice(&vertices), mesh.vertex_count())?;
        log::debug!(
            "Rebuilt sensor volume {:?}: {} faces at radius {}",
            self.id,
            mesh.triangle_count(),
            self.effective_radius()
        );
        self.geometry = Some(handle);
        self.mesh = Some(mesh);
        Ok(())
    }

    fn release_geometry(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(handle) = self.geometry.take() {
            if let Err(err) = backend.release_geometry(handle) {
                log::warn!("Failed to release geometry of {:?}: {err}", self.id);
            }
        }
    }

    fn command(
        &self,
        pass: CommandPass,
        cull: CullFace,
        geometry: GeometryHandle,
        vertex_count: usize,
        bounding_sphere: BoundingSphere,
        render_state: RenderState,
    ) -> DrawCommand {
        DrawCommand {
            primitive: self.id,
            owner: self.owner,
            pass,
            cull,
            geometry,
            vertex_count,
            model_matrix: self.model_matrix,
            bounding_sphere,
            material: self.material.id,
            render_state,
            radius: self.effective_radius(),
            show_intersection: self.show_intersection,
            intersection_color: self.intersection_color,
            intersection_width: self.intersection_width,
            show_through_ellipsoid: self.show_through_ellipsoid,
        }
    }
}
