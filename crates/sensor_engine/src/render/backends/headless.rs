//! Headless render backend
//!
//! Tracks primitives, vertex buffers and pipeline builds in slot maps
//! without touching a device. Used by the demo binary and as the resource
//! accounting harness in tests.

use crate::foundation::collections::{GeometryHandle, PrimitiveId, SlotMap};
use crate::render::{BackendError, BackendResult, RenderBackend, RenderState};
use crate::sensors::mesher::FLOATS_PER_VERTEX;
use crate::sensors::{Material, MaterialId};

const BYTES_PER_VERTEX: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

/// Running totals of backend calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStats {
    /// Primitives registered
    pub added: u64,
    /// Primitives unregistered
    pub removed: u64,
    /// Successful geometry uploads
    pub uploads: u64,
    /// Successful geometry releases
    pub releases: u64,
    /// Releases of handles that were not live
    pub invalid_releases: u64,
    /// Pipeline rebuilds
    pub pipeline_builds: u64,
}

#[derive(Debug, Clone)]
struct PrimitiveRecord {
    material: Option<MaterialId>,
    state: Option<RenderState>,
}

#[derive(Debug, Clone)]
struct GeometryRecord {
    owner: PrimitiveId,
    vertex_count: usize,
    byte_len: usize,
}

/// Backend that records resources instead of creating them
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    primitives: SlotMap<PrimitiveId, PrimitiveRecord>,
    geometries: SlotMap<GeometryHandle, GeometryRecord>,
    stats: BackendStats,
    fail_uploads: bool,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Call totals so far
    pub fn stats(&self) -> BackendStats {
        self.stats
    }

    /// Number of registered primitives
    pub fn live_primitives(&self) -> usize {
        self.primitives.len()
    }

    /// Number of vertex buffers not yet released
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Total bytes held by live vertex buffers
    pub fn live_geometry_bytes(&self) -> usize {
        self.geometries.values().map(|g| g.byte_len).sum()
    }

    /// Vertex count of a live buffer
    pub fn geometry_vertex_count(&self, handle: GeometryHandle) -> Option<usize> {
        self.geometries.get(handle).map(|g| g.vertex_count)
    }

    /// Number of live buffers owned by a primitive
    pub fn geometries_owned_by(&self, owner: PrimitiveId) -> usize {
        self.geometries.values().filter(|g| g.owner == owner).count()
    }

    /// Render state the primitive's pipeline was last built with
    pub fn pipeline_state(&self, id: PrimitiveId) -> Option<RenderState> {
        self.primitives.get(id).and_then(|p| p.state)
    }

    /// Material the primitive's pipeline was last built for
    pub fn pipeline_material(&self, id: PrimitiveId) -> Option<MaterialId> {
        self.primitives.get(id).and_then(|p| p.material)
    }

    /// Reject every upload from now on
    pub fn set_fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }
}

impl RenderBackend for HeadlessBackend {
    fn add_primitive(&mut self) -> PrimitiveId {
        self.stats.added += 1;
        self.primitives.insert(PrimitiveRecord {
            material: None,
            state: None,
        })
    }

    fn remove_primitive(&mut self, id: PrimitiveId) -> BackendResult<()> {
        self.primitives
            .remove(id)
            .ok_or(BackendError::UnknownPrimitive(id))?;
        self.stats.removed += 1;

        let orphaned = self.geometries_owned_by(id);
        if orphaned > 0 {
            log::warn!("Primitive {id:?} removed with {orphaned} geometry buffer(s) still live");
        }
        Ok(())
    }

    fn contains_primitive(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(id)
    }

    fn upload_geometry(
        &mut self,
        owner: PrimitiveId,
        bytes: &[u8],
        vertex_count: usize,
    ) -> BackendResult<GeometryHandle> {
        if !self.primitives.contains_key(owner) {
            return Err(BackendError::UnknownPrimitive(owner));
        }
        if self.fail_uploads {
            return Err(BackendError::UploadFailed("uploads disabled".to_string()));
        }
        if bytes.len() != vertex_count * BYTES_PER_VERTEX {
            return Err(BackendError::UploadFailed(format!(
                "{} bytes do not hold {vertex_count} vertices of {BYTES_PER_VERTEX} bytes",
                bytes.len()
            )));
        }

        self.stats.uploads += 1;
        let handle = self.geometries.insert(GeometryRecord {
            owner,
            vertex_count,
            byte_len: bytes.len(),
        });
        log::trace!("Uploaded {vertex_count} vertices for {owner:?} as {handle:?}");
        Ok(handle)
    }

    fn release_geometry(&mut self, handle: GeometryHandle) -> BackendResult<()> {
        if self.geometries.remove(handle).is_some() {
            self.stats.releases += 1;
            Ok(())
        } else {
            self.stats.invalid_releases += 1;
            Err(BackendError::UnknownGeometry(handle))
        }
    }

    fn rebuild_pipeline(
        &mut self,
        owner: PrimitiveId,
        material: &Material,
        state: &RenderState,
    ) -> BackendResult<()> {
        let record = self
            .primitives
            .get_mut(owner)
            .ok_or(BackendError::UnknownPrimitive(owner))?;
        record.material = Some(material.id);
        record.state = Some(*state);
        self.stats.pipeline_builds += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{MaterialAllocator, MaterialSpec};

    #[test]
    fn test_primitive_registry() {
        let mut backend = HeadlessBackend::new();
        let id = backend.add_primitive();
        assert!(backend.contains_primitive(id));

        backend.remove_primitive(id).unwrap();
        assert!(!backend.contains_primitive(id));
        assert_eq!(backend.remove_primitive(id), Err(BackendError::UnknownPrimitive(id)));
        assert_eq!(backend.stats().added, 1);
        assert_eq!(backend.stats().removed, 1);
    }

    #[test]
    fn test_geometry_upload_and_release() {
        let mut backend = HeadlessBackend::new();
        let id = backend.add_primitive();
        let bytes = vec![0_u8; 3 * BYTES_PER_VERTEX];

        let handle = backend.upload_geometry(id, &bytes, 3).unwrap();
        assert_eq!(backend.geometry_vertex_count(handle), Some(3));
        assert_eq!(backend.live_geometry_bytes(), bytes.len());

        backend.release_geometry(handle).unwrap();
        assert_eq!(backend.release_geometry(handle), Err(BackendError::UnknownGeometry(handle)));
        assert_eq!(backend.stats().releases, 1);
        assert_eq!(backend.stats().invalid_releases, 1);
        assert_eq!(backend.live_geometries(), 0);
    }

    #[test]
    fn test_upload_rejects_bad_input() {
        let mut backend = HeadlessBackend::new();
        let id = backend.add_primitive();

        assert!(matches!(
            backend.upload_geometry(id, &[0_u8; 10], 3),
            Err(BackendError::UploadFailed(_))
        ));

        backend.set_fail_uploads(true);
        let bytes = vec![0_u8; BYTES_PER_VERTEX];
        assert!(backend.upload_geometry(id, &bytes, 1).is_err());

        backend.remove_primitive(id).unwrap();
        backend.set_fail_uploads(false);
        assert_eq!(
            backend.upload_geometry(id, &bytes, 1),
            Err(BackendError::UnknownPrimitive(id))
        );
    }

    #[test]
    fn test_pipeline_rebuild_records_state() {
        let mut backend = HeadlessBackend::new();
        let id = backend.add_primitive();
        let material = MaterialAllocator::new().create(MaterialSpec::default());
        let state = RenderState::for_volume(true, false);

        backend.rebuild_pipeline(id, &material, &state).unwrap();
        assert_eq!(backend.pipeline_state(id), Some(state));
        assert_eq!(backend.pipeline_material(id), Some(material.id));
        assert_eq!(backend.stats().pipeline_builds, 1);
    }
}
