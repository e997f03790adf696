//! Backend abstraction trait for sensor volume rendering

use super::{BackendError, RenderState};
use crate::foundation::collections::{GeometryHandle, PrimitiveId};
use crate::sensors::Material;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Resource owner for sensor volumes
///
/// Every resource handed out here has exactly one matching release:
/// `add_primitive` pairs with `remove_primitive`, `upload_geometry` pairs
/// with `release_geometry`. Pipelines belong to their primitive and go away
/// with it.
pub trait RenderBackend {
    /// Register a new primitive and return its id
    fn add_primitive(&mut self) -> PrimitiveId;

    /// Unregister a primitive along with its pipeline
    fn remove_primitive(&mut self, id: PrimitiveId) -> BackendResult<()>;

    /// Whether the primitive is currently registered
    fn contains_primitive(&self, id: PrimitiveId) -> bool;

    /// Upload an interleaved `position, normal` vertex stream
    ///
    /// `bytes` holds `vertex_count` vertices of six `f32` values each.
    fn upload_geometry(
        &mut self,
        owner: PrimitiveId,
        bytes: &[u8],
        vertex_count: usize,
    ) -> BackendResult<GeometryHandle>;

    /// Free a previously uploaded vertex stream
    fn release_geometry(&mut self, handle: GeometryHandle) -> BackendResult<()>;

    /// Recompile the pipeline used to draw `owner`
    fn rebuild_pipeline(
        &mut self,
        owner: PrimitiveId,
        material: &Material,
        state: &RenderState,
    ) -> BackendResult<()>;
}
