//! # Rendering Seam
//!
//! Sensor volumes never talk to a graphics API directly. They go through the
//! [`RenderBackend`] trait, which owns every GPU-side resource:
//!
//! - **Primitive registry**: one slot per live sensor volume
//! - **Geometry buffers**: interleaved vertex streams uploaded per rebuild
//! - **Pipelines**: rebuilt when a volume's material kind or render state changes
//!
//! Draw work leaves a volume as plain [`DrawCommand`] values, which the
//! caller hands to whatever submits frames.
//!
//! A [`HeadlessBackend`](backends::HeadlessBackend) keeps the same
//! bookkeeping without a device, for tools and tests.

pub mod backend;
pub mod commands;
pub mod frame;

/// Backend implementations
pub mod backends;

pub use backend::{RenderBackend, BackendResult};
pub use commands::{DrawCommand, CommandPass, CullFace, RenderState};
pub use frame::{FrameState, SceneMode, FramePasses};
pub use backends::{HeadlessBackend, BackendStats};

use crate::foundation::collections::{GeometryHandle, PrimitiveId};
use thiserror::Error;

/// Errors reported by render backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The primitive is not registered with this backend
    #[error("Unknown primitive: {0:?}")]
    UnknownPrimitive(PrimitiveId),

    /// The geometry handle is not live in this backend
    ///
    /// Usually a double release.
    #[error("Unknown geometry: {0:?}")]
    UnknownGeometry(GeometryHandle),

    /// A vertex upload was rejected
    #[error("Geometry upload failed: {0}")]
    UploadFailed(String),
}
