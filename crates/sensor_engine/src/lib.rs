//! # Sensor Engine
//!
//! Sensor volume visualization for globe scenes.
//!
//! ## Features
//!
//! - **Boundary Sampling**: Conic, rectangular and custom-pattern footprints as direction polygons
//! - **Volume Meshing**: Closed triangle meshes with flat-shaded normals and bounding spheres
//! - **Horizon Occlusion**: Per-point classification against the reference ellipsoid
//! - **Entity Synchronization**: Diff-driven volume updates from a time-sampled scene
//! - **Scene Ingestion**: JSON sensor packets with constant and interval-qualified values
//!
//! ## Quick Start
//!
//! ```rust
//! use sensor_engine::prelude::*;
//!
//! let config = SensorEngineConfig::default();
//! let mut backend = HeadlessBackend::new();
//! let mut collection = EntityCollection::new();
//! let mut visualizers = SensorVisualizers::new(&config);
//!
//! let document = r#"[{
//!     "id": "sat-1",
//!     "position": [7000000.0, 0.0, 0.0],
//!     "orientation": [0.0, 0.0, 0.0, 1.0],
//!     "conicSensor": { "outerHalfAngle": 0.5, "radius": 1000.0 }
//! }]"#;
//! let report = ingest_document(document, &mut collection)?;
//! assert_eq!(report.applied.len(), 1);
//!
//! let mut commands = Vec::new();
//! let stats = visualizers.update(
//!     &mut collection,
//!     JulianDate(0.0),
//!     &FrameState::scene_3d(1),
//!     &mut backend,
//!     &mut commands,
//! );
//! assert_eq!(stats.visible, 1);
//! assert!(!commands.is_empty());
//!
//! visualizers.destroy(&mut backend);
//! # Ok::<(), IngestError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared configuration
pub mod core;

pub mod foundation;
pub mod config;
pub mod geometry;
pub mod sensors;
pub mod render;
pub mod scene;
pub mod sync;
pub mod ingest;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::{SensorEngineConfig, SensorDefaults},
        config::Config,
        foundation::{
            collections::{EntityId, GeometryHandle, PrimitiveId},
            math::{Vec3, Mat4, Quat},
            time::{JulianDate, TimeInterval},
        },
        geometry::{BoundingSphere, Ellipsoid},
        sensors::{
            BoundaryPolygon, BoundarySampler, Color, Direction, DirectionEncoding, MaterialSpec,
            SensorError, SensorVolume, ShadowClassifier,
        },
        render::{DrawCommand, FrameState, HeadlessBackend, RenderBackend},
        scene::{constant, Entity, EntityCollection, Property, SensorGraphics},
        sync::{SensorVisualizers, SyncStats},
        ingest::{ingest_document, IngestError, SensorPacket},
    };
}
