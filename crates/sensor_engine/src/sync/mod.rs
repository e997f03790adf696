//! # Entity Synchronization
//!
//! Keeps sensor volumes in step with a live [`EntityCollection`].
//!
//! One [`SensorSynchronizer`] exists per [`SensorKind`]. The application
//! composes them explicitly, usually through [`SensorVisualizers`], and
//! drives them from its frame loop:
//!
//! ```rust
//! use sensor_engine::core::SensorEngineConfig;
//! use sensor_engine::foundation::time::JulianDate;
//! use sensor_engine::render::{FrameState, HeadlessBackend};
//! use sensor_engine::scene::EntityCollection;
//! use sensor_engine::sync::SensorVisualizers;
//!
//! let mut backend = HeadlessBackend::new();
//! let mut collection = EntityCollection::new();
//! let mut visualizers = SensorVisualizers::new(&SensorEngineConfig::default());
//!
//! let mut commands = Vec::new();
//! let stats = visualizers.update(
//!     &mut collection,
//!     JulianDate(0.0),
//!     &FrameState::scene_3d(0),
//!     &mut backend,
//!     &mut commands,
//! );
//! assert_eq!(stats.tracked, 0);
//! visualizers.destroy(&mut backend);
//! ```

pub mod kinds;
pub mod synchronizer;

#[cfg(test)]
mod tests;

pub use kinds::{
    ConicAngles, ConicSensor, CustomPatternSensor, RectangularAngles, RectangularSensor, SensorKind,
};
pub use synchronizer::{BoundingSphereState, SensorSynchronizer, SyncStats};

use crate::core::config::SensorEngineConfig;
use crate::foundation::collections::EntityId;
use crate::foundation::time::JulianDate;
use crate::render::{DrawCommand, FrameState, RenderBackend};
use crate::scene::EntityCollection;

/// One synchronizer per sensor kind, driven together
#[derive(Debug, Default)]
pub struct SensorVisualizers {
    conic: SensorSynchronizer<ConicSensor>,
    rectangular: SensorSynchronizer<RectangularSensor>,
    custom_pattern: SensorSynchronizer<CustomPatternSensor>,
}

impl SensorVisualizers {
    /// Create all synchronizers from one configuration
    pub fn new(config: &SensorEngineConfig) -> Self {
        Self {
            conic: SensorSynchronizer::new(config),
            rectangular: SensorSynchronizer::new(config),
            custom_pattern: SensorSynchronizer::new(config),
        }
    }

    /// Conic synchronizer
    pub fn conic(&self) -> &SensorSynchronizer<ConicSensor> {
        &self.conic
    }

    /// Rectangular synchronizer
    pub fn rectangular(&self) -> &SensorSynchronizer<RectangularSensor> {
        &self.rectangular
    }

    /// Custom pattern synchronizer
    pub fn custom_pattern(&self) -> &SensorSynchronizer<CustomPatternSensor> {
        &self.custom_pattern
    }

    /// Observe collection changes once and tick every synchronizer
    pub fn update(
        &mut self,
        collection: &mut EntityCollection,
        time: JulianDate,
        frame: &FrameState,
        backend: &mut dyn RenderBackend,
        commands: &mut Vec<DrawCommand>,
    ) -> SyncStats {
        let changes = collection.take_changes();
        let collection = &*collection;

        let mut stats = self.conic.tick(&changes, collection, time, frame, backend, commands);
        stats += self.rectangular.tick(&changes, collection, time, frame, backend, commands);
        stats += self.custom_pattern.tick(&changes, collection, time, frame, backend, commands);
        stats
    }

    /// Bounds of an entity's sensor across all kinds
    ///
    /// Known bounds win over pending ones; `Failed` only when no kind
    /// tracks the entity.
    pub fn bounding_sphere(&self, id: EntityId) -> BoundingSphereState {
        let states = [
            self.conic.bounding_sphere(id),
            self.rectangular.bounding_sphere(id),
            self.custom_pattern.bounding_sphere(id),
        ];
        if let Some(done) = states.iter().find(|s| matches!(s, BoundingSphereState::Done(_))) {
            return *done;
        }
        if states.contains(&BoundingSphereState::Pending) {
            BoundingSphereState::Pending
        } else {
            BoundingSphereState::Failed
        }
    }

    /// Number of live volumes across all kinds
    pub fn live_volumes(&self) -> usize {
        self.conic.live_volumes() + self.rectangular.live_volumes() + self.custom_pattern.live_volumes()
    }

    /// Destroy every volume of every kind
    pub fn destroy(&mut self, backend: &mut dyn RenderBackend) {
        self.conic.destroy(backend);
        self.rectangular.destroy(backend);
        self.custom_pattern.destroy(backend);
    }
}
