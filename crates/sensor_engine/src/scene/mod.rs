//! # Scene Substrate
//!
//! The entity model the synchronizers read from. Entities hold
//! time-sampled [`Property`] slots for their pose and any attached sensor
//! graphics; the [`EntityCollection`] stores them and reports what changed
//! between observations.

pub mod property;
pub mod graphics;
pub mod entity;
pub mod collection;

pub use property::{
    constant, value_of, value_or, ConstantProperty, Interpolate, Property, PropertySlot,
    SampledProperty, TimeIntervalCollectionProperty,
};
pub use graphics::{
    ConicShape, ConicSensorGraphics, CustomPatternSensorGraphics, CustomPatternShape,
    RectangularSensorGraphics, RectangularShape, SensorGraphics,
};
pub use entity::Entity;
pub use collection::{ChangeSet, EntityCollection, SceneError};
