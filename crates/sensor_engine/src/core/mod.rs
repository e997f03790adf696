//! # Core Engine Module
//!
//! Shared configuration that every sensor subsystem reads at construction
//! time. Nothing here is consulted per tick.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for sampling, meshing, occlusion and defaults

pub mod config;

pub use config::{
    SensorEngineConfig,
    SamplingConfig,
    VolumeConfig,
    EllipsoidConfig,
    OutlineConfig,
    SensorDefaults,
};
pub use crate::config::{Config, ConfigError, ConfigFormat};
