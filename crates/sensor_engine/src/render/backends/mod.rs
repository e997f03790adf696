//! Backend implementations for the render seam
//!
//! Only a headless backend lives in this crate; device backends implement
//! [`RenderBackend`](super::RenderBackend) downstream.

/// Device-free backend with resource accounting
pub mod headless;

pub use headless::{HeadlessBackend, BackendStats};
