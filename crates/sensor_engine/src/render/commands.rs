//! Draw commands emitted by sensor volumes
//!
//! Volumes are passive producers: they hand out fully resolved commands
//! carrying pre-computed matrices and resource handles, and never submit
//! anything themselves.

use crate::foundation::collections::{EntityId, GeometryHandle, PrimitiveId};
use crate::foundation::math::Mat4;
use crate::geometry::BoundingSphere;
use crate::sensors::{Color, MaterialId};

/// Which faces the rasterizer discards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    /// Discard front faces, drawing the inside of the volume
    Front,
    /// Discard back faces, drawing the outside of the volume
    Back,
}

/// Fixed-function state a volume pipeline is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    /// Depth testing against the scene
    pub depth_test: bool,
    /// Depth buffer writes
    pub depth_write: bool,
    /// Alpha blending
    pub blending: bool,
}

impl RenderState {
    /// Derive the state for a volume
    ///
    /// Showing through the ellipsoid disables the depth test; translucent
    /// surfaces blend and leave the depth buffer untouched.
    pub fn for_volume(translucent: bool, show_through_ellipsoid: bool) -> Self {
        Self {
            depth_test: !show_through_ellipsoid,
            depth_write: !translucent,
            blending: translucent,
        }
    }
}

/// Pass a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPass {
    /// Color pass
    Render,
    /// Picking pass, resolves to the owning entity
    Pick,
}

/// One draw of one sensor volume
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Volume being drawn
    pub primitive: PrimitiveId,
    /// Entity the volume visualizes, reported by picking
    pub owner: Option<EntityId>,
    /// Target pass
    pub pass: CommandPass,
    /// Face culling for this draw
    pub cull: CullFace,
    /// Vertex stream
    pub geometry: GeometryHandle,
    /// Number of vertices to draw
    pub vertex_count: usize,
    /// Model-to-world transform
    pub model_matrix: Mat4,
    /// World-space bounds for culling
    pub bounding_sphere: BoundingSphere,
    /// Material identity selecting the pipeline
    pub material: MaterialId,
    /// Pipeline state
    pub render_state: RenderState,
    /// Effective radius, used by the fragment stage to clip the far cap
    pub radius: f64,
    /// Whether ellipsoid and radius outlines are drawn
    pub show_intersection: bool,
    /// Outline color
    pub intersection_color: Color,
    /// Outline width in pixels
    pub intersection_width: f64,
    /// Whether occluded parts stay visible
    pub show_through_ellipsoid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_state_derivation() {
        let opaque = RenderState::for_volume(false, false);
        assert!(opaque.depth_test && opaque.depth_write && !opaque.blending);

        let translucent = RenderState::for_volume(true, false);
        assert!(translucent.depth_test && !translucent.depth_write && translucent.blending);

        let through = RenderState::for_volume(false, true);
        assert!(!through.depth_test && through.depth_write);
    }
}
