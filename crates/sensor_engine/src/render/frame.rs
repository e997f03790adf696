//! Per-frame state handed to sensor volumes

/// Projection mode of the scene being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    /// Full 3D globe view; the only mode sensor volumes draw in
    #[default]
    Scene3D,
    /// Flat 2D map
    Scene2D,
    /// 2.5D Columbus view
    ColumbusView,
    /// Transition between modes
    Morphing,
}

/// Which passes this frame renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePasses {
    /// Color pass
    pub render: bool,
    /// Picking pass
    pub pick: bool,
}

impl Default for FramePasses {
    fn default() -> Self {
        Self {
            render: true,
            pick: false,
        }
    }
}

/// Frame description passed to every volume update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameState {
    /// Scene projection mode
    pub mode: SceneMode,
    /// Requested passes
    pub passes: FramePasses,
    /// Monotonic frame counter
    pub frame_number: u64,
}

impl FrameState {
    /// A 3D color-pass frame
    pub fn scene_3d(frame_number: u64) -> Self {
        Self {
            mode: SceneMode::Scene3D,
            passes: FramePasses::default(),
            frame_number,
        }
    }

    /// Enable the picking pass
    pub fn with_pick(mut self) -> Self {
        self.passes.pick = true;
        self
    }

    /// Use another scene mode
    pub fn with_mode(mut self, mode: SceneMode) -> Self {
        self.mode = mode;
        self
    }
}
