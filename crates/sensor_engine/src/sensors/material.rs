//! Sensor surface materials
//!
//! A [`MaterialSpec`] is the value an entity property resolves to each tick.
//! A [`Material`] pairs a spec with a [`MaterialId`] identity. Identity only
//! changes when the material *kind* changes, because only then does the
//! render backend need a different pipeline; a new color on the same kind is
//! a uniform update.

use serde::{Serialize, Deserialize};

use crate::foundation::collections::Generation;

/// RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    /// Opaque red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from an `[r, g, b, a]` array
    pub const fn from_array(rgba: [f32; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Components as an array
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether the color is not fully opaque
    pub fn is_translucent(&self) -> bool {
        self.a < 1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Material kinds a sensor surface can use
///
/// Serialized externally tagged in camel case, e.g. `{"color": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialSpec {
    /// Single solid color
    Color(Color),
    /// Alternating bands
    Stripe {
        /// Color of even bands
        even: Color,
        /// Color of odd bands
        odd: Color,
        /// Number of band pairs across the surface
        repeat: f32,
    },
    /// Grid lines over a translucent fill
    Grid {
        /// Line color
        color: Color,
        /// Alpha multiplier of the cells between lines
        #[serde(rename = "cellAlpha")]
        cell_alpha: f32,
        /// Number of lines along each axis
        #[serde(rename = "lineCount")]
        line_count: [u32; 2],
        /// Line thickness in pixels along each axis
        #[serde(rename = "lineThickness")]
        line_thickness: [f32; 2],
    },
}

impl MaterialSpec {
    /// Whether the material needs blending
    pub fn is_translucent(&self) -> bool {
        match self {
            Self::Color(color) => color.is_translucent(),
            Self::Stripe { even, odd, .. } => even.is_translucent() || odd.is_translucent(),
            Self::Grid { color, cell_alpha, .. } => color.is_translucent() || *cell_alpha < 1.0,
        }
    }

    /// Whether two specs are the same kind and so share a pipeline
    pub fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Short kind name for logging
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Color(_) => "Color",
            Self::Stripe { .. } => "Stripe",
            Self::Grid { .. } => "Grid",
        }
    }
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self::Color(Color::new(1.0, 0.0, 0.0, 0.5))
    }
}

/// Unique identifier for materials; 0 means "no material"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub u64);

/// Material resource bound to a sensor surface
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Identity used for pipeline change detection
    pub id: MaterialId,
    /// Kind and uniform values
    pub spec: MaterialSpec,
}

impl Material {
    /// Whether the material needs blending
    pub fn is_translucent(&self) -> bool {
        self.spec.is_translucent()
    }
}

/// Outcome of pushing a resolved spec onto an existing material
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialUpdate {
    /// Nothing changed
    Unchanged,
    /// Same kind with new uniform values; identity kept
    Uniforms(Material),
    /// Different kind; a fresh identity was allocated
    Replaced(Material),
}

/// Hands out material identities
#[derive(Debug, Clone, Default)]
pub struct MaterialAllocator {
    generation: Generation,
}

impl MaterialAllocator {
    /// Create an allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a material with a fresh identity
    pub fn create(&mut self, spec: MaterialSpec) -> Material {
        Material {
            id: MaterialId(self.generation.next_value()),
            spec,
        }
    }

    /// Apply a resolved spec to `current`, allocating only on a kind change
    pub fn update(&mut self, current: &Material, spec: &MaterialSpec) -> MaterialUpdate {
        if current.spec == *spec {
            MaterialUpdate::Unchanged
        } else if current.spec.same_kind(spec) {
            MaterialUpdate::Uniforms(Material {
                id: current.id,
                spec: spec.clone(),
            })
        } else {
            MaterialUpdate::Replaced(self.create(spec.clone()))
        }
    }
}
