//! Specialized collection types

pub use slotmap::{SlotMap, SecondaryMap, Key};

slotmap::new_key_type! {
    /// Stable handle of an entity inside an [`EntityCollection`](crate::scene::EntityCollection)
    pub struct EntityId;

    /// Stable handle of a geometry resource owned by a render backend
    pub struct GeometryHandle;

    /// Stable handle of a primitive registered with a render backend
    pub struct PrimitiveId;
}

/// Monotonic generation counter used to hand out identities
///
/// Values start at 1 so that 0 can stand for "no identity".
#[derive(Debug, Clone)]
pub struct Generation {
    next: u64,
}

impl Generation {
    /// Create a new counter
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next value
    pub fn next_value(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_monotonic() {
        let mut generation = Generation::new();
        let a = generation.next_value();
        let b = generation.next_value();
        assert_eq!(a, 1);
        assert!(b > a);
    }
}
