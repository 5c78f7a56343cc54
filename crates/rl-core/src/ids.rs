//! Strongly typed, zero-cost handle wrappers.
//!
//! Structures, agents and emitters are referred to by stable integer handles
//! rather than by reference, so "is this still registered" is a map lookup
//! and never an identity comparison.  All handles are `Copy + Ord + Hash`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed handle wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(Serialize, Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as an arena index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Handle of a building (producer, consumer or both) in the world arena.
    pub struct StructureId(u32);
}

typed_id! {
    /// Handle of a transport agent (delivery cart).
    pub struct AgentId(u32);
}

typed_id! {
    /// Handle of a coverage emitter registered with the coverage engine.
    pub struct EmitterId(u32);
}

typed_id! {
    /// Kind of resource moved between structures.  `u16` keeps request
    /// buckets compact; the game's resource catalogue is far smaller.
    pub struct ResourceType(u16);
}
