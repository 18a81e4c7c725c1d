//! ID types for presentation elements and spawned particles.

use serde::{Deserialize, Serialize};

/// Opaque handle to a visual element owned by a presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Insertion-order tag for simulated particles.
///
/// Sequence numbers are handed out by a single counter per simulator, so a
/// smaller value always means the particle was inserted earlier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpawnSeq(u64);

impl SpawnSeq {
    /// First sequence number handed out.
    pub const FIRST: Self = Self(0);

    /// Returns the current value and moves the counter forward.
    pub fn advance(&mut self) -> Self {
        let current = *self;
        self.0 += 1;
        current
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}
