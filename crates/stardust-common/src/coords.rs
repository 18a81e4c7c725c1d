//! Viewport coordinate types.
//!
//! All positions are in viewport pixel space: origin at the top-left corner,
//! x growing to the right and y growing downward.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Dimensions of the visible surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Checks whether a point lies inside the viewport.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width && point.y < self.height
    }

    /// Maps a unit-square point (each axis in `[0, 1)`) onto the viewport.
    #[must_use]
    pub fn from_unit(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(u * self.width, v * self.height)
    }

    /// Center of the viewport.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}
