//! # Stardust Common
//!
//! Common types, utilities, and shared abstractions for Stardust.
//!
//! This crate provides foundational types used across the Stardust crates:
//! - Viewport coordinates and dimensions
//! - Handle and sequence types (ElementHandle, SpawnSeq)
//! - Colors parsed from CSS-style hex strings
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
