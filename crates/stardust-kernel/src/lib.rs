//! # Stardust Kernel
//!
//! Cursor-trail particle field simulation.
//!
//! This crate provides the whole visual effect:
//! - Particle field simulator with trail, pulse and explosion spawn paths
//! - Per-frame physics (gravity, noise, Euler integration) and fading
//! - FIFO population cap
//! - Ambient background layer with declarative float animation
//! - Presentation surface seam and an in-memory retained surface
//! - Fixed-interval timers for pulse and refresh cadence
//! - PNG snapshot rasterization
//!
//! ## Architecture
//!
//! The simulator owns its particles and talks to the outside world only
//! through a [`PresentationSurface`]: it creates an element per particle,
//! pushes transform and opacity every frame, destroys the element when the
//! particle goes, and asks the surface for the next refresh callback.
//!
//! ## Frame Loop
//!
//! There is no timer inside the kernel. [`ParticleField::start`] requests a
//! refresh; the driver calls [`ParticleField::on_refresh`] when the surface
//! delivers it, which runs one pass and requests the next. Halting simply
//! stops the re-request.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ambient;
pub mod field;
pub mod particle;
pub mod raster;
pub mod schedule;
pub mod settings;
pub mod spawn;
pub mod surface;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ambient::*;
    pub use crate::field::*;
    pub use crate::particle::*;
    pub use crate::raster::*;
    pub use crate::schedule::*;
    pub use crate::settings::*;
    pub use crate::spawn::*;
    pub use crate::surface::*;
}

pub use prelude::*;
