//! Ambient background layer.
//!
//! Ambient particles are created once at startup, scattered across the
//! viewport, and animated only by a looping [`FloatAnimation`] the surface
//! plays on its own. They never enter the simulated collection, so physics,
//! expiry and cap eviction do not touch them.

use stardust_common::{Color, ElementHandle, Vec2, Viewport};
use tracing::debug;

use crate::settings::Range;
use crate::surface::{ElementClass, ElementSpec, PresentationSurface, Transform};

/// Size range of ambient particles in pixels.
pub const AMBIENT_SIZE: Range = Range::new(0.5, 2.5);

/// Opacity range of ambient particles.
pub const AMBIENT_OPACITY: Range = Range::new(0.1, 0.6);

/// Period range of the float loop in seconds.
pub const AMBIENT_PERIOD_SECS: Range = Range::new(20.0, 50.0);

/// Peak displacement of the float loop.
pub const FLOAT_OFFSET: Vec2 = Vec2::new(10.0, -10.0);

/// Fill color of ambient particles.
pub const AMBIENT_COLOR: Color = Color::WHITE;

/// A declarative, infinitely repeating translation loop.
///
/// Keyframes: rest at 0%, `offset` at 50%, rest again at 100%, each half
/// eased in and out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatAnimation {
    /// Duration of one loop in seconds.
    pub period_secs: f32,
    /// Displacement at the midpoint of the loop.
    pub offset: Vec2,
}

impl FloatAnimation {
    /// Creates a float loop with the standard offset.
    #[must_use]
    pub const fn new(period_secs: f32) -> Self {
        Self {
            period_secs,
            offset: FLOAT_OFFSET,
        }
    }

    /// Displacement at `elapsed_secs` since the animation started.
    #[must_use]
    pub fn offset_at(&self, elapsed_secs: f32) -> Vec2 {
        if self.period_secs <= 0.0 {
            return Vec2::ZERO;
        }
        let phase = (elapsed_secs / self.period_secs).rem_euclid(1.0);
        let t = if phase < 0.5 {
            phase * 2.0
        } else {
            (1.0 - phase) * 2.0
        };
        self.offset * ease_in_out(t)
    }

    /// CSS animation shorthand, as a web surface would apply it.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("float {}s infinite ease-in-out", self.period_secs)
    }
}

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// A background particle attached to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientParticle {
    /// Resting position (top-left corner) in viewport pixels.
    pub position: Vec2,
    /// Size in pixels.
    pub size: f32,
    /// Fixed opacity.
    pub opacity: f32,
    /// Float loop played by the surface.
    pub animation: FloatAnimation,
    handle: ElementHandle,
}

impl AmbientParticle {
    /// Handle of the presentation element.
    #[must_use]
    pub const fn handle(&self) -> ElementHandle {
        self.handle
    }
}

/// Samples one ambient particle's properties.
fn sample(rng: &mut fastrand::Rng, viewport: Viewport) -> (Vec2, f32, f32, FloatAnimation) {
    let size = AMBIENT_SIZE.sample(rng);
    let position = viewport.from_unit(rng.f32(), rng.f32());
    let opacity = AMBIENT_OPACITY.sample(rng);
    let animation = FloatAnimation::new(AMBIENT_PERIOD_SECS.sample(rng));
    (position, size, opacity, animation)
}

/// Creates `count` ambient particles scattered over the surface's viewport.
pub fn spawn_layer<S: PresentationSurface + ?Sized>(
    surface: &mut S,
    rng: &mut fastrand::Rng,
    count: usize,
) -> Vec<AmbientParticle> {
    let viewport = surface.viewport();
    let layer: Vec<AmbientParticle> = (0..count)
        .map(|_| {
            let (position, size, opacity, animation) = sample(rng, viewport);
            let handle = surface.create_element(&ElementSpec {
                class: ElementClass::Background,
                size,
                color: AMBIENT_COLOR,
                glow: None,
                opacity,
                transform: Transform::translate(position),
                animation: Some(animation),
            });
            AmbientParticle {
                position,
                size,
                opacity,
                animation,
                handle,
            }
        })
        .collect();

    debug!(
        "Spawned {} ambient particles over {}x{} viewport",
        layer.len(),
        viewport.width,
        viewport.height
    );
    layer
}
