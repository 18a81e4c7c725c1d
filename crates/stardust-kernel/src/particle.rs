//! Simulated particle state.

use stardust_common::{Color, ElementHandle, SpawnSeq, Vec2};

use crate::surface::{ElementClass, Transform};

/// Which spawn path produced a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Interpolated along a pointer move.
    Trail,
    /// Emitted by the idle pulse timer.
    Pulse,
    /// Emitted by a click.
    Explosion,
}

impl ParticleKind {
    /// Element class used for this kind.
    #[must_use]
    pub const fn element_class(&self) -> ElementClass {
        match self {
            Self::Trail | Self::Pulse => ElementClass::Particle,
            Self::Explosion => ElementClass::Explosion,
        }
    }
}

/// Rotation state carried by the spinning subset of particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Current angle in degrees.
    pub angle: f32,
    /// Degrees added per frame.
    pub speed: f32,
}

/// A live particle in the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Insertion-order tag.
    pub seq: SpawnSeq,
    /// Spawn path.
    pub kind: ParticleKind,
    /// Top-left corner in viewport pixels.
    pub position: Vec2,
    /// Pixels per frame.
    pub velocity: Vec2,
    /// Size in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// Whether the element glows.
    pub glow: bool,
    /// Remaining life in milliseconds.
    pub life: f32,
    /// Opacity at spawn.
    pub initial_opacity: f32,
    /// Current opacity.
    pub opacity: f32,
    /// Rotation state, if the particle spins.
    pub spin: Option<Spin>,
    pub(crate) handle: ElementHandle,
}

impl Particle {
    /// Handle of the presentation element this particle owns.
    #[must_use]
    pub const fn handle(&self) -> ElementHandle {
        self.handle
    }

    /// Whether the particle still has life left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// One Euler step: gravity, per-frame noise, position, rotation.
    pub fn integrate(&mut self, gravity: f32, noise: Vec2) {
        self.velocity.y += gravity;
        self.velocity += noise;
        self.position += self.velocity;
        if let Some(spin) = &mut self.spin {
            spin.angle += spin.speed;
        }
    }

    /// Burns `decrement_ms` of life and recomputes opacity against `lifespan_ms`.
    ///
    /// Opacity stays within `[0, initial_opacity]`.
    pub fn age(&mut self, decrement_ms: f32, lifespan_ms: f32) {
        self.life -= decrement_ms;
        self.opacity = (self.life / lifespan_ms * self.initial_opacity)
            .clamp(0.0, self.initial_opacity);
    }

    /// Current placement, rotated when the particle spins.
    #[must_use]
    pub fn transform(&self) -> Transform {
        let transform = Transform::translate(self.position);
        match self.spin {
            Some(spin) => transform.with_rotation(spin.angle),
            None => transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> Particle {
        Particle {
            seq: SpawnSeq::FIRST,
            kind: ParticleKind::Trail,
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::new(1.0, 0.0),
            size: 2.0,
            color: Color::WHITE,
            glow: false,
            life: 5000.0,
            initial_opacity: 0.8,
            opacity: 0.8,
            spin: None,
            handle: ElementHandle::from_raw(1),
        }
    }

    #[test]
    fn test_integrate_applies_gravity_then_moves() {
        let mut p = particle();
        p.integrate(0.5, Vec2::ZERO);
        assert_eq!(p.velocity, Vec2::new(1.0, 0.5));
        assert_eq!(p.position, Vec2::new(11.0, 10.5));
    }

    #[test]
    fn test_integrate_adds_noise() {
        let mut p = particle();
        p.integrate(0.0, Vec2::new(-0.1, 0.1));
        assert!((p.velocity.x - 0.9).abs() < 1e-6);
        assert!((p.velocity.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_spin_advances() {
        let mut p = particle();
        p.spin = Some(Spin {
            angle: 90.0,
            speed: 1.5,
        });
        p.integrate(0.0, Vec2::ZERO);
        assert_eq!(p.transform().rotate_deg, Some(91.5));

        let plain = particle();
        assert_eq!(plain.transform().rotate_deg, None);
    }

    #[test]
    fn test_age_fades_linearly() {
        let mut p = particle();
        p.age(2500.0, 5000.0);
        assert!((p.life - 2500.0).abs() < f32::EPSILON);
        assert!((p.opacity - 0.4).abs() < 1e-6);
        assert!(p.is_alive());

        p.age(3000.0, 5000.0);
        assert!(!p.is_alive());
        assert!(p.opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_age_never_exceeds_initial_opacity() {
        let mut p = particle();
        p.life = 9000.0;
        p.age(16.0, 5000.0);
        assert!((p.opacity - p.initial_opacity).abs() < f32::EPSILON);
    }

    #[test]
    fn test_kind_classes() {
        assert_eq!(ParticleKind::Pulse.element_class(), ElementClass::Particle);
        assert_eq!(
            ParticleKind::Explosion.element_class(),
            ElementClass::Explosion
        );
    }
}
