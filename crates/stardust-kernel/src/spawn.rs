//! Spawn paths for simulated particles.
//!
//! Everything here is pure sampling: it turns settings, a position and an
//! RNG into [`Blueprint`]s. The field turns blueprints into live particles
//! once the surface has created their elements.

use std::f32::consts::TAU;

use stardust_common::{Color, Vec2};

use crate::particle::{ParticleKind, Spin};
use crate::settings::{FieldSettings, Range};
use crate::surface::{ElementSpec, Glow, Transform};

/// Initial opacity range of trail and pulse particles.
pub const SPARKLE_OPACITY: Range = Range::new(0.7, 1.0);

/// Initial angle range of spinning particles, in degrees.
pub const SPIN_ANGLE: Range = Range::new(0.0, 360.0);

/// Rotation speed range of spinning particles, in degrees per frame.
pub const SPIN_SPEED: Range = Range::new(-1.5, 1.5);

/// A sampled particle that has no presentation element yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Spawn path.
    pub kind: ParticleKind,
    /// Spawn position.
    pub position: Vec2,
    /// Initial velocity.
    pub velocity: Vec2,
    /// Size in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// Whether the element glows.
    pub glow: bool,
    /// Life in milliseconds.
    pub life: f32,
    /// Opacity at spawn.
    pub initial_opacity: f32,
    /// Rotation state for spinning particles.
    pub spin: Option<Spin>,
}

impl Blueprint {
    /// Element description handed to the surface.
    #[must_use]
    pub fn element_spec(&self) -> ElementSpec {
        let transform = Transform::translate(self.position);
        ElementSpec {
            class: self.kind.element_class(),
            size: self.size,
            color: self.color,
            glow: self.glow.then(|| Glow::for_particle(self.size, self.color)),
            opacity: self.initial_opacity,
            transform: match self.spin {
                Some(spin) => transform.with_rotation(spin.angle),
                None => transform,
            },
            animation: None,
        }
    }
}

/// Velocity with a uniformly random direction and the given speed.
pub fn polar(rng: &mut fastrand::Rng, speed: f32) -> Vec2 {
    Vec2::from_angle(rng.f32() * TAU) * speed
}

/// Uniform noise in `[-magnitude / 2, magnitude / 2)` on each axis.
pub fn noise(rng: &mut fastrand::Rng, magnitude: f32) -> Vec2 {
    Vec2::new(
        (rng.f32() - 0.5) * magnitude,
        (rng.f32() - 0.5) * magnitude,
    )
}

fn roll_spin(settings: &FieldSettings, rng: &mut fastrand::Rng) -> Option<Spin> {
    (rng.f32() < settings.rotation_chance).then(|| Spin {
        angle: SPIN_ANGLE.sample(rng),
        speed: SPIN_SPEED.sample(rng),
    })
}

/// Number of trail particles for a move covering `distance` pixels.
///
/// `ceil(distance / 2) * per_frame`, capped at `max`.
#[must_use]
pub fn trail_count(distance: f32, per_frame: u32, max: usize) -> usize {
    let steps = (distance.max(0.0) / 2.0).ceil() as usize;
    steps.saturating_mul(per_frame as usize).min(max)
}

/// `count` evenly spaced points from `from` towards `to`; point `i` sits at
/// ratio `i / count`, so `to` itself is never included.
pub fn trail_points(from: Vec2, to: Vec2, count: usize) -> impl Iterator<Item = Vec2> {
    (0..count).map(move |i| from.lerp(to, i as f32 / count as f32))
}

/// Samples a trail or pulse particle at `position`.
pub fn sparkle(
    settings: &FieldSettings,
    rng: &mut fastrand::Rng,
    kind: ParticleKind,
    position: Vec2,
) -> Blueprint {
    let size = settings.particle_size.sample(rng);
    let color = settings.pick_color(rng);
    let speed = rng.f32() * settings.dispersion;
    let velocity = polar(rng, speed);
    let glow = rng.f32() < settings.glow_chance;
    let initial_opacity = SPARKLE_OPACITY.sample(rng);
    let spin = roll_spin(settings, rng);

    Blueprint {
        kind,
        position,
        velocity,
        size,
        color,
        glow,
        life: settings.particle_lifespan,
        initial_opacity,
        spin,
    }
}

/// Samples a click explosion shard at `position`.
pub fn shard(settings: &FieldSettings, rng: &mut fastrand::Rng, position: Vec2) -> Blueprint {
    let explosion = &settings.explosion;
    let size = explosion.size.sample(rng);
    let speed = rng.f32() * explosion.speed_spread + explosion.base_speed;
    let velocity = polar(rng, speed);
    let life = explosion.life_ms.sample(rng);
    let color = settings.pick_color(rng);
    let glow = rng.f32() < settings.glow_chance;
    let spin = roll_spin(settings, rng);

    Blueprint {
        kind: ParticleKind::Explosion,
        position,
        velocity,
        size,
        color,
        glow,
        life,
        initial_opacity: 1.0,
        spin,
    }
}

/// Random pulse position within `jitter` pixels of `pointer` on each axis.
pub fn pulse_position(rng: &mut fastrand::Rng, pointer: Vec2, jitter: f32) -> Vec2 {
    pointer + noise(rng, jitter * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ElementClass;

    #[test]
    fn test_trail_count_reference_case() {
        assert_eq!(trail_count(100.0, 15, 50), 50);
    }

    #[test]
    fn test_trail_count_small_moves() {
        assert_eq!(trail_count(0.0, 15, 50), 0);
        assert_eq!(trail_count(0.5, 1, 50), 1);
        assert_eq!(trail_count(3.0, 2, 50), 4);
        assert_eq!(trail_count(4.0, 2, 50), 4);
    }

    #[test]
    fn test_trail_points_even_spacing() {
        let points: Vec<Vec2> =
            trail_points(Vec2::ZERO, Vec2::new(100.0, 0.0), 50).collect();
        assert_eq!(points.len(), 50);
        for (i, p) in points.iter().enumerate() {
            assert!((p.x - i as f32 * 2.0).abs() < 1e-4);
            assert!(p.y.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_sparkle_ranges() {
        let settings = FieldSettings::default();
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..500 {
            let b = sparkle(&settings, &mut rng, ParticleKind::Trail, Vec2::ZERO);
            assert!(settings.particle_size.contains(b.size));
            assert!(b.velocity.length() <= settings.dispersion + 1e-4);
            assert!(SPARKLE_OPACITY.contains(b.initial_opacity));
            assert!((b.life - settings.particle_lifespan).abs() < f32::EPSILON);
            if let Some(spin) = b.spin {
                assert!(SPIN_ANGLE.contains(spin.angle));
                assert!(SPIN_SPEED.contains(spin.speed));
            }
        }
    }

    #[test]
    fn test_shard_ranges() {
        let settings = FieldSettings::default();
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..500 {
            let b = shard(&settings, &mut rng, Vec2::new(200.0, 300.0));
            assert_eq!(b.kind, ParticleKind::Explosion);
            assert!((1.0..3.0).contains(&b.size));
            let speed = b.velocity.length();
            assert!(speed >= 2.0 - 1e-4 && speed < 7.0 + 1e-4);
            assert!((500.0..1500.0).contains(&b.life));
            assert!((b.initial_opacity - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_glow_and_spin_probabilities() {
        let never = FieldSettings {
            glow_chance: 0.0,
            rotation_chance: 0.0,
            ..FieldSettings::default()
        };
        let always = FieldSettings {
            glow_chance: 1.0,
            rotation_chance: 1.0,
            ..FieldSettings::default()
        };
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..100 {
            let b = sparkle(&never, &mut rng, ParticleKind::Pulse, Vec2::ZERO);
            assert!(!b.glow && b.spin.is_none());
            let b = sparkle(&always, &mut rng, ParticleKind::Pulse, Vec2::ZERO);
            assert!(b.glow && b.spin.is_some());
        }
    }

    #[test]
    fn test_element_spec_from_blueprint() {
        let settings = FieldSettings {
            glow_chance: 1.0,
            rotation_chance: 1.0,
            ..FieldSettings::default()
        };
        let mut rng = fastrand::Rng::with_seed(6);
        let b = shard(&settings, &mut rng, Vec2::new(1.0, 2.0));
        let spec = b.element_spec();
        assert_eq!(spec.class, ElementClass::Explosion);
        assert_eq!(spec.transform.translate, Vec2::new(1.0, 2.0));
        assert!(spec.transform.rotate_deg.is_some());
        let glow = spec.glow.expect("glow requested");
        assert!((glow.blur - b.size * 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pulse_position_within_jitter() {
        let mut rng = fastrand::Rng::with_seed(8);
        let pointer = Vec2::new(500.0, 500.0);
        for _ in 0..1000 {
            let p = pulse_position(&mut rng, pointer, 10.0);
            assert!((490.0..=510.0).contains(&p.x));
            assert!((490.0..=510.0).contains(&p.y));
        }
    }
}
