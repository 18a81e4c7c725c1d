//! Particle field settings.
//!
//! Static configuration loaded once before the field is built. Every struct
//! here is `#[serde(default)]`, so a configuration file only needs to name the
//! values it changes.

use serde::{Deserialize, Serialize};
use stardust_common::{Color, ConfigError};
use tracing::warn;

/// Default particles spawned per two pixels of pointer travel.
pub const DEFAULT_PARTICLES_PER_FRAME: u32 = 15;

/// Default population cap for simulated particles.
pub const DEFAULT_PARTICLE_CAP: usize = 2000;

/// Default lifespan of trail and pulse particles in milliseconds.
pub const DEFAULT_LIFESPAN_MS: f32 = 5000.0;

/// Default life removed from each particle per frame, in milliseconds.
pub const DEFAULT_FRAME_DECREMENT_MS: f32 = 16.0;

/// Default upper bound on particles spawned by a single pointer move.
pub const DEFAULT_MAX_TRAIL_PER_MOVE: usize = 50;

/// Default number of ambient background particles.
pub const DEFAULT_BACKGROUND_PARTICLES: usize = 300;

/// An inclusive-exclusive `[min, max)` range of floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a uniform sample from the range.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> f32 {
        rng.f32() * self.span() + self.min
    }

    /// Width of the range.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Checks whether a value lies in `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn ordered(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            Self::new(self.max, self.min)
        }
    }
}

/// Settings for click explosions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionSettings {
    /// Particles emitted per click
    pub count: usize,
    /// Particle size range in pixels
    pub size: Range,
    /// Speed every shard gets, in pixels per frame
    pub base_speed: f32,
    /// Random speed added on top of `base_speed`
    pub speed_spread: f32,
    /// Life range in milliseconds
    pub life_ms: Range,
}

impl Default for ExplosionSettings {
    fn default() -> Self {
        Self {
            count: 100,
            size: Range::new(1.0, 3.0),
            base_speed: 2.0,
            speed_spread: 5.0,
            life_ms: Range::new(500.0, 1500.0),
        }
    }
}

/// Configuration surface of the particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    // === Trail ===
    /// Particles spawned per two pixels of pointer travel
    pub particles_per_frame: u32,
    /// Upper bound on particles spawned by a single move event
    pub max_trail_per_move: usize,
    /// Whether pointer movement spawns a trail
    pub trail: bool,

    // === Population ===
    /// Population cap; the oldest particles are evicted above it
    pub particle_count: usize,
    /// Lifespan of trail and pulse particles in milliseconds
    pub particle_lifespan: f32,
    /// Life removed per frame in milliseconds
    pub frame_decrement_ms: f32,
    /// Fade rate; carried for compatibility, opacity follows remaining life
    pub fade_speed: f32,

    // === Appearance ===
    /// Trail and pulse particle size range in pixels
    pub particle_size: Range,
    /// Palette particles pick their color from
    pub colors: Vec<Color>,
    /// Probability that a particle glows
    pub glow_chance: f32,
    /// Probability that a particle spins
    pub rotation_chance: f32,

    // === Motion ===
    /// Downward acceleration in pixels per frame squared
    pub gravity: f32,
    /// Per-frame velocity noise magnitude
    pub randomness: f32,
    /// Maximum initial speed of trail and pulse particles
    pub dispersion: f32,

    // === Idle pulse ===
    /// Particles emitted per pulse tick
    pub pulse_count: usize,
    /// Maximum jitter from the pointer on each axis, in pixels
    pub pulse_jitter: f32,
    /// Pulse cadence in milliseconds
    pub pulse_interval_ms: u32,

    // === Other spawn paths ===
    /// Click explosion settings
    pub explosion: ExplosionSettings,
    /// Number of ambient background particles created at startup
    pub background_particles: usize,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            // Trail
            particles_per_frame: DEFAULT_PARTICLES_PER_FRAME,
            max_trail_per_move: DEFAULT_MAX_TRAIL_PER_MOVE,
            trail: true,

            // Population
            particle_count: DEFAULT_PARTICLE_CAP,
            particle_lifespan: DEFAULT_LIFESPAN_MS,
            frame_decrement_ms: DEFAULT_FRAME_DECREMENT_MS,
            fade_speed: 0.005,

            // Appearance
            particle_size: Range::new(1.0, 3.0),
            colors: vec![Color::WHITE],
            glow_chance: 0.3,
            rotation_chance: 0.2,

            // Motion
            gravity: 0.005,
            randomness: 0.2,
            dispersion: 2.0,

            // Idle pulse
            pulse_count: 8,
            pulse_jitter: 10.0,
            pulse_interval_ms: 30,

            // Other spawn paths
            explosion: ExplosionSettings::default(),
            background_particles: DEFAULT_BACKGROUND_PARTICLES,
        }
    }
}

impl FieldSettings {
    /// Replaces the palette with colors parsed from hex strings.
    pub fn with_palette(mut self, colors: &[&str]) -> Result<Self, ConfigError> {
        self.colors = colors
            .iter()
            .map(|c| c.parse())
            .collect::<Result<Vec<Color>, _>>()?;
        Ok(self)
    }

    /// Sets the population cap.
    #[must_use]
    pub const fn with_cap(mut self, cap: usize) -> Self {
        self.particle_count = cap;
        self
    }

    /// Enables or disables the movement trail.
    #[must_use]
    pub const fn with_trail(mut self, trail: bool) -> Self {
        self.trail = trail;
        self
    }

    /// Validate and clamp settings to ranges the simulation can work with.
    pub fn validate(&mut self) {
        // Population
        self.particle_count = self.particle_count.max(1);
        self.particle_lifespan = self.particle_lifespan.max(1.0);
        self.frame_decrement_ms = self.frame_decrement_ms.max(0.001);
        self.max_trail_per_move = self.max_trail_per_move.min(10_000);

        // Appearance
        self.particle_size = self.particle_size.ordered();
        self.particle_size.min = self.particle_size.min.max(0.1);
        self.glow_chance = self.glow_chance.clamp(0.0, 1.0);
        self.rotation_chance = self.rotation_chance.clamp(0.0, 1.0);
        if self.colors.is_empty() {
            warn!("Empty color palette, falling back to white");
            self.colors.push(Color::WHITE);
        }

        // Motion
        self.randomness = self.randomness.max(0.0);
        self.dispersion = self.dispersion.max(0.0);

        // Pulse
        self.pulse_jitter = self.pulse_jitter.max(0.0);
        self.pulse_interval_ms = self.pulse_interval_ms.max(1);

        // Explosion
        self.explosion.size = self.explosion.size.ordered();
        self.explosion.size.min = self.explosion.size.min.max(0.1);
        self.explosion.life_ms = self.explosion.life_ms.ordered();
        self.explosion.life_ms.min = self.explosion.life_ms.min.max(1.0);
        self.explosion.speed_spread = self.explosion.speed_spread.max(0.0);
    }

    /// Picks a palette color uniformly at random.
    pub fn pick_color(&self, rng: &mut fastrand::Rng) -> Color {
        if self.colors.is_empty() {
            return Color::WHITE;
        }
        self.colors[rng.usize(..self.colors.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let settings = FieldSettings::default();
        assert_eq!(settings.particles_per_frame, 15);
        assert_eq!(settings.particle_count, 2000);
        assert!((settings.particle_lifespan - 5000.0).abs() < f32::EPSILON);
        assert_eq!(settings.colors, vec![Color::WHITE]);
        assert!(settings.trail);
        assert_eq!(settings.background_particles, 300);
        assert_eq!(settings.explosion.count, 100);
        assert_eq!(settings.pulse_count, 8);
        assert_eq!(settings.pulse_interval_ms, 30);
    }

    #[test]
    fn test_with_palette() {
        let settings = FieldSettings::default()
            .with_palette(&["#ff0000", "#00f"])
            .expect("valid palette");
        assert_eq!(settings.colors, vec![Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)]);

        let err = FieldSettings::default().with_palette(&["red"]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidColor("red".to_string()));
    }

    #[test]
    fn test_validate_clamps() {
        let mut settings = FieldSettings {
            particle_count: 0,
            particle_lifespan: -5.0,
            glow_chance: 4.0,
            colors: Vec::new(),
            particle_size: Range::new(3.0, 1.0),
            ..FieldSettings::default()
        };
        settings.validate();

        assert_eq!(settings.particle_count, 1);
        assert!((settings.particle_lifespan - 1.0).abs() < f32::EPSILON);
        assert!((settings.glow_chance - 1.0).abs() < f32::EPSILON);
        assert_eq!(settings.colors, vec![Color::WHITE]);
        assert_eq!(settings.particle_size, Range::new(1.0, 3.0));
    }

    #[test]
    fn test_range_sample_bounds() {
        let mut rng = fastrand::Rng::with_seed(7);
        let range = Range::new(0.5, 2.5);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!((0.5..2.5).contains(&v));
        }
    }

    #[test]
    fn test_range_span_and_degenerate_sample() {
        assert!((Range::new(0.5, 2.5).span() - 2.0).abs() < f32::EPSILON);

        let mut rng = fastrand::Rng::with_seed(7);
        let point = Range::new(4.0, 4.0);
        assert!(point.span().abs() < f32::EPSILON);
        assert!((point.sample(&mut rng) - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pick_color_covers_palette() {
        let settings = FieldSettings::default()
            .with_palette(&["#ff0000", "#00ff00"])
            .expect("valid palette");
        let mut rng = fastrand::Rng::with_seed(1);
        let picks: Vec<Color> = (0..64).map(|_| settings.pick_color(&mut rng)).collect();
        assert!(picks.contains(&Color::rgb(255, 0, 0)));
        assert!(picks.contains(&Color::rgb(0, 255, 0)));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: FieldSettings =
            toml::from_str("gravity = 0.1\ncolors = [\"#abcdef\"]\n[explosion]\ncount = 12\n")
                .expect("parse settings");
        assert!((settings.gravity - 0.1).abs() < f32::EPSILON);
        assert_eq!(settings.colors, vec![Color::rgb(0xab, 0xcd, 0xef)]);
        assert_eq!(settings.explosion.count, 12);
        assert_eq!(settings.particle_count, DEFAULT_PARTICLE_CAP);
    }
}
