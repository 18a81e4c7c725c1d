//! The particle field simulator.
//!
//! A [`ParticleField`] owns the live particle collection, the pointer state,
//! its RNG and the presentation surface it draws on. Three triggers feed it
//! (pointer moves, pulse ticks, clicks) and a self re-arming refresh callback
//! animates it:
//!
//! ```
//! use stardust_common::{Vec2, Viewport};
//! use stardust_kernel::{FieldSettings, MemorySurface, ParticleField};
//!
//! let surface = MemorySurface::new(Viewport::new(800.0, 600.0));
//! let mut field = ParticleField::with_seed(surface, FieldSettings::default(), 7);
//!
//! field.spawn_ambient();
//! field.start();
//!
//! field.pointer_moved(Vec2::new(40.0, 40.0));
//! field.clicked(Vec2::new(40.0, 40.0));
//!
//! // The driver calls back once per display refresh
//! if field.surface_mut().take_frame_request() {
//!     field.on_refresh();
//! }
//! ```
//!
//! The collection is kept in insertion order. Each pass walks it back to
//! front so expired particles can be removed in place, then evicts from the
//! front while the population is above the cap, whatever life those oldest
//! particles still have.

use std::collections::VecDeque;

use serde::Serialize;
use stardust_common::{SpawnSeq, Vec2};
use tracing::{debug, info, trace};

use crate::ambient::{self, AmbientParticle};
use crate::particle::{Particle, ParticleKind};
use crate::settings::FieldSettings;
use crate::spawn::{self, Blueprint};
use crate::surface::PresentationSurface;

/// Last known pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Position reported by the latest move.
    pub current: Vec2,
    /// Position before the latest move.
    pub previous: Vec2,
    /// Whether the pointer has moved at least once.
    pub positioned: bool,
}

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameReport {
    /// Particles stepped this pass.
    pub updated: usize,
    /// Particles removed because their life ran out.
    pub expired: usize,
    /// Particles evicted by the population cap.
    pub evicted: usize,
    /// Particles alive after the pass.
    pub live: usize,
}

/// Running totals since the field was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FieldStats {
    /// Particles spawned by pointer moves.
    pub trail_spawned: u64,
    /// Particles spawned by pulse ticks.
    pub pulse_spawned: u64,
    /// Particles spawned by clicks.
    pub explosion_spawned: u64,
    /// Ambient particles created.
    pub ambient_spawned: u64,
    /// Particles removed by life expiry.
    pub expired: u64,
    /// Particles removed by cap eviction.
    pub evicted: u64,
    /// Refresh passes run.
    pub frames: u64,
    /// Largest population seen after any spawn or pass.
    pub peak_live: usize,
}

/// Cursor-trail particle simulator bound to one presentation surface.
pub struct ParticleField<S: PresentationSurface> {
    surface: S,
    settings: FieldSettings,
    particles: VecDeque<Particle>,
    ambient: Vec<AmbientParticle>,
    pointer: PointerState,
    rng: fastrand::Rng,
    next_seq: SpawnSeq,
    running: bool,
    stats: FieldStats,
}

impl<S: PresentationSurface> ParticleField<S> {
    /// Creates a field with an entropy-seeded RNG.
    pub fn new(surface: S, settings: FieldSettings) -> Self {
        Self::with_rng(surface, settings, fastrand::Rng::new())
    }

    /// Creates a field whose random draws are reproducible.
    pub fn with_seed(surface: S, settings: FieldSettings, seed: u64) -> Self {
        Self::with_rng(surface, settings, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(surface: S, mut settings: FieldSettings, rng: fastrand::Rng) -> Self {
        settings.validate();
        Self {
            surface,
            particles: VecDeque::with_capacity(settings.particle_count.min(4096)),
            settings,
            ambient: Vec::new(),
            pointer: PointerState::default(),
            rng,
            next_seq: SpawnSeq::FIRST,
            running: false,
            stats: FieldStats::default(),
        }
    }

    // === Triggers ===

    /// Handles a pointer move: records the position and spawns a trail
    /// along the segment from the previous position.
    ///
    /// Returns the number of particles spawned.
    pub fn pointer_moved(&mut self, position: Vec2) -> usize {
        self.pointer.previous = self.pointer.current;
        self.pointer.current = position;
        self.pointer.positioned = true;

        if !self.settings.trail {
            return 0;
        }

        let from = self.pointer.previous;
        let count = spawn::trail_count(
            from.distance(position),
            self.settings.particles_per_frame,
            self.settings.max_trail_per_move,
        );
        for point in spawn::trail_points(from, position, count) {
            let blueprint =
                spawn::sparkle(&self.settings, &mut self.rng, ParticleKind::Trail, point);
            self.insert(&blueprint);
        }

        self.stats.trail_spawned += count as u64;
        self.note_population();
        trace!("Trail spawned {} particles towards {:?}", count, position);
        count
    }

    /// Handles an idle pulse tick. Does nothing until the pointer has moved.
    ///
    /// Returns the number of particles spawned.
    pub fn pulse(&mut self) -> usize {
        if !self.pointer.positioned {
            return 0;
        }

        let count = self.settings.pulse_count;
        for _ in 0..count {
            let position = spawn::pulse_position(
                &mut self.rng,
                self.pointer.current,
                self.settings.pulse_jitter,
            );
            let blueprint =
                spawn::sparkle(&self.settings, &mut self.rng, ParticleKind::Pulse, position);
            self.insert(&blueprint);
        }

        self.stats.pulse_spawned += count as u64;
        self.note_population();
        count
    }

    /// Handles a click with the configured explosion size.
    pub fn clicked(&mut self, position: Vec2) -> usize {
        self.explode(position, self.settings.explosion.count)
    }

    /// Bursts `count` short-lived shards at `position`.
    pub fn explode(&mut self, position: Vec2, count: usize) -> usize {
        for _ in 0..count {
            let blueprint = spawn::shard(&self.settings, &mut self.rng, position);
            self.insert(&blueprint);
        }

        self.stats.explosion_spawned += count as u64;
        self.note_population();
        debug!("Explosion of {} particles at {:?}", count, position);
        count
    }

    /// Creates the ambient background layer. Only the first call spawns.
    pub fn spawn_ambient(&mut self) -> usize {
        if !self.ambient.is_empty() {
            debug!("Ambient layer already present, skipping");
            return 0;
        }

        self.ambient = ambient::spawn_layer(
            &mut self.surface,
            &mut self.rng,
            self.settings.background_particles,
        );
        self.stats.ambient_spawned += self.ambient.len() as u64;
        self.ambient.len()
    }

    // === Frame loop ===

    /// Starts the refresh loop by requesting the first frame.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.surface.request_frame();
        info!(
            "Particle field started (cap {}, lifespan {}ms)",
            self.settings.particle_count, self.settings.particle_lifespan
        );
    }

    /// Stops re-arming. The pass already requested, if any, becomes a no-op.
    pub fn halt(&mut self) {
        if self.running {
            self.running = false;
            info!("Particle field halted after {} frames", self.stats.frames);
        }
    }

    /// Whether the refresh loop is armed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Refresh callback: runs one pass and requests the next refresh.
    ///
    /// Returns `None` when the loop has been halted.
    pub fn on_refresh(&mut self) -> Option<FrameReport> {
        if !self.running {
            return None;
        }
        let report = self.step();
        self.surface.request_frame();
        Some(report)
    }

    /// Runs one physics and presentation pass without touching the loop.
    pub fn step(&mut self) -> FrameReport {
        let updated = self.particles.len();
        let gravity = self.settings.gravity;
        let randomness = self.settings.randomness;
        let decrement = self.settings.frame_decrement_ms;
        let lifespan = self.settings.particle_lifespan;
        let mut expired = 0;

        for i in (0..self.particles.len()).rev() {
            let noise = spawn::noise(&mut self.rng, randomness);
            let particle = &mut self.particles[i];

            particle.integrate(gravity, noise);
            self.surface
                .set_transform(particle.handle, particle.transform());

            particle.age(decrement, lifespan);
            self.surface.set_opacity(particle.handle, particle.opacity);

            if !particle.is_alive() {
                if let Some(dead) = self.particles.remove(i) {
                    self.surface.remove_element(dead.handle);
                    expired += 1;
                }
            }
        }

        let evicted = self.enforce_cap();

        self.stats.expired += expired as u64;
        self.stats.frames += 1;
        let report = FrameReport {
            updated,
            expired,
            evicted,
            live: self.particles.len(),
        };
        trace!("Frame {}: {:?}", self.stats.frames, report);
        report
    }

    /// Evicts the oldest particles until the population fits the cap.
    fn enforce_cap(&mut self) -> usize {
        let mut evicted = 0;
        while self.particles.len() > self.settings.particle_count {
            if let Some(oldest) = self.particles.pop_front() {
                self.surface.remove_element(oldest.handle);
                evicted += 1;
            }
        }
        if evicted > 0 {
            self.stats.evicted += evicted as u64;
            debug!(
                "Evicted {} oldest particles (cap {})",
                evicted, self.settings.particle_count
            );
        }
        evicted
    }

    fn insert(&mut self, blueprint: &Blueprint) {
        let handle = self.surface.create_element(&blueprint.element_spec());
        self.particles.push_back(Particle {
            seq: self.next_seq.advance(),
            kind: blueprint.kind,
            position: blueprint.position,
            velocity: blueprint.velocity,
            size: blueprint.size,
            color: blueprint.color,
            glow: blueprint.glow,
            life: blueprint.life,
            initial_opacity: blueprint.initial_opacity,
            opacity: blueprint.initial_opacity,
            spin: blueprint.spin,
            handle,
        });
    }

    fn note_population(&mut self) {
        self.stats.peak_live = self.stats.peak_live.max(self.particles.len());
    }

    // === Accessors ===

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl ExactSizeIterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Number of live simulated particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no simulated particles are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// The ambient layer.
    #[must_use]
    pub fn ambient(&self) -> &[AmbientParticle] {
        &self.ambient
    }

    /// Pointer state.
    #[must_use]
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Validated settings in use.
    #[must_use]
    pub const fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> &FieldStats {
        &self.stats
    }

    /// The presentation surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the presentation surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: PresentationSurface> std::fmt::Debug for ParticleField<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleField")
            .field("live", &self.particles.len())
            .field("ambient", &self.ambient.len())
            .field("pointer", &self.pointer)
            .field("running", &self.running)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
