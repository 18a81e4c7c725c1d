//! Refresh pass timing.
//!
//! Measures wall-clock cost of each simulation pass so runs can report
//! how much of the frame budget the field actually uses.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling pass-duration tracker.
#[derive(Debug)]
pub struct PassTiming {
    /// Time budget per refresh
    frame_budget: Duration,
    /// Start of the pass being measured
    pass_start: Option<Instant>,
    /// Recent pass times in seconds
    pass_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
    /// Total passes measured
    total_passes: u64,
    /// Slowest pass seen
    worst: Duration,
    /// Passes that overran the budget
    overruns: u64,
}

impl Default for PassTiming {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl PassTiming {
    /// Create a tracker for the given refresh rate.
    #[must_use]
    pub fn new(refresh_hz: f64) -> Self {
        Self {
            frame_budget: Duration::from_secs_f64(1.0 / refresh_hz.max(1.0)),
            pass_start: None,
            pass_times: VecDeque::with_capacity(120),
            max_samples: 120,
            total_passes: 0,
            worst: Duration::ZERO,
            overruns: 0,
        }
    }

    /// Mark the start of a pass.
    pub fn begin(&mut self) {
        self.pass_start = Some(Instant::now());
    }

    /// Mark the end of a pass started with [`Self::begin`].
    pub fn end(&mut self) {
        if let Some(start) = self.pass_start.take() {
            self.record(start.elapsed());
        }
    }

    /// Record a pass duration directly.
    pub fn record(&mut self, elapsed: Duration) {
        self.pass_times.push_back(elapsed.as_secs_f32());
        if self.pass_times.len() > self.max_samples {
            self.pass_times.pop_front();
        }

        self.total_passes += 1;
        self.worst = self.worst.max(elapsed);
        if elapsed > self.frame_budget {
            self.overruns += 1;
        }
    }

    /// Average of recent passes in milliseconds.
    #[must_use]
    pub fn average_pass_ms(&self) -> f32 {
        if self.pass_times.is_empty() {
            return 0.0;
        }

        (self.pass_times.iter().sum::<f32>() / self.pass_times.len() as f32) * 1000.0
    }

    /// Slowest pass in milliseconds.
    #[must_use]
    pub fn worst_pass_ms(&self) -> f32 {
        self.worst.as_secs_f32() * 1000.0
    }

    /// Passes that took longer than one refresh interval.
    #[must_use]
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Total passes measured.
    #[must_use]
    pub fn total_passes(&self) -> u64 {
        self.total_passes
    }
}
