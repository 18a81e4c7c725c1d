//! Fixed-interval triggers.
//!
//! Drivers feed elapsed wall or virtual time into an [`IntervalTimer`] and
//! fire the associated callback once per returned tick. The same primitive
//! drives the idle pulse cadence and, in the headless driver, the display
//! refresh clock.

/// Refresh interval of a 60 Hz display in milliseconds.
pub const REFRESH_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Accumulating fixed-interval timer.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    interval_ms: f64,
    accumulator: f64,
    fired: u64,
}

impl IntervalTimer {
    /// Creates a timer firing every `interval_ms` milliseconds.
    ///
    /// The interval is floored at one microsecond.
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.001),
            accumulator: 0.0,
            fired: 0,
        }
    }

    /// Timer matching a 60 Hz display refresh.
    #[must_use]
    pub fn refresh() -> Self {
        Self::new(REFRESH_INTERVAL_MS)
    }

    /// Advances the timer and returns how many times it fired.
    ///
    /// Non-finite or negative elapsed times are ignored. A backlog larger
    /// than `u32::MAX` ticks is reported as `u32::MAX` and the rest dropped.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !elapsed_ms.is_finite() {
            return 0;
        }
        self.accumulator += elapsed_ms.max(0.0);

        let whole = (self.accumulator / self.interval_ms).floor();
        let ticks = if whole >= f64::from(u32::MAX) {
            self.accumulator = 0.0;
            u32::MAX
        } else {
            let ticks = whole as u32;
            self.accumulator = (self.accumulator - f64::from(ticks) * self.interval_ms).max(0.0);
            ticks
        };

        self.fired += u64::from(ticks);
        ticks
    }

    /// Interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Total ticks fired since creation or the last reset.
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }

    /// Milliseconds until the next tick.
    #[must_use]
    pub fn remaining_ms(&self) -> f64 {
        self.interval_ms - self.accumulator
    }

    /// Clears accumulated time and the tick count.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.fired = 0;
    }
}
