//! Pointer input for headless runs.
//!
//! A pointer script is a JSON list of timestamped moves and clicks. Without
//! a script the driver falls back to a built-in Lissajous sweep.

use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stardust_common::{StardustError, StardustResult, Vec2, Viewport};
use tracing::{debug, info};

/// Spacing between generated move events.
const SWEEP_STEP_MS: u64 = 8;

/// Spacing between generated clicks.
const SWEEP_CLICK_MS: u64 = 1500;

/// Sweep period along x, in milliseconds.
const SWEEP_PERIOD_X_MS: f32 = 3100.0;

/// Sweep period along y, in milliseconds.
const SWEEP_PERIOD_Y_MS: f32 = 2300.0;

/// Fraction of the viewport the sweep covers.
const SWEEP_EXTENT: f32 = 0.4;

/// What the pointer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    /// Pointer moved to the position
    Move,
    /// Pointer clicked at the position
    Click,
}

/// One timestamped pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Virtual time of the event
    pub at_ms: u64,
    /// Event kind
    pub kind: PointerAction,
    /// Viewport x
    pub x: f32,
    /// Viewport y
    pub y: f32,
}

impl PointerEvent {
    /// Event position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Time-ordered pointer events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerScript {
    events: Vec<PointerEvent>,
}

impl PointerScript {
    /// Build a script from events in any order.
    #[must_use]
    pub fn new(mut events: Vec<PointerEvent>) -> Self {
        // Stable so same-millisecond events keep their file order
        events.sort_by_key(|e| e.at_ms);
        Self { events }
    }

    /// Parse a script from JSON text.
    pub fn from_json(json: &str) -> StardustResult<Self> {
        let events: Vec<PointerEvent> =
            serde_json::from_str(json).map_err(|e| StardustError::Script(e.to_string()))?;
        Ok(Self::new(events))
    }

    /// Load a script from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> StardustResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| StardustError::Script(format!("{}: {e}", path.display())))?;
        let script = Self::from_json(&json)?;
        info!(
            "Loaded pointer script with {} events from {}",
            script.len(),
            path.display()
        );
        Ok(script)
    }

    /// Built-in sweep: a Lissajous path around the viewport center with a
    /// click every 1.5 s.
    #[must_use]
    pub fn sweep(viewport: Viewport, duration_ms: u64) -> Self {
        let center = viewport.center();
        let extent = Vec2::new(viewport.width, viewport.height) * SWEEP_EXTENT;

        let mut events = Vec::new();
        let mut at_ms = 0;
        let mut next_click = SWEEP_CLICK_MS;
        while at_ms < duration_ms {
            let t = at_ms as f32;
            let pos = center
                + Vec2::new(
                    (t / SWEEP_PERIOD_X_MS * TAU).sin(),
                    (t / SWEEP_PERIOD_Y_MS * TAU).sin(),
                ) * extent;
            events.push(PointerEvent {
                at_ms,
                kind: PointerAction::Move,
                x: pos.x,
                y: pos.y,
            });
            if at_ms >= next_click {
                next_click += SWEEP_CLICK_MS;
                events.push(PointerEvent {
                    at_ms,
                    kind: PointerAction::Click,
                    x: pos.x,
                    y: pos.y,
                });
            }
            at_ms += SWEEP_STEP_MS;
        }

        debug!("Generated sweep with {} events", events.len());
        Self { events }
    }

    /// All events in time order.
    #[must_use]
    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the script has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> StardustResult<String> {
        serde_json::to_string_pretty(&self.events)
            .map_err(|e| StardustError::Serialization(e.to_string()))
    }
}

/// Replays a script against a virtual clock.
#[derive(Debug)]
pub struct ScriptPlayer {
    script: PointerScript,
    next: usize,
}

impl ScriptPlayer {
    /// Start at the first event.
    #[must_use]
    pub fn new(script: PointerScript) -> Self {
        Self { script, next: 0 }
    }

    /// Events due at or before `now_ms` that have not been delivered yet.
    pub fn due(&mut self, now_ms: u64) -> &[PointerEvent] {
        let start = self.next;
        let events = self.script.events();
        while self.next < events.len() && events[self.next].at_ms <= now_ms {
            self.next += 1;
        }
        &events[start..self.next]
    }

    /// Events not delivered yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len() - self.next
    }

    /// Events delivered so far.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.next
    }
}
