//! Headless application driver.
//!
//! Runs the particle field against an in-memory surface on a virtual
//! millisecond clock, feeding it pointer events, pulse ticks and refresh
//! callbacks the way a browser event loop would.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use stardust_kernel::{raster, FieldStats, IntervalTimer, MemorySurface, ParticleField};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::input::{PointerAction, PointerScript, ScriptPlayer};
use crate::timing::PassTiming;

/// Virtual clock resolution.
const TICK_MS: u64 = 1;

/// Summary written at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Simulated run length
    pub duration_ms: u64,
    /// RNG seed, when fixed
    pub seed: Option<u64>,
    /// Pointer events delivered during the run
    pub pointer_events: usize,
    /// Field totals
    pub stats: FieldStats,
    /// Particles alive at the end
    pub final_live: usize,
    /// Elements still on the surface at the end
    pub final_elements: usize,
    /// Average wall-clock pass time
    pub average_pass_ms: f32,
    /// Slowest pass
    pub worst_pass_ms: f32,
    /// Passes that exceeded one refresh interval
    pub overruns: u64,
}

impl RunReport {
    /// Write the report as pretty JSON.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
        info!("Saved run report to {}", path.display());
        Ok(())
    }
}

/// Write the resolved config, and the generated sweep when no script was
/// configured, next to the report so the run can be replayed.
fn save_replay(config: &EngineConfig, script: &PointerScript, report_path: &Path) -> Result<()> {
    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut replay = config.clone();
    if replay.script.is_none() {
        let script_path = report_path.with_extension("script.json");
        fs::write(&script_path, script.to_json()?)
            .with_context(|| format!("writing script {}", script_path.display()))?;
        replay.script = Some(script_path);
    }

    let config_path = report_path.with_extension("toml");
    replay
        .save_to(&config_path)
        .with_context(|| format!("writing config {}", config_path.display()))?;
    Ok(())
}

/// Run the configured simulation and write its outputs.
pub fn run(config: &EngineConfig) -> Result<RunReport> {
    let viewport = config.viewport();
    let script = match &config.script {
        Some(path) => PointerScript::load(path)?,
        None => PointerScript::sweep(viewport, config.duration_ms),
    };

    let surface = MemorySurface::new(viewport);
    let mut field = match config.seed {
        Some(seed) => ParticleField::with_seed(surface, config.field.clone(), seed),
        None => ParticleField::new(surface, config.field.clone()),
    };

    info!(
        "Running {}ms on a {}x{} viewport ({} pointer events)",
        config.duration_ms,
        viewport.width,
        viewport.height,
        script.len()
    );

    if script.is_empty() {
        warn!("Pointer script is empty, only the ambient layer will show");
    }

    if let Some(path) = &config.report {
        save_replay(config, &script, path)?;
    }

    let mut player = ScriptPlayer::new(script);
    let mut pulse = IntervalTimer::new(f64::from(field.settings().pulse_interval_ms));
    let mut refresh = IntervalTimer::new(config.refresh_interval_ms());
    let mut timing = PassTiming::new(config.refresh_hz);

    field.spawn_ambient();
    field.start();

    let mut now_ms = 0;
    while now_ms < config.duration_ms {
        for event in player.due(now_ms) {
            match event.kind {
                PointerAction::Move => {
                    field.pointer_moved(event.position());
                },
                PointerAction::Click => {
                    let spawned = field.clicked(event.position());
                    debug!("Click at {:?} spawned {spawned}", event.position());
                },
            }
        }

        for _ in 0..pulse.advance(TICK_MS as f64) {
            field.pulse();
        }

        for _ in 0..refresh.advance(TICK_MS as f64) {
            if !field.surface_mut().take_frame_request() {
                continue;
            }
            timing.begin();
            let report = field.on_refresh();
            timing.end();

            if let Some(report) = report {
                let frames = field.stats().frames;
                if config.stats_interval_frames > 0 && frames % config.stats_interval_frames == 0 {
                    info!(
                        "Frame {frames}: {} live, {} expired, {} evicted, {:.3}ms avg pass",
                        report.live,
                        report.expired,
                        report.evicted,
                        timing.average_pass_ms()
                    );
                }
            }
        }

        now_ms += TICK_MS;
    }

    field.halt();

    if player.remaining() > 0 {
        debug!("{} script events fall after the end of the run", player.remaining());
    }
    info!(
        "Run finished: {} passes measured, {} over budget",
        timing.total_passes(),
        timing.overruns()
    );

    if let Some(path) = &config.snapshot {
        raster::save_png(
            field.surface(),
            config.duration_ms as f32 / 1000.0,
            config.background,
            path,
        )?;
    }

    let report = RunReport {
        duration_ms: config.duration_ms,
        seed: config.seed,
        pointer_events: player.delivered(),
        stats: *field.stats(),
        final_live: field.len(),
        final_elements: field.surface().live_count(),
        average_pass_ms: timing.average_pass_ms(),
        worst_pass_ms: timing.worst_pass_ms(),
        overruns: timing.overruns(),
    };

    if let Some(path) = &config.report {
        report.save_to(path)?;
    }

    Ok(report)
}
