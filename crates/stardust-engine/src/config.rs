//! Engine configuration.
//!
//! Provides viewport, run, input, output and particle field settings.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use stardust_common::{Color, ConfigError, Viewport};
use stardust_kernel::FieldSettings;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "stardust.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Viewport Settings ===
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,

    // === Run Settings ===
    /// Simulated run length in milliseconds
    pub duration_ms: u64,
    /// Display refresh rate in Hz
    pub refresh_hz: f64,
    /// RNG seed (None = random)
    pub seed: Option<u64>,

    // === Input Settings ===
    /// Pointer script (None = built-in sweep)
    pub script: Option<PathBuf>,

    // === Output Settings ===
    /// PNG snapshot of the final frame
    pub snapshot: Option<PathBuf>,
    /// JSON run report
    pub report: Option<PathBuf>,
    /// Snapshot background color
    pub background: Color,
    /// Log a status line every this many frames (0 = never)
    pub stats_interval_frames: u64,

    // === Particle Field ===
    /// Particle field settings
    pub field: FieldSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Viewport
            viewport_width: 1280.0,
            viewport_height: 720.0,

            // Run
            duration_ms: 10_000,
            refresh_hz: 60.0,
            seed: None,

            // Input
            script: None,

            // Output
            snapshot: None,
            report: None,
            background: Color::BLACK,
            stats_interval_frames: 60,

            // Particle field
            field: FieldSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match Self::parse(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("{e}, using defaults");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("stardust").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Viewport
        self.viewport_width = self.viewport_width.clamp(16.0, 7680.0);
        self.viewport_height = self.viewport_height.clamp(16.0, 4320.0);

        // Run
        self.duration_ms = self.duration_ms.clamp(1, 3_600_000);
        self.refresh_hz = self.refresh_hz.clamp(1.0, 360.0);

        // Field
        self.field.validate();
    }

    /// Viewport described by this configuration.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Refresh interval in milliseconds.
    #[must_use]
    pub fn refresh_interval_ms(&self) -> f64 {
        1000.0 / self.refresh_hz
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
