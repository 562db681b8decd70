//! Configuration for Polarmill
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files, chosen by extension, stored in the platform config directory.
//!
//! Configuration is organized into sections:
//! - Machining defaults (shape, tool, spindle and feed)
//! - Spindle sync timing
//! - Program output options

use std::path::{Path, PathBuf};
use std::time::Duration;

use polarmill_camtools::{ParameterStore, ProgramOptions, DEFAULT_QUIET_PERIOD};
use polarmill_core::MachiningParameters;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "polarmill";
/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Largest program number that fits the four-digit O word
pub const MAX_PROGRAM_NUMBER: u32 = 9999;

/// Spindle speed / cutting speed sync settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Quiet period after an RPM or Vc edit before the other value follows
    pub quiet_period_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
        }
    }
}

/// Program output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramSettings {
    /// Program number written in the O word
    pub program_number: u32,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self { program_number: 1 }
    }
}

impl From<&ProgramSettings> for ProgramOptions {
    fn from(settings: &ProgramSettings) -> Self {
        ProgramOptions {
            program_number: settings.program_number,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Machining defaults for a new session
    pub machining: MachiningParameters,
    /// Spindle sync timing
    pub sync: SyncSettings,
    /// Program output
    pub program: ProgramSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let m = &self.machining;
        m.validate_shape()?;

        if !(m.depth > 0.0) {
            return Err(SettingsError::invalid("machining.depth", "must be > 0"));
        }
        if m.corner_radius < 0.0 {
            return Err(SettingsError::invalid(
                "machining.corner_radius",
                "must not be negative",
            ));
        }
        if m.flute_count == 0 {
            return Err(SettingsError::invalid("machining.flute_count", "must be > 0"));
        }
        if m.spindle_rpm == 0 {
            return Err(SettingsError::invalid("machining.spindle_rpm", "must be > 0"));
        }
        if !(m.cutting_speed > 0.0) {
            return Err(SettingsError::invalid("machining.cutting_speed", "must be > 0"));
        }
        if !(m.feed_per_tooth > 0.0) {
            return Err(SettingsError::invalid("machining.feed_per_tooth", "must be > 0"));
        }

        if self.program.program_number > MAX_PROGRAM_NUMBER {
            return Err(SettingsError::invalid(
                "program.program_number",
                format!("must be <= {}", MAX_PROGRAM_NUMBER),
            ));
        }

        Ok(())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.sync.quiet_period_ms)
    }

    pub fn program_options(&self) -> ProgramOptions {
        ProgramOptions::from(&self.program)
    }

    /// A parameter store seeded with these settings
    pub fn parameter_store(&self) -> ParameterStore {
        ParameterStore::with_settings(
            self.machining.clone(),
            self.quiet_period(),
            self.program_options(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}

/// Platform config directory for Polarmill
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| SettingsError::ConfigDirectory("No config directory on this platform".to_string()))
}

/// Default location of the config file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
