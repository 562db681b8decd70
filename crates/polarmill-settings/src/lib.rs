//! Polarmill Settings Crate
//!
//! Handles application configuration: machining defaults, spindle sync
//! timing and program output options.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, ProgramSettings, SyncSettings};
pub use error::{SettingsError, SettingsResult};
