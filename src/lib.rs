//! # Polarmill
//!
//! Toolpath and program generator for milling hexagons, squares, regular
//! N-gons and two flats on a turned part, using a lathe's live tool and C
//! axis under G12.1 polar interpolation.
//!
//! ## Architecture
//!
//! Polarmill is organized as a workspace with multiple crates:
//!
//! 1. **polarmill-core** - Machining parameters, geometry primitives, errors
//! 2. **polarmill-camtools** - Toolpath geometry, program emission, spindle sync
//! 3. **polarmill-settings** - Configuration files and defaults
//! 4. **polarmill** - Command line binary that integrates all crates

pub mod cli;

pub use polarmill_core::{MachiningParameters, MillingDirection, ParameterError, Point, ShapeKind};

pub use polarmill_camtools::{
    compute_feed_rate, compute_path, emit_program, format_gcode_number, generate_program,
    CamToolError, GeneratedProgram, ParameterEdit, ParameterStore, PolarProgramEmitter,
    ProgramOptions, SimulationFrame, SpindleSync, ToolpathPath, ToolpathSegment,
};

pub use polarmill_settings::{default_config_path, Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so generated programs on stdout stay clean
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
