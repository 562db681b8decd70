//! # Polarmill CAM Tools
//!
//! Toolpath generation and program output for milling polygons on a lathe
//! with a live tool and C axis, using G12.1 polar interpolation.
//!
//! ## Included
//!
//! - **Polygon Toolpath**: Tool-centre paths for hexagons, squares, N-gons and two flats
//! - **Polar Program**: G12.1 program emission with prologue and epilogue
//! - **G-Code Format**: Compact controller number notation
//! - **Speeds and Feeds**: Cutting speed, spindle speed, feed rate and stock diameter
//! - **Spindle Sync**: Debounced spindle speed / cutting speed reconciliation
//!
//! ## Supporting Infrastructure
//!
//! - **Session**: Parameter store and one-shot program generation
//! - **Sync Service**: Tokio task driving the spindle sync timer
//! - **Path Sampler**: Flattened points for display

pub mod error;
pub mod gcode_format;
pub mod path_sampler;
pub mod polar_program;
pub mod polygon_toolpath;
pub mod session;
pub mod speeds_feeds;
pub mod spindle_sync;
pub mod sync_service;

// Re-export commonly used items
pub use error::{CamToolError, CamToolResult};
pub use gcode_format::{format_gcode_number, GcodeNumber};
pub use path_sampler::{PathSampler, PathSamplerConfig, SampledPoint, SimulationFrame};
pub use polar_program::{emit_program, PolarProgramEmitter, ProgramOptions};
pub use polygon_toolpath::{
    compute_path, ArcSweep, PolygonToolpathGenerator, ToolpathPath, ToolpathSegment,
};
pub use session::{generate_program, GeneratedProgram, ParameterEdit, ParameterStore};
pub use speeds_feeds::{compute_feed_rate, cutting_speed_for, spindle_rpm_for, stock_diameter};
pub use spindle_sync::{SpindleSync, SyncSource, TimerToken, DEFAULT_QUIET_PERIOD};
pub use sync_service::SpindleSyncHandle;
