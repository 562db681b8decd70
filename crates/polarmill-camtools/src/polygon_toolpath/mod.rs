//! Polar polygon toolpaths
//!
//! Computes the tool-centre path for milling a regular polygon or two flats
//! on a turned part with G12.1 polar interpolation.

pub mod generator;
pub mod segment;

pub use generator::{compute_path, PolygonToolpathGenerator, SHARP_CORNER_THRESHOLD};
pub use segment::{ArcSweep, ToolpathPath, ToolpathSegment};
