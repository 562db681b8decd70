//! # Polarmill Core
//!
//! Core types and error handling for Polarmill.
//! Provides the machining parameter model shared by the toolpath
//! generator, the spindle synchronisation policy and the settings layer.

pub mod data;
pub mod error;

pub use data::{MachiningParameters, MillingDirection, Point, ShapeKind};

pub use error::ParameterError;
