//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for toolpath generation,
//! program output and the sync service.

use thiserror::Error;

pub use polarmill_core::ParameterError;

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The sync service task is no longer running.
    #[error("Sync service stopped")]
    ServiceStopped,
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
