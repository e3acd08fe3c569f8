//! Error types for pulsetrace-core.
//!
//! Two failure domains exist: series operations (recording and the queries
//! that need at least one measurement) and detector configuration handling.
//! Empty query results are not errors -- range and interval queries return an
//! empty window as a "no data" signal instead.

use thiserror::Error;

/// Errors raised by series operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// A negative rate was passed to `record`/`record_at`. The measurement
    /// is rejected and no subscriber is notified.
    #[error("heart rate must be non-negative, got {0}")]
    NegativeRate(f64),

    /// The operation needs at least one recorded measurement.
    #[error("no measurements recorded yet")]
    Empty,
}

/// Errors raised when parsing or validating a detector configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse config TOML
    #[error("failed to parse detector config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config TOML
    #[error("failed to serialize detector config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A threshold or window fails the configuration invariants
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for series operations
pub type Result<T, E = SeriesError> = std::result::Result<T, E>;
