//! Custom error types for the prosumer balance engine
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions. The engine itself only ever raises
//! [`ProsumerError::Validation`]; the remaining variants come from the
//! host-side import, export, and settings layers.

use thiserror::Error;

/// The main error type for prosumer balance operations
#[derive(Error, Debug)]
pub enum ProsumerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Domain-invalid input (out-of-range day/hour/percentage/capacity,
    /// inverted date range, missing join key)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl ProsumerError {
    /// Create a "not found" error for locations
    pub fn location_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Location",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for ProsumerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ProsumerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for ProsumerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for prosumer balance operations
pub type ProsumerResult<T> = Result<T, ProsumerError>;
