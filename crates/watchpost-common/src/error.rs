//! Error types for Watchpost.

use thiserror::Error;

/// Top-level error type for Watchpost operations.
#[derive(Debug, Error)]
pub enum WatchpostError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric field is NaN or infinite
    #[error("{field} must be finite, got {value}")]
    NotFinite {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// A field that must be strictly positive is not
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
}

impl ConfigError {
    /// Checks that `value` is finite and strictly positive.
    pub fn require_positive(field: &'static str, value: f32) -> Result<f32, Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite { field, value });
        }
        if value <= 0.0 {
            return Err(Self::NotPositive { field, value });
        }
        Ok(value)
    }
}

/// Result type alias for Watchpost operations.
pub type WatchpostResult<T> = Result<T, WatchpostError>;
