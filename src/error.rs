//! Error types and handling for Elprice
//!
//! This module defines the error types used throughout the price engine,
//! the configuration layer and the update loop.

use thiserror::Error;

/// Result type alias for Elprice operations
pub type Result<T> = std::result::Result<T, PriceError>;

/// Main error type for Elprice
#[derive(Debug, Error)]
pub enum PriceError {
    /// A date range specification could not be parsed
    #[error("Invalid date format: {message}")]
    InvalidFormat { message: String },

    /// A time range specification could not be parsed
    #[error("Invalid time range: {message}")]
    InvalidRange { message: String },

    /// Source price data is missing or too short
    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },

    /// Configuration-related errors (non-numeric rates, bad charges)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Tariff lookup failed or returned unusable data
    #[error("External lookup failure: {message}")]
    ExternalLookup { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl PriceError {
    /// Create a new date format error
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        PriceError::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a new time range error
    pub fn invalid_range<S: Into<String>>(message: S) -> Self {
        PriceError::InvalidRange {
            message: message.into(),
        }
    }

    /// Create a new data unavailable error
    pub fn data_unavailable<S: Into<String>>(message: S) -> Self {
        PriceError::DataUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        PriceError::Config {
            message: message.into(),
        }
    }

    /// Create a new external lookup error
    pub fn external_lookup<S: Into<String>>(message: S) -> Self {
        PriceError::ExternalLookup {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        PriceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        PriceError::Io {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        PriceError::Generic {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the setup step (unparsable schedule text)
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            PriceError::InvalidFormat { .. }
                | PriceError::InvalidRange { .. }
                | PriceError::Validation { .. }
        )
    }
}

impl From<std::io::Error> for PriceError {
    fn from(err: std::io::Error) -> Self {
        PriceError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for PriceError {
    fn from(err: serde_yaml::Error) -> Self {
        PriceError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PriceError {
    fn from(err: serde_json::Error) -> Self {
        PriceError::Serialization {
            message: err.to_string(),
        }
    }
}
