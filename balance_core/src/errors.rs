//! # Error Types
//!
//! Structured error types for balance_core. Every variant carries enough
//! context to tell the user which input, line, or file was at fault.
//!
//! ## Example
//!
//! ```rust
//! use balance_core::errors::{BalanceError, BalanceResult};
//!
//! fn validate_limit(limit: f64) -> BalanceResult<()> {
//!     if limit < 0.0 {
//!         return Err(BalanceError::InvalidInput {
//!             field: "limit".to_string(),
//!             value: limit.to_string(),
//!             reason: "Limit must not be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for balance_core operations
pub type BalanceResult<T> = Result<T, BalanceError>;

/// Structured error type for balance operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BalanceError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A measurement line could not be parsed and the parser runs in strict mode
    #[error("Malformed line {line}: '{content}' - {reason}")]
    MalformedLine {
        line: usize,
        content: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Settings file could not be parsed or written
    #[error("Config error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },

    /// Schema version mismatch on an exported analysis
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// A report renderer failed
    #[error("Render error ({format}): {reason}")]
    RenderError { format: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BalanceError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BalanceError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedLine error
    pub fn malformed_line(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        BalanceError::MalformedLine {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BalanceError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BalanceError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderError
    pub fn render_error(format: impl Into<String>, reason: impl Into<String>) -> Self {
        BalanceError::RenderError {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BalanceError::InvalidInput { .. } => "INVALID_INPUT",
            BalanceError::MalformedLine { .. } => "MALFORMED_LINE",
            BalanceError::FileError { .. } => "FILE_ERROR",
            BalanceError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BalanceError::ConfigError { .. } => "CONFIG_ERROR",
            BalanceError::VersionMismatch { .. } => "VERSION_MISMATCH",
            BalanceError::RenderError { .. } => "RENDER_ERROR",
            BalanceError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = BalanceError::malformed_line(3, "abc", "expected magnitude and phase");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"MalformedLine\""));
        let roundtrip: BalanceError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BalanceError::malformed_line(1, "x", "y").error_code(), "MALFORMED_LINE");
        assert_eq!(BalanceError::render_error("pdf", "boom").error_code(), "RENDER_ERROR");
        assert_eq!(BalanceError::config_error("bbal.toml", "bad").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_error_display() {
        let error = BalanceError::invalid_input("warn", "-1", "Threshold must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid input for 'warn': -1 - Threshold must not be negative"
        );
    }
}
