//! Core error types for `vk-friends`.

use thiserror::Error;

/// Core error type for `vk-friends` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Requested report format has no implementation.
    #[error("No implementation for report generator of format: {0}")]
    UnsupportedFormat(String),

    /// A coded field carried a value missing from its lookup table.
    #[error("Unknown {field} code: {code}")]
    UnknownFieldCode {
        /// Field name.
        field: String,
        /// Raw value received from the API.
        code: String,
    },

    /// A field value could not be transformed.
    #[error("Invalid value for field {field}: {value}")]
    InvalidFieldValue {
        /// Field name.
        field: String,
        /// Raw value received from the API.
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
