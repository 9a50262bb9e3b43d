//! Error types for the schema store

use std::time::Duration;

use thiserror::Error;

/// Result type for schema store operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema store errors
///
/// The repository never retries; every failure is handed back to the caller
/// as one of these variants.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema already exists: {key}")]
    Conflict { key: String },

    #[error("Schema not found: {key}")]
    NotFound { key: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Malformed key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchemaError {
    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        SchemaError::MalformedKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the store could not be reached or the call ran out of time.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SchemaError::Unavailable(_) | SchemaError::Timeout { .. })
    }

    /// True for transcoding or payload decoding failures.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidSchema(_) | SchemaError::Json(_) | SchemaError::Yaml(_)
        )
    }
}
