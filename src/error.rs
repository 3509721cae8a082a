// SPDX-License-Identifier: MIT

//! Typed error handling for scope-filter
//!
//! Rule evaluation itself never fails; errors only come from the edges:
//! loading files, looking up filter context and rendering SQL.

use thiserror::Error;

/// Top-level error type for scope-filter
#[derive(Debug, Error)]
pub enum ScopeFilterError {
    /// Context lookup failures (routes, visit coordinates, customer)
    #[error("Context lookup failed for {what}: {message}")]
    Context { what: String, message: String },

    /// File extension the loader does not know how to parse
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Table or column name that is not a plain, non-reserved SQL identifier
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ScopeFilterError {
    /// Create a context lookup error
    pub fn context(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Context {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }
}
