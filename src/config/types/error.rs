//! Configuration error types.

use super::FieldPath;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file `{0}` not found")]
    NotFound(PathBuf),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern for {field}")]
    Pattern {
        field: FieldPath,
        #[source]
        source: regex::Error,
    },

    #[error("config validation error: {field} {message}")]
    Validation { field: FieldPath, message: String },
}

impl ConfigError {
    pub fn validation(field: FieldPath, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
