//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used by every pipeline operation.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// Errors surfaced by the build pipeline.
///
/// Every variant aborts the operation that raised it. Nothing already
/// written to the file set or to disk is rolled back.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build root is not defined")]
    MissingRoot,

    #[error("target directory has to be specified")]
    MissingTarget,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error on `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("processor `{0}` is not registered")]
    UnknownProcessor(String),

    #[error("processor `{name}` failed on `{path}`")]
    Processor {
        name: String,
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("cannot resolve module `{module}` required from `{}`", from.display())]
    Detection { module: String, from: PathBuf },

    #[error("process callback failed on `{path}`")]
    Callback {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BuildError {
    /// Wrap an IO error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
