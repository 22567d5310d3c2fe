//! Error taxonomy for the collector.
//!
//! Each component reports its own typed error. [`CollectorInvoker`] never
//! propagates them: they end up inside a [`FailureCause`] attached to the
//! returned result.
//!
//! [`CollectorInvoker`]: crate::collectors::CollectorInvoker

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or unreadable collector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse collector config from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("collector config from {origin} is not a mapping")]
    NotAMapping { origin: String },

    #[error("collector config from {origin} is missing required key '{key}'")]
    MissingKey { origin: String, key: &'static str },
}

/// A collect-function name that cannot be resolved to a registered callback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("'{0}' is not a valid function path, expected '<module>.<function>'")]
    InvalidPath(String),

    #[error("no collect functions registered for module '{0}'")]
    ModuleNotFound(String),

    #[error("module '{module}' has no collect function '{function}'")]
    FunctionNotFound { module: String, function: String },
}

/// Destination directory could not be prepared.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid destination path: {0}")]
    InvalidPath(String),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single collection event stopped early or ended in failure.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The user collect function returned an error or panicked.
    #[error("collect function failed: {0:#}")]
    Function(anyhow::Error),
}
