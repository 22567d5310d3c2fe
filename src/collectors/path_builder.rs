use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::CollectorConfig;
use crate::constants::ENV_DYNAMIC_BASE_DIR;
use crate::error::StorageError;
use crate::models::CollectionContext;
use crate::security::{sanitize_path_component, validate_destination};

/// Computes and creates destination directories for collection events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    dynamic_base_dir: Option<String>,
}

impl PathBuilder {
    /// Use an explicit dynamic base directory; empty strings count as unset.
    pub fn new(dynamic_base_dir: Option<String>) -> Self {
        Self {
            dynamic_base_dir: dynamic_base_dir.filter(|dir| !dir.is_empty()),
        }
    }

    /// Snapshot of `OPENSHIFT_PYTHON_WRAPPER_DATA_COLLECTOR_DYNAMIC_BASE_DIR`
    pub fn from_env() -> Self {
        Self::new(env::var(ENV_DYNAMIC_BASE_DIR).ok())
    }

    pub fn dynamic_base_dir(&self) -> Option<&str> {
        self.dynamic_base_dir.as_deref()
    }

    /// Effective base directory, without touching the filesystem.
    ///
    /// The dynamic directory is inserted between the configured base
    /// directory's parent and its leaf:
    /// `/data/results/collected-info` + `dyn` -> `/data/results/dyn/collected-info`.
    /// A base without a leaf (`/`) just gets the dynamic directory appended.
    pub fn resolve_base_directory(&self, config: &CollectorConfig) -> PathBuf {
        let base = config.base_directory();
        let dynamic = match &self.dynamic_base_dir {
            Some(dynamic) => dynamic,
            None => return base.to_path_buf(),
        };

        match (base.parent(), base.file_name()) {
            (Some(parent), Some(leaf)) => parent.join(dynamic).join(leaf),
            _ => base.join(dynamic),
        }
    }

    /// Destination of one event: `<resolved base>/<sanitized context name>`.
    pub fn destination_for(&self, config: &CollectorConfig, context: &CollectionContext) -> PathBuf {
        self.resolve_base_directory(config)
            .join(sanitize_path_component(&context.name))
    }

    /// Compute the destination and make sure it exists.
    ///
    /// Calling this repeatedly with the same inputs yields the same path.
    pub fn build_destination(
        &self,
        config: &CollectorConfig,
        context: &CollectionContext,
    ) -> Result<PathBuf, StorageError> {
        let destination = self.destination_for(config, context);
        validate_destination(&destination)?;
        ensure_dir(&destination)?;

        debug!("Collection destination ready: {}", destination.display());
        Ok(destination)
    }
}

/// `create_dir_all` that tolerates another process winning the race.
pub(crate) fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(StorageError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}
