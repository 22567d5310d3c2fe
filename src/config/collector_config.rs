use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::constants::{KEY_BASE_DIRECTORY, KEY_COLLECT_FUNCTION};
use crate::error::ConfigError;

/// Settings of the data collector.
///
/// Once built the value is immutable. Base directory and collect function
/// are always present and non-empty; a config that lacks either is rejected
/// at parse time instead of producing a half-enabled collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectorConfig {
    data_collector_base_directory: PathBuf,
    collect_data_function: String,
    collect_pod_logs: bool,
}

/// On-disk shape, every key optional so missing keys get a proper error.
#[derive(Debug, Deserialize)]
struct RawCollectorConfig {
    #[serde(default)]
    data_collector_base_directory: Option<String>,
    #[serde(default)]
    collect_data_function: Option<String>,
    #[serde(default)]
    collect_pod_logs: Option<bool>,
}

impl CollectorConfig {
    pub fn new(
        base_directory: impl Into<PathBuf>,
        collect_data_function: impl Into<String>,
        collect_pod_logs: bool,
    ) -> Result<Self, ConfigError> {
        let base_directory = base_directory.into();
        let collect_data_function = collect_data_function.into();
        let origin = "arguments";

        if base_directory.as_os_str().is_empty() {
            return Err(missing(origin, KEY_BASE_DIRECTORY));
        }
        if collect_data_function.trim().is_empty() {
            return Err(missing(origin, KEY_COLLECT_FUNCTION));
        }

        Ok(Self {
            data_collector_base_directory: base_directory,
            collect_data_function,
            collect_pod_logs,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.data_collector_base_directory
    }

    /// Dotted `<module>.<function>` name of the registered collect function
    pub fn collect_data_function(&self) -> &str {
        &self.collect_data_function
    }

    pub fn collect_pod_logs(&self) -> bool {
        self.collect_pod_logs
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let origin = path.display().to_string();
        let value: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            origin: origin.clone(),
            source,
        })?;

        let config = Self::from_yaml_value(value, &origin)?;
        debug!("Loaded collector configuration from {}", path.display());
        Ok(config)
    }

    /// Build from an already parsed mapping; `origin` only feeds error messages.
    pub fn from_yaml_value(value: Value, origin: &str) -> Result<Self, ConfigError> {
        if !value.is_mapping() {
            return Err(ConfigError::NotAMapping {
                origin: origin.to_string(),
            });
        }

        let raw: RawCollectorConfig =
            serde_yaml::from_value(value).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        let base_directory = raw
            .data_collector_base_directory
            .filter(|dir| !dir.trim().is_empty())
            .ok_or_else(|| missing(origin, KEY_BASE_DIRECTORY))?;
        let collect_data_function = raw
            .collect_data_function
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| missing(origin, KEY_COLLECT_FUNCTION))?;

        Ok(Self {
            data_collector_base_directory: PathBuf::from(base_directory),
            collect_data_function: collect_data_function.trim().to_string(),
            collect_pod_logs: raw.collect_pod_logs.unwrap_or(false),
        })
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let yaml = serde_yaml::to_string(self).context("Failed to serialize collector config")?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write collector config to {}", path.display()))?;

        info!("Saved collector configuration to {}", path.display());
        Ok(())
    }
}

fn missing(origin: &str, key: &'static str) -> ConfigError {
    ConfigError::MissingKey {
        origin: origin.to_string(),
        key,
    }
}
