//! Layered collector configuration.
//!
//! A [`ConfigResolver`] holds an ordered list of [`ConfigProvider`]s and asks
//! each in turn until one yields a configuration. The default chain is the
//! `OPENSHIFT_PYTHON_WRAPPER_DATA_COLLECTOR_YAML` file first, then the
//! `data_collector` entry of the ambient configuration object.

use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

use log::debug;
use serde_yaml::{Mapping, Value};

use crate::config::CollectorConfig;
use crate::constants::{AMBIENT_CONFIG_KEY, ENV_DATA_COLLECTOR_YAML};
use crate::error::ConfigError;

/// One source of collector configuration.
pub trait ConfigProvider: Send + Sync {
    /// Name used in log messages
    fn name(&self) -> &str;

    /// Identifies the provider's current input; a change invalidates the
    /// resolver cache. Providers whose input never changes return `None`.
    fn fingerprint(&self) -> Option<String> {
        None
    }

    /// `Ok(None)` means "nothing configured here, ask the next provider".
    fn provide(&self) -> Result<Option<CollectorConfig>, ConfigError>;
}

/// Reads the YAML file named by an environment variable.
#[derive(Debug, Clone)]
pub struct EnvYamlProvider {
    var_name: String,
}

impl EnvYamlProvider {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }

    /// Path currently set in the variable; empty values count as unset
    fn config_path(&self) -> Option<PathBuf> {
        env::var_os(&self.var_name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}

impl Default for EnvYamlProvider {
    fn default() -> Self {
        Self::new(ENV_DATA_COLLECTOR_YAML)
    }
}

impl ConfigProvider for EnvYamlProvider {
    fn name(&self) -> &str {
        &self.var_name
    }

    fn fingerprint(&self) -> Option<String> {
        self.config_path().map(|path| path.display().to_string())
    }

    fn provide(&self) -> Result<Option<CollectorConfig>, ConfigError> {
        match self.config_path() {
            Some(path) => {
                debug!("Reading collector config from {} ({})", path.display(), self.var_name);
                CollectorConfig::from_yaml_file(&path).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Reads the `data_collector` entry of an in-process settings mapping,
/// typically the test session's global configuration.
#[derive(Debug, Clone, Default)]
pub struct AmbientConfigProvider {
    settings: Mapping,
}

impl AmbientConfigProvider {
    pub fn new(settings: Mapping) -> Self {
        Self { settings }
    }

    /// Parse the settings from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let origin = "ambient configuration";
        let value: Value = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        match value {
            Value::Mapping(settings) => Ok(Self::new(settings)),
            Value::Null => Ok(Self::default()),
            _ => Err(ConfigError::NotAMapping {
                origin: origin.to_string(),
            }),
        }
    }
}

impl ConfigProvider for AmbientConfigProvider {
    fn name(&self) -> &str {
        "ambient configuration"
    }

    fn provide(&self) -> Result<Option<CollectorConfig>, ConfigError> {
        let entry = match self.settings.get(AMBIENT_CONFIG_KEY) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
            Some(Value::Mapping(section)) if section.is_empty() => return Ok(None),
            Some(Value::Sequence(items)) if items.is_empty() => return Ok(None),
            Some(Value::String(text)) if text.is_empty() => return Ok(None),
            Some(entry) => entry.clone(),
        };

        CollectorConfig::from_yaml_value(entry, AMBIENT_CONFIG_KEY).map(Some)
    }
}

struct CachedResolution {
    fingerprints: Vec<Option<String>>,
    config: Option<CollectorConfig>,
}

/// Ordered provider chain with a resolution cache.
///
/// The cache is reused until a provider fingerprint changes (for the default
/// chain: the value of the env var) or [`invalidate`](Self::invalidate) is
/// called. Errors are never cached.
pub struct ConfigResolver {
    providers: Vec<Box<dyn ConfigProvider>>,
    cache: Mutex<Option<CachedResolution>>,
}

impl ConfigResolver {
    pub fn new(providers: Vec<Box<dyn ConfigProvider>>) -> Self {
        Self {
            providers,
            cache: Mutex::new(None),
        }
    }

    /// Env var file first, then the ambient settings if any
    pub fn with_ambient(ambient: Option<AmbientConfigProvider>) -> Self {
        let mut providers: Vec<Box<dyn ConfigProvider>> = vec![Box::new(EnvYamlProvider::default())];
        if let Some(ambient) = ambient {
            providers.push(Box::new(ambient));
        }
        Self::new(providers)
    }

    /// Resolve the active configuration; `Ok(None)` disables collection.
    pub fn resolve(&self) -> Result<Option<CollectorConfig>, ConfigError> {
        let fingerprints: Vec<Option<String>> =
            self.providers.iter().map(|provider| provider.fingerprint()).collect();

        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cached) = cache.as_ref() {
            if cached.fingerprints == fingerprints {
                return Ok(cached.config.clone());
            }
        }

        let config = self.resolve_uncached()?;
        *cache = Some(CachedResolution {
            fingerprints,
            config: config.clone(),
        });
        Ok(config)
    }

    /// Drop the cached resolution
    pub fn invalidate(&self) {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cache = None;
    }

    fn resolve_uncached(&self) -> Result<Option<CollectorConfig>, ConfigError> {
        for provider in &self.providers {
            if let Some(config) = provider.provide()? {
                debug!("Collector configuration taken from {}", provider.name());
                return Ok(Some(config));
            }
        }

        debug!("No collector configuration found, data collection disabled");
        Ok(None)
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::with_ambient(None)
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|provider| provider.name()).collect();
        f.debug_struct("ConfigResolver")
            .field("providers", &names)
            .finish_non_exhaustive()
    }
}
