//! Named registry of collect functions.
//!
//! Configuration refers to the collect function by a dotted name such as
//! `utilities.data_collector.collect_data`. Everything before the last `.` is
//! the module, the rest is the function. Callbacks are registered under that
//! name at startup; the invoker looks the name up again on every collection
//! event. The lookup is a map read, and doing it per event means a callback
//! re-registered at runtime (or a config pointing at a different name) takes
//! effect without rebuilding the invoker.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use log::{debug, info};

use crate::constants::FUNCTION_PATH_SEPARATOR;
use crate::error::ResolutionError;
use crate::resource::ClusterResource;

/// A collect function: `(resource, destination_directory, context_name)`.
///
/// The destination exists when the function is called.
pub type CollectFn =
    Arc<dyn Fn(&dyn ClusterResource, &Path, &str) -> anyhow::Result<()> + Send + Sync>;

/// Splits `<module>.<function>` at the last separator.
pub fn split_function_path(dotted_path: &str) -> Result<(&str, &str), ResolutionError> {
    let invalid = || ResolutionError::InvalidPath(dotted_path.to_string());

    let (module, function) = dotted_path
        .trim()
        .rsplit_once(FUNCTION_PATH_SEPARATOR)
        .ok_or_else(invalid)?;
    if module.is_empty() || function.is_empty() {
        return Err(invalid());
    }

    Ok((module, function))
}

/// Registry mapping modules to their named collect functions.
#[derive(Default)]
pub struct CollectorRegistry {
    modules: RwLock<HashMap<String, HashMap<String, CollectFn>>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `dotted_path`, replacing any previous entry.
    pub fn register<F>(&self, dotted_path: &str, function: F) -> Result<(), ResolutionError>
    where
        F: Fn(&dyn ClusterResource, &Path, &str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let (module, name) = split_function_path(dotted_path)?;

        let mut modules = self
            .modules
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let replaced = modules
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string(), Arc::new(function))
            .is_some();

        if replaced {
            info!("Replaced collect function {}", dotted_path);
        } else {
            debug!("Registered collect function {}", dotted_path);
        }
        Ok(())
    }

    /// Remove a function; returns whether it was registered.
    pub fn unregister(&self, dotted_path: &str) -> Result<bool, ResolutionError> {
        let (module, name) = split_function_path(dotted_path)?;

        let mut modules = self
            .modules
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let removed = match modules.get_mut(module) {
            Some(functions) => functions.remove(name).is_some(),
            None => false,
        };
        if modules.get(module).map_or(false, |functions| functions.is_empty()) {
            modules.remove(module);
        }

        Ok(removed)
    }

    /// Resolve a dotted name to its callback.
    pub fn load(&self, dotted_path: &str) -> Result<CollectFn, ResolutionError> {
        let (module, name) = split_function_path(dotted_path)?;

        let modules = self
            .modules
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let functions = modules
            .get(module)
            .ok_or_else(|| ResolutionError::ModuleNotFound(module.to_string()))?;

        functions
            .get(name)
            .cloned()
            .ok_or_else(|| ResolutionError::FunctionNotFound {
                module: module.to_string(),
                function: name.to_string(),
            })
    }

    /// Registered dotted names, sorted
    pub fn function_paths(&self) -> Vec<String> {
        let modules = self
            .modules
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut paths: Vec<String> = modules
            .iter()
            .flat_map(|(module, functions)| {
                functions
                    .keys()
                    .map(move |name| format!("{}{}{}", module, FUNCTION_PATH_SEPARATOR, name))
            })
            .collect();
        paths.sort();
        paths
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("functions", &self.function_paths())
            .finish()
    }
}
