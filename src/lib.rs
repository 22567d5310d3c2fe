//! # ocp_data_collector
//!
//! Failure-time diagnostics collection for OpenShift/Kubernetes cluster
//! resources.
//!
//! ## Overview
//!
//! When a test or an operation against a cluster resource fails, the failure
//! handler hands the resource to a [`CollectorInvoker`]. The invoker captures
//! supporting artifacts into a directory for post-mortem analysis:
//!
//! - whatever the registered collect function writes (resource YAML, events, ...)
//! - container logs, when enabled and the resource is pod-like
//!
//! Collection is best-effort. It never raises into the caller, which is
//! already handling the primary failure.
//!
//! ## Configuration
//!
//! Either a YAML file named by `OPENSHIFT_PYTHON_WRAPPER_DATA_COLLECTOR_YAML`
//! or a `data_collector` entry in the ambient settings object:
//!
//! ```yaml
//! data_collector_base_directory: "tests-collected-info"
//! collect_data_function: "utilities.data_collector.collect_data"
//! collect_pod_logs: true
//! ```
//!
//! The environment variable wins when both are present. Without either,
//! collection is disabled. `OPENSHIFT_PYTHON_WRAPPER_DATA_COLLECTOR_DYNAMIC_BASE_DIR`
//! inserts an extra directory above the base directory's leaf.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use ocp_data_collector::collectors::{CollectorInvoker, CollectorRegistry};
//! use ocp_data_collector::config::{AmbientConfigProvider, ConfigResolver};
//! use ocp_data_collector::resource::ClusterResource;
//!
//! # fn example(failed_vm: &dyn ClusterResource) -> anyhow::Result<()> {
//! let registry = Arc::new(CollectorRegistry::new());
//! registry.register("utilities.data_collector.collect_data", |resource, directory, _| {
//!     std::fs::write(directory.join("resource.txt"), resource.name())?;
//!     Ok(())
//! })?;
//!
//! let ambient = AmbientConfigProvider::from_yaml_str(
//!     "data_collector:\n  data_collector_base_directory: tests-collected-info\n  collect_data_function: utilities.data_collector.collect_data\n",
//! )?;
//! let invoker = CollectorInvoker::new(ConfigResolver::with_ambient(Some(ambient)), registry);
//!
//! let result = invoker.collect(failed_vm, "tests/test_vm.py::test_migration");
//! if let Some(destination) = result.destination() {
//!     println!("Collected into {}", destination.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collectors`]: invoker, destination paths, function registry, pod logs
//! - [`config`]: configuration parsing and provider chain
//! - [`resource`]: traits the cluster client implements for its resources
//! - [`models`]: collection context and results
//! - [`error`]: error taxonomy
//! - [`security`]: name sanitization and credential scrubbing
//! - [`utils`]: must-gather, extras files, logger setup
//! - [`constants`]: environment variable names and naming rules

/// Data collection on failure
pub mod collectors;

/// Collector configuration and its sources
pub mod config;

/// Environment variable names, configuration keys and naming rules
pub mod constants;

/// Error types for every collection stage
pub mod error;

/// Collection context and result types
pub mod models;

/// Seam to the external cluster client
pub mod resource;

/// Name sanitization and credential scrubbing
pub mod security;

/// must-gather, extras files and logger setup
pub mod utils;

pub use collectors::{CollectorInvoker, CollectorRegistry, PathBuilder, PodLogCollector};
pub use config::{CollectorConfig, ConfigResolver};
pub use error::{ConfigError, FailureCause, ResolutionError, StorageError};
pub use models::{CollectionContext, CollectionResult};
pub use resource::{ClusterResource, PodLogSource};
