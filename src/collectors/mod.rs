//! Data collection on failure.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           CollectorInvoker              │
//! ├──────────────┬──────────────┬───────────┤
//! │ConfigResolver│ PathBuilder  │ Registry  │
//! ├──────────────┴──────────────┴───────────┤
//! │           PodLogCollector               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! A failure handler calls [`CollectorInvoker::collect`] with the resource
//! and a context name. The invoker resolves the configuration, prepares
//! `<base>/<context>/`, calls the registered collect function and, when
//! enabled, saves container logs of pod-like resources next to its output.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ocp_data_collector::collectors::{CollectorInvoker, CollectorRegistry};
//! use ocp_data_collector::config::ConfigResolver;
//! # use ocp_data_collector::resource::ClusterResource;
//! # fn example(vm: &dyn ClusterResource) -> anyhow::Result<()> {
//! let registry = Arc::new(CollectorRegistry::new());
//! registry.register("utilities.data_collector.collect_data", |resource, directory, _test| {
//!     std::fs::write(directory.join(format!("{}.yaml", resource.name())), "...")?;
//!     Ok(())
//! })?;
//!
//! let invoker = CollectorInvoker::new(ConfigResolver::default(), registry);
//! let result = invoker.collect(vm, "tests/test_vm.py::test_start");
//! println!("{:?}", result.destination());
//! # Ok(())
//! # }
//! ```

/// Collection orchestration
pub mod invoker;

/// Destination directory computation
pub mod path_builder;

/// Container log collection for pod-like resources
pub mod pod_logs;

/// Named collect-function registry
pub mod registry;

pub use invoker::{CollectorInvoker, DynamicBaseDir};
pub use path_builder::PathBuilder;
pub use pod_logs::PodLogCollector;
pub use registry::{split_function_path, CollectFn, CollectorRegistry};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Runs caller-supplied code, turning a panic into an error about `what`.
pub(crate) fn call_guarded<T>(
    what: &str,
    f: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(panic_to_error(what, payload)))
}

fn panic_to_error(what: &str, payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    anyhow::anyhow!("{} panicked: {}", what, message)
}
