//! Integration tests for end-to-end collection events.
//!
//! These tests drive the public API the way a failure handler would: build a
//! registry and a resolver, then call `collect` with a failing resource.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tempfile::TempDir;
use walkdir::WalkDir;

use ocp_data_collector::collectors::{CollectorInvoker, CollectorRegistry, DynamicBaseDir};
use ocp_data_collector::config::{AmbientConfigProvider, ConfigResolver, EnvYamlProvider};
use ocp_data_collector::error::FailureCause;
use ocp_data_collector::models::CollectionResult;
use ocp_data_collector::resource::{ClusterResource, PodLogSource};

const COLLECT_FUNCTION: &str = "utilities.data_collector.collect_data";

/// A pod whose containers either return logs or fail
struct TestPod {
    name: String,
    containers: Vec<(&'static str, Option<&'static str>)>,
    log_requests: AtomicUsize,
}

impl TestPod {
    fn new(containers: Vec<(&'static str, Option<&'static str>)>) -> Self {
        Self {
            name: "virt-launcher-fedora-vm-x7k2p".to_string(),
            containers,
            log_requests: AtomicUsize::new(0),
        }
    }
}

impl ClusterResource for TestPod {
    fn kind(&self) -> &str {
        "Pod"
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn namespace(&self) -> Option<&str> {
        Some("virt-tests")
    }
    fn as_pod_log_source(&self) -> Option<&dyn PodLogSource> {
        Some(self)
    }
}

impl PodLogSource for TestPod {
    fn containers(&self) -> Vec<String> {
        self.containers.iter().map(|(name, _)| name.to_string()).collect()
    }

    fn container_log(&self, container: &str) -> Result<String> {
        self.log_requests.fetch_add(1, Ordering::SeqCst);
        self.containers
            .iter()
            .find(|(name, _)| *name == container)
            .and_then(|(_, log)| log.map(str::to_string))
            .ok_or_else(|| anyhow!("container {} is waiting to start: ContainerCreating", container))
    }
}

/// A cluster-scoped resource without log capability
struct TestNode;

impl ClusterResource for TestNode {
    fn kind(&self) -> &str {
        "Node"
    }
    fn name(&self) -> &str {
        "worker-0"
    }
    fn namespace(&self) -> Option<&str> {
        None
    }
}

fn registry_writing_yaml() -> Result<Arc<CollectorRegistry>> {
    let registry = CollectorRegistry::new();
    registry.register(COLLECT_FUNCTION, |resource, directory, context| {
        fs::write(
            directory.join(format!("{}.yaml", resource.name())),
            format!("kind: {}\nname: {}\n# {}\n", resource.kind(), resource.name(), context),
        )?;
        Ok(())
    })?;
    Ok(Arc::new(registry))
}

fn ambient_resolver(base: &Path, collect_pod_logs: bool) -> Result<ConfigResolver> {
    let yaml = format!(
        "data_collector:\n  data_collector_base_directory: {}\n  collect_data_function: {}\n  collect_pod_logs: {}\n",
        base.display(),
        COLLECT_FUNCTION,
        collect_pod_logs
    );
    Ok(ConfigResolver::new(vec![
        Box::new(EnvYamlProvider::new("OCP_DC_INTEGRATION_UNSET_VAR")),
        Box::new(AmbientConfigProvider::from_yaml_str(&yaml)?),
    ]))
}

fn files_under(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    files
}

/// No configuration: the collect function never runs and the result is Skipped
#[test]
fn test_no_config_is_a_noop() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = CollectorRegistry::new();
    let counter = Arc::clone(&calls);
    registry.register(COLLECT_FUNCTION, move |_, directory, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        fs::write(directory.join("unexpected.txt"), "written")?;
        Ok(())
    })?;

    let resolver = ConfigResolver::new(vec![
        Box::new(EnvYamlProvider::new("OCP_DC_INTEGRATION_UNSET_VAR")),
        Box::new(AmbientConfigProvider::from_yaml_str("unrelated: true")?),
    ]);
    let invoker = CollectorInvoker::new(resolver, Arc::new(registry))
        .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));
    let pod = TestPod::new(vec![("compute", Some("started"))]);

    let result = invoker.collect(&pod, "tests/test_vm.py::test_start");

    assert!(result.is_skipped());
    assert!(result.destination().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(pod.log_requests.load(Ordering::SeqCst), 0);
    Ok(())
}

/// Full collection with one crashing and one healthy container
#[test]
fn test_partial_pod_log_collection() -> Result<()> {
    let workspace = TempDir::new()?;
    let base = workspace.path().join("collected-info");
    let invoker = CollectorInvoker::new(ambient_resolver(&base, true)?, registry_writing_yaml()?)
        .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));
    let pod = TestPod::new(vec![("compute", Some("VMI started\n")), ("hotplug", None)]);

    let result = invoker.collect(&pod, "tests/test_vm.py::TestVM::test_hotplug[disk]");

    let report = match result {
        CollectionResult::Collected(report) => report,
        other => panic!("expected a collected result, got {:?}", other),
    };
    assert_eq!(
        report.destination,
        base.join("tests_test_vm.py__TestVM__test_hotplug_disk_")
    );

    let pod_logs = report.pod_logs.expect("pod logs should have been collected");
    assert_eq!(pod_logs.written, vec![report.destination.join("compute.log")]);
    assert_eq!(pod_logs.warnings.len(), 1);
    assert_eq!(pod_logs.warnings[0].0, "hotplug");

    assert_eq!(
        files_under(&report.destination),
        vec!["compute.log", "virt-launcher-fedora-vm-x7k2p.yaml"]
    );
    assert_eq!(report.artifact_count, 2);
    Ok(())
}

/// Pod logs disabled: the log capability is never touched
#[test]
fn test_pod_logs_disabled_never_fetches() -> Result<()> {
    let workspace = TempDir::new()?;
    let invoker = CollectorInvoker::new(
        ambient_resolver(workspace.path(), false)?,
        registry_writing_yaml()?,
    )
    .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));
    let pod = TestPod::new(vec![("compute", Some("log"))]);

    let result = invoker.collect(&pod, "test_no_logs");

    assert!(matches!(result, CollectionResult::Collected(_)));
    assert!(result.pod_logs().is_none());
    assert_eq!(pod.log_requests.load(Ordering::SeqCst), 0);
    Ok(())
}

/// Non pod-like resources get no log collection even when enabled
#[test]
fn test_non_pod_resource() -> Result<()> {
    let workspace = TempDir::new()?;
    let invoker = CollectorInvoker::new(
        ambient_resolver(workspace.path(), true)?,
        registry_writing_yaml()?,
    )
    .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));

    let result = invoker.collect(&TestNode, "test_node_drain");

    let destination = result.destination().expect("destination").clone();
    assert!(result.pod_logs().is_none());
    assert_eq!(files_under(&destination), vec!["worker-0.yaml"]);
    Ok(())
}

/// A failing collect function is reported, never raised
#[test]
fn test_failing_function_is_contained() -> Result<()> {
    let workspace = TempDir::new()?;
    let registry = CollectorRegistry::new();
    registry.register(COLLECT_FUNCTION, |_, _, _| {
        Err(anyhow!("oc adm inspect timed out"))
    })?;
    let invoker = CollectorInvoker::new(ambient_resolver(workspace.path(), true)?, Arc::new(registry))
        .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));
    let pod = TestPod::new(vec![("compute", Some("log"))]);

    let result = invoker.collect(&pod, "test_inspect");

    match result {
        CollectionResult::Failed(failure) => {
            assert!(matches!(failure.cause, FailureCause::Function(_)));
            assert!(failure.cause.to_string().contains("timed out"));
            // Logs are still collected after the function failed
            assert_eq!(failure.pod_logs.map(|logs| logs.written.len()), Some(1));
        }
        other => panic!("expected a failure, got {:?}", other),
    }
    Ok(())
}

/// Registering a new function under the configured name takes effect at once
#[test]
fn test_late_registration() -> Result<()> {
    let workspace = TempDir::new()?;
    let registry = Arc::new(CollectorRegistry::new());
    let invoker = CollectorInvoker::new(ambient_resolver(workspace.path(), false)?, Arc::clone(&registry))
        .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));

    let result = invoker.collect(&TestNode, "test_before");
    assert!(matches!(
        result,
        CollectionResult::Failed(ref failure) if matches!(failure.cause, FailureCause::Resolution(_))
    ));

    registry.register(COLLECT_FUNCTION, |_, directory, _| {
        fs::write(directory.join("late.txt"), "registered late")?;
        Ok(())
    })?;

    let result = invoker.collect(&TestNode, "test_after");
    let destination = result.destination().expect("destination").clone();
    assert!(matches!(result, CollectionResult::Collected(_)));
    assert!(destination.join("late.txt").is_file());
    Ok(())
}

/// Repeated events for the same context reuse the directory
#[test]
fn test_repeated_context_reuses_directory() -> Result<()> {
    let workspace = TempDir::new()?;
    let base = workspace.path().join("collected-info");
    let invoker = CollectorInvoker::new(ambient_resolver(&base, false)?, registry_writing_yaml()?)
        .with_dynamic_base_dir(DynamicBaseDir::Fixed(Some("run-1".to_string())));

    let first = invoker.collect(&TestNode, "test_same");
    let second = invoker.collect(&TestNode, "test_same");

    let expected = workspace
        .path()
        .join("run-1")
        .join("collected-info")
        .join("test_same");
    assert_eq!(first.destination(), Some(&expected));
    assert_eq!(second.destination(), Some(&expected));
    assert!(matches!(second, CollectionResult::Collected(_)));
    assert_eq!(files_under(&expected), vec!["worker-0.yaml"]);
    Ok(())
}

/// A pod whose log client panics
struct PanickingPod;

impl ClusterResource for PanickingPod {
    fn kind(&self) -> &str {
        "Pod"
    }
    fn name(&self) -> &str {
        "virt-launcher-broken"
    }
    fn namespace(&self) -> Option<&str> {
        Some("virt-tests")
    }
    fn as_pod_log_source(&self) -> Option<&dyn PodLogSource> {
        Some(self)
    }
}

impl PodLogSource for PanickingPod {
    fn containers(&self) -> Vec<String> {
        vec!["compute".to_string()]
    }

    fn container_log(&self, _container: &str) -> Result<String> {
        panic!("client bug")
    }
}

/// Panics from the log client stay inside the collection event
#[test]
fn test_panicking_log_client_is_contained() -> Result<()> {
    let workspace = TempDir::new()?;
    let invoker = CollectorInvoker::new(
        ambient_resolver(workspace.path(), true)?,
        registry_writing_yaml()?,
    )
    .with_dynamic_base_dir(DynamicBaseDir::Fixed(None));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        invoker.collect(&PanickingPod, "test_panicking_client")
    }));

    let result = result.expect("collect must not panic");
    let report = match result {
        CollectionResult::Collected(report) => report,
        other => panic!("expected a collected result, got {:?}", other),
    };
    let pod_logs = report.pod_logs.expect("pod logs were requested");
    assert!(pod_logs.written.is_empty());
    assert_eq!(pod_logs.warnings.len(), 1);
    assert!(pod_logs.warnings[0].1.contains("client bug"));
    assert_eq!(files_under(&report.destination), vec!["virt-launcher-broken.yaml"]);
    Ok(())
}
