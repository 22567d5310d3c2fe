use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::collectors::call_guarded;
use crate::collectors::path_builder::PathBuilder;
use crate::collectors::pod_logs::PodLogCollector;
use crate::collectors::registry::CollectorRegistry;
use crate::config::{CollectorConfig, ConfigResolver};
use crate::error::FailureCause;
use crate::models::{
    CollectionContext, CollectionFailure, CollectionReport, CollectionResult, CollectionStage,
    PodLogSummary,
};
use crate::resource::{describe, ClusterResource};
use crate::security::scrub_credentials;

/// Where the dynamic base directory comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicBaseDir {
    /// Read the environment variable on every collection event
    Environment,
    Fixed(Option<String>),
}

/// Orchestrates collection events.
///
/// `collect` is best-effort: whatever goes wrong is logged and reported in
/// the returned [`CollectionResult`], never raised to the caller, who is
/// already handling the failure that triggered collection.
#[derive(Debug)]
pub struct CollectorInvoker {
    resolver: ConfigResolver,
    registry: Arc<CollectorRegistry>,
    dynamic_base_dir: DynamicBaseDir,
    pod_logs: PodLogCollector,
}

impl CollectorInvoker {
    pub fn new(resolver: ConfigResolver, registry: Arc<CollectorRegistry>) -> Self {
        Self {
            resolver,
            registry,
            dynamic_base_dir: DynamicBaseDir::Environment,
            pod_logs: PodLogCollector::new(),
        }
    }

    pub fn with_dynamic_base_dir(mut self, dynamic_base_dir: DynamicBaseDir) -> Self {
        self.dynamic_base_dir = dynamic_base_dir;
        self
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &Arc<CollectorRegistry> {
        &self.registry
    }

    fn path_builder(&self) -> PathBuilder {
        match &self.dynamic_base_dir {
            DynamicBaseDir::Environment => PathBuilder::from_env(),
            DynamicBaseDir::Fixed(dir) => PathBuilder::new(dir.clone()),
        }
    }

    /// Run one collection event for `resource`.
    pub fn collect(&self, resource: &dyn ClusterResource, context_name: &str) -> CollectionResult {
        let context = CollectionContext::new(context_name);
        self.collect_with_context(resource, &context)
    }

    pub fn collect_with_context(
        &self,
        resource: &dyn ClusterResource,
        context: &CollectionContext,
    ) -> CollectionResult {
        let target = describe(resource);

        let config = match self.resolver.resolve() {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("[Data collector] disabled, skipping {}", target);
                return CollectionResult::Skipped;
            }
            Err(e) => return fail(&target, CollectionStage::Idle, e.into(), None, None),
        };
        debug!("[Data collector] {:?} for {}", CollectionStage::ConfigResolved, target);

        let destination = match self.path_builder().build_destination(&config, context) {
            Ok(destination) => destination,
            Err(e) => return fail(&target, CollectionStage::ConfigResolved, e.into(), None, None),
        };
        debug!("[Data collector] {:?}: {}", CollectionStage::DirectoryReady, destination.display());

        let function = match self.registry.load(config.collect_data_function()) {
            Ok(function) => function,
            Err(e) => {
                return fail(
                    &target,
                    CollectionStage::DirectoryReady,
                    e.into(),
                    Some(destination),
                    None,
                )
            }
        };

        info!("[Data collector] Collecting data for {}", target);
        let outcome = call_guarded("collect function", || {
            function(resource, destination.as_path(), context.name.as_str())
        });

        let pod_logs = self.collect_pod_logs(&config, resource, &destination);

        match outcome {
            Ok(()) => {
                let artifact_count = count_artifacts(&destination);
                info!(
                    "[Data collector] {} artifact(s) for {} in {}",
                    artifact_count,
                    target,
                    destination.display()
                );
                debug!("[Data collector] {:?} for {}", CollectionStage::Done, target);
                CollectionResult::Collected(CollectionReport {
                    destination,
                    pod_logs,
                    artifact_count,
                })
            }
            Err(e) => fail(
                &target,
                CollectionStage::FunctionInvoked,
                FailureCause::Function(e),
                Some(destination),
                pod_logs,
            ),
        }
    }

    fn collect_pod_logs(
        &self,
        config: &CollectorConfig,
        resource: &dyn ClusterResource,
        destination: &Path,
    ) -> Option<PodLogSummary> {
        let pod = match resource.as_pod_log_source() {
            Some(pod) if config.collect_pod_logs() => pod,
            _ => {
                debug!("[Data collector] {:?} for {}", CollectionStage::LogsSkipped, describe(resource));
                return None;
            }
        };

        let summary = self.pod_logs.collect_logs(resource, pod, destination);
        debug!("[Data collector] {:?} for {}", CollectionStage::LogsCollected, describe(resource));
        Some(summary)
    }
}

fn fail(
    target: &str,
    stage: CollectionStage,
    cause: FailureCause,
    destination: Option<PathBuf>,
    pod_logs: Option<PodLogSummary>,
) -> CollectionResult {
    warn!(
        "[Data collector] failed to collect data for {} (after {:?})\nexception: {}",
        target,
        stage,
        scrub_credentials(&cause.to_string())
    );

    CollectionResult::Failed(CollectionFailure {
        stage,
        cause,
        destination,
        pod_logs,
    })
}

fn count_artifacts(destination: &Path) -> usize {
    WalkDir::new(destination)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}
