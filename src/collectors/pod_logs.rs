use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::collectors::call_guarded;
use crate::constants::LOG_FILE_EXTENSION;
use crate::models::PodLogSummary;
use crate::resource::{describe, ClusterResource, PodLogSource};
use crate::security::{sanitize_path_component, scrub_credentials};

/// Warning key used when the container list itself could not be read
const ALL_CONTAINERS: &str = "*";

/// Saves container logs of pod-like resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PodLogCollector;

impl PodLogCollector {
    pub fn new() -> Self {
        Self
    }

    /// Log file of one container: `<destination>/<sanitized container>.log`
    pub fn log_file_path(destination: &Path, container: &str) -> PathBuf {
        destination.join(format!(
            "{}.{}",
            sanitize_path_component(container),
            LOG_FILE_EXTENSION
        ))
    }

    /// Write one log file per container, init containers first.
    ///
    /// A container whose logs cannot be fetched or written is recorded as a
    /// warning and skipped; pods in crash or pending states routinely have
    /// containers that never started. Panics from `pod` count as failures of
    /// the container being fetched. If listing the containers fails, a single
    /// warning under the name `*` is recorded.
    pub fn collect_logs(
        &self,
        resource: &dyn ClusterResource,
        pod: &dyn PodLogSource,
        destination: &Path,
    ) -> PodLogSummary {
        let mut summary = PodLogSummary::default();
        let listing = call_guarded("listing containers", || {
            let mut containers = pod.init_containers().unwrap_or_default();
            containers.extend(pod.containers());
            Ok(containers)
        });
        let containers = match listing {
            Ok(containers) => containers,
            Err(e) => {
                record_warning(&mut summary, resource, ALL_CONTAINERS.to_string(), &e);
                return summary;
            }
        };

        debug!(
            "Collecting logs of {} container(s) of {}",
            containers.len(),
            describe(resource)
        );

        for container in containers {
            let path = Self::log_file_path(destination, &container);
            let outcome = call_guarded("container log retrieval", || {
                let log = pod.container_log(&container)?;
                fs::write(&path, log)?;
                Ok(())
            });

            match outcome {
                Ok(()) => summary.written.push(path),
                Err(e) => record_warning(&mut summary, resource, container, &e),
            }
        }

        info!(
            "[Data collector] saved {} container log(s) of {} ({} skipped)",
            summary.written.len(),
            describe(resource),
            summary.warnings.len()
        );
        summary
    }
}

fn record_warning(
    summary: &mut PodLogSummary,
    resource: &dyn ClusterResource,
    container: String,
    error: &anyhow::Error,
) {
    let reason = scrub_credentials(&format!("{:#}", error));
    warn!(
        "[Data collector] failed to collect logs of container {} of {}: {}",
        container,
        describe(resource),
        reason
    );
    summary.warnings.push((container, reason));
}
