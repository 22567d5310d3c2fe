use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::error::FailureCause;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Per-event input of a collection run.
#[derive(Debug, Clone)]
pub struct CollectionContext {
    /// Discriminator of the run, typically the failing test name
    pub name: String,
    pub timestamp: DateTime<Utc>,
    /// Process-wide increasing counter, distinguishes events with equal timestamps
    pub sequence: u64,
}

impl CollectionContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: Utc::now(),
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// Progress of a single collection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStage {
    Idle,
    ConfigResolved,
    DirectoryReady,
    FunctionInvoked,
    LogsCollected,
    LogsSkipped,
    Done,
}

/// Outcome of pod log collection for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodLogSummary {
    pub written: Vec<PathBuf>,
    /// `(container, reason)` for every container whose logs were not saved
    pub warnings: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct CollectionReport {
    pub destination: PathBuf,
    /// `None` when pod logs were not requested or the resource is not pod-like
    pub pod_logs: Option<PodLogSummary>,
    /// Files present under the destination once collection finished
    pub artifact_count: usize,
}

#[derive(Debug)]
pub struct CollectionFailure {
    /// Last stage reached before the failure
    pub stage: CollectionStage,
    pub cause: FailureCause,
    pub destination: Option<PathBuf>,
    pub pod_logs: Option<PodLogSummary>,
}

/// Result of [`CollectorInvoker::collect`](crate::collectors::CollectorInvoker::collect).
#[derive(Debug)]
pub enum CollectionResult {
    /// No configuration available, nothing was done
    Skipped,
    Collected(CollectionReport),
    Failed(CollectionFailure),
}

impl CollectionResult {
    pub fn is_skipped(&self) -> bool {
        matches!(self, CollectionResult::Skipped)
    }

    pub fn destination(&self) -> Option<&PathBuf> {
        match self {
            CollectionResult::Skipped => None,
            CollectionResult::Collected(report) => Some(&report.destination),
            CollectionResult::Failed(failure) => failure.destination.as_ref(),
        }
    }

    pub fn pod_logs(&self) -> Option<&PodLogSummary> {
        match self {
            CollectionResult::Skipped => None,
            CollectionResult::Collected(report) => report.pod_logs.as_ref(),
            CollectionResult::Failed(failure) => failure.pod_logs.as_ref(),
        }
    }
}
