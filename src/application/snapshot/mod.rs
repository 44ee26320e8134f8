//! Snapshot handle and lifecycle errors.

mod factory;
mod wait;

pub use factory::SnapshotFactory;
pub use wait::WaitOptions;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use orgsnap_api_types::{
    GetReportOptions, ReportStatus, SnapshotReport, SynchronizationReport,
};

use crate::infra::error::PlatformError;
use crate::infra::platform::ConfigService;

/// Faults of the orchestration itself.
///
/// A snapshot whose content failed validation is NOT an error here: the
/// terminal report is returned as data so callers can enumerate every
/// per-resource failure. Only the inability to drive the operation — service
/// faults, an exhausted polling budget, cancellation, or a rejected request —
/// surfaces as `SnapshotError`.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("remote configuration service call failed: {0}")]
    Service(#[from] PlatformError),
    #[error(
        "operation still `{}` after {attempts} status checks over {elapsed:?}",
        .last_status.as_str()
    )]
    Timeout {
        attempts: u32,
        elapsed: Duration,
        last_status: ReportStatus,
    },
    #[error("wait cancelled before the operation reached a terminal state")]
    Cancelled,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// In-memory handle for one snapshot: its identity, the latest known report,
/// and the service binding used for follow-up calls.
///
/// The report is owned exclusively by the handle and replaced wholesale on
/// every poll; dropping the handle never deletes anything server-side.
pub struct Snapshot {
    id: String,
    target_organization: String,
    report: SnapshotReport,
    client: Arc<dyn ConfigService>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("id", &self.id)
            .field("target_organization", &self.target_organization)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl Snapshot {
    pub(crate) fn new(
        report: SnapshotReport,
        target_organization: impl Into<String>,
        client: Arc<dyn ConfigService>,
    ) -> Self {
        Self {
            id: report.snapshot_id.clone(),
            target_organization: target_organization.into(),
            report,
            client,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target_organization(&self) -> &str {
        &self.target_organization
    }

    /// Latest report fetched for this snapshot.
    pub fn report(&self) -> &SnapshotReport {
        &self.report
    }

    pub fn synchronization_reports(&self) -> &[SynchronizationReport] {
        &self.report.synchronization_reports
    }

    /// Distinct resource types touched by the operation, sorted.
    pub fn involved_resource_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .report
            .resource_operation_results
            .iter()
            .map(|result| result.resource_type.clone())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    /// Re-fetch the latest report once, outside the wait loop.
    pub async fn refresh(&mut self) -> Result<&SnapshotReport, SnapshotError> {
        let options = GetReportOptions {
            include_reports: true,
            operation_type: None,
        };
        self.report = self.client.get_snapshot_report(&self.id, &options).await?;
        Ok(&self.report)
    }

    /// Delete the snapshot server-side, consuming the handle.
    pub async fn delete(self) -> Result<(), SnapshotError> {
        self.client.delete_snapshot(&self.id).await?;
        Ok(())
    }
}
