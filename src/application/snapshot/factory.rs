//! Creation paths for snapshots.
//!
//! All three paths converge on the same shape: submit the server-side job,
//! wrap the returned report in a handle, and poll until the operation is
//! terminal. Callers never receive a handle in a pending state.

use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::info;

use orgsnap_api_types::{
    ArchiveFileType, GetReportOptions, ReportType, ResourceSelection, SnapshotMetadata,
};

use crate::infra::platform::ConfigService;

use super::{Snapshot, SnapshotError, WaitOptions};

/// Developer note stamped on snapshots built from a local archive.
pub const ARCHIVE_DEVELOPER_NOTE: &str = "orgsnap-created-from-archive";
/// Developer note stamped on snapshots built from a live organization export.
pub const EXPORT_DEVELOPER_NOTE: &str = "created-by-orgsnap";

pub struct SnapshotFactory;

impl SnapshotFactory {
    /// Create a snapshot from raw ZIP archive bytes.
    ///
    /// Waits for a `CreateSnapshot` operation unless the caller's options
    /// already name one.
    pub async fn create_from_archive(
        client: Arc<dyn ConfigService>,
        archive: Bytes,
        target_organization: &str,
        options: WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, SnapshotError> {
        let metadata = SnapshotMetadata {
            developer_note: Some(ARCHIVE_DEVELOPER_NOTE.to_string()),
            include_children_resources: false,
        };
        let report = client
            .create_snapshot_from_bytes(archive, ArchiveFileType::Zip, &metadata)
            .await?;

        let mut snapshot = Snapshot::new(report, target_organization, client);
        let options = WaitOptions {
            operation_to_wait_for: options
                .operation_to_wait_for
                .or(Some(ReportType::CreateSnapshot)),
            ..options
        };
        snapshot.wait_until_done(&options, cancel).await?;

        info!(
            target: "application::snapshot::factory",
            snapshot_id = %snapshot.id(),
            organization = target_organization,
            "snapshot created from archive"
        );
        Ok(snapshot)
    }

    /// Wrap an already-created snapshot, waiting with the caller's options
    /// untouched.
    ///
    /// No operation type is forced here on purpose: the snapshot may already
    /// be terminal, or mid-way through whatever operation the caller cares
    /// about, and pinning `CreateSnapshot` would make the wait spin on a
    /// stale report.
    pub async fn create_from_existing_id(
        client: Arc<dyn ConfigService>,
        snapshot_id: &str,
        target_organization: &str,
        options: WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, SnapshotError> {
        let get_options = GetReportOptions {
            include_reports: true,
            operation_type: None,
        };
        let report = client.get_snapshot_report(snapshot_id, &get_options).await?;

        let mut snapshot = Snapshot::new(report, target_organization, client);
        snapshot.wait_until_done(&options, cancel).await?;
        Ok(snapshot)
    }

    /// Create a snapshot by exporting live resources from the organization.
    ///
    /// Child resources are always included so the snapshot is
    /// self-contained. Rejects an empty selection before any network call.
    pub async fn create_from_organization_export(
        client: Arc<dyn ConfigService>,
        selection: &ResourceSelection,
        target_organization: &str,
        options: WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, SnapshotError> {
        if selection.is_empty() {
            return Err(SnapshotError::InvalidRequest(
                "resource selection must name at least one resource type".to_string(),
            ));
        }

        let metadata = SnapshotMetadata {
            developer_note: Some(EXPORT_DEVELOPER_NOTE.to_string()),
            include_children_resources: true,
        };
        let report = client
            .create_snapshot_from_organization(selection, &metadata)
            .await?;

        let mut snapshot = Snapshot::new(report, target_organization, client);
        let options = WaitOptions {
            operation_to_wait_for: options
                .operation_to_wait_for
                .or(Some(ReportType::CreateSnapshot)),
            ..options
        };
        snapshot.wait_until_done(&options, cancel).await?;

        info!(
            target: "application::snapshot::factory",
            snapshot_id = %snapshot.id(),
            organization = target_organization,
            "snapshot created from organization export"
        );
        Ok(snapshot)
    }
}
