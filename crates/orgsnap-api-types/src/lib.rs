//! Shared request and response types for the remote configuration snapshot API.
//!
//! These shapes mirror what the Remote Configuration Service puts on the wire;
//! they carry no behavior beyond cheap accessors so both the client library
//! and external tooling can depend on them without pulling in the HTTP stack.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Server-side status of a snapshot operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Success,
    Error,
    Aborted,
}

impl ReportStatus {
    /// A terminal status never transitions again without a new operation.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReportStatus::Success | ReportStatus::Error | ReportStatus::Aborted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::InProgress => "IN_PROGRESS",
            ReportStatus::Success => "SUCCESS",
            ReportStatus::Error => "ERROR",
            ReportStatus::Aborted => "ABORTED",
        }
    }
}

/// Kind of server-side job a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    CreateSnapshot,
    ApplySnapshot,
    ExportOrganization,
    /// Operation types introduced server-side after this crate was released.
    #[serde(other)]
    Other,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::CreateSnapshot => "CREATE_SNAPSHOT",
            ReportType::ApplySnapshot => "APPLY_SNAPSHOT",
            ReportType::ExportOrganization => "EXPORT_ORGANIZATION",
            ReportType::Other => "OTHER",
        }
    }
}

impl TryFrom<&str> for ReportType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, ()> {
        match value {
            "CREATE_SNAPSHOT" => Ok(ReportType::CreateSnapshot),
            "APPLY_SNAPSHOT" => Ok(ReportType::ApplySnapshot),
            "EXPORT_ORGANIZATION" => Ok(ReportType::ExportOrganization),
            _ => Err(()),
        }
    }
}

/// Outcome of one resource inside a snapshot operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceOutcome {
    Success,
    Skipped,
    Error,
}

impl ResourceOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, ResourceOutcome::Error)
    }
}

/// Per-resource result record inside a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOperationResult {
    pub resource_type: String,
    pub resource_id: String,
    pub outcome: ResourceOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Link between a snapshot resource and its counterpart in the target
/// environment, as resolved by a synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub resource_type: String,
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

/// Cross-environment diff record, present only for synchronization-capable
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynchronizationReport {
    pub id: Uuid,
    pub status: ReportStatus,
    #[serde(default)]
    pub linked_resources: Vec<ResourceLink>,
}

/// Status/result record the service maintains for one snapshot job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub snapshot_id: String,
    pub operation_id: Uuid,
    pub operation_type: ReportType,
    pub status: ReportStatus,
    #[serde(default)]
    pub resource_operation_results: Vec<ResourceOperationResult>,
    #[serde(default)]
    pub synchronization_reports: Vec<SynchronizationReport>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl SnapshotReport {
    /// Resource results that failed, in report order.
    pub fn failed_resources(&self) -> impl Iterator<Item = &ResourceOperationResult> {
        self.resource_operation_results
            .iter()
            .filter(|result| result.outcome.is_failure())
    }
}

/// Selection of resource types (optionally narrowed to specific ids) to
/// export from an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSelection {
    resources: BTreeMap<String, Option<Vec<String>>>,
}

impl ResourceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every resource of the given type.
    pub fn select_all(&mut self, resource_type: impl Into<String>) -> &mut Self {
        self.resources.insert(resource_type.into(), None);
        self
    }

    /// Select specific resources of the given type.
    pub fn select_ids(
        &mut self,
        resource_type: impl Into<String>,
        ids: impl IntoIterator<Item = String>,
    ) -> &mut Self {
        self.resources
            .insert(resource_type.into(), Some(ids.into_iter().collect()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

/// Caller-supplied metadata attached to a snapshot creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_note: Option<String>,
    #[serde(default)]
    pub include_children_resources: bool,
}

/// Options for fetching a snapshot report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetReportOptions {
    pub include_reports: bool,
    pub operation_type: Option<ReportType>,
}

/// Archive formats accepted by the file-based creation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFileType {
    Zip,
}

impl ArchiveFileType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveFileType::Zip => "ZIP",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ArchiveFileType::Zip => "application/zip",
        }
    }
}
