//! Pure classification of snapshot reports.
//!
//! The classifier decides whether a report represents a still-running
//! operation or a terminal one, and for terminal failures whether the fault
//! lies in the snapshot's content or in the service infrastructure. It never
//! touches the network; the poll loop re-runs it on every fetched report.

use orgsnap_api_types::{ReportStatus, SnapshotReport};

/// Why a terminal operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// One or more resources failed validation; the report enumerates them.
    ContentValidation,
    /// The job itself died server-side with no resource-level detail.
    Infrastructure,
}

/// Final outcome of a terminal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(FailureKind),
}

/// Result of classifying one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Pending,
    Terminal(Outcome),
}

impl Classification {
    pub fn is_terminal(self) -> bool {
        matches!(self, Classification::Terminal(_))
    }
}

/// Classify a snapshot report. Deterministic and side-effect free.
pub fn classify(report: &SnapshotReport) -> Classification {
    match report.status {
        ReportStatus::Pending | ReportStatus::InProgress => Classification::Pending,
        ReportStatus::Success => Classification::Terminal(Outcome::Success),
        ReportStatus::Error | ReportStatus::Aborted => {
            let kind = if report.failed_resources().next().is_some() {
                FailureKind::ContentValidation
            } else {
                FailureKind::Infrastructure
            };
            Classification::Terminal(Outcome::Failure(kind))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgsnap_api_types::{
        ReportType, ResourceOperationResult, ResourceOutcome, SnapshotReport,
    };
    use uuid::Uuid;

    fn report(status: ReportStatus) -> SnapshotReport {
        SnapshotReport {
            snapshot_id: "snp-1".to_string(),
            operation_id: Uuid::new_v4(),
            operation_type: ReportType::CreateSnapshot,
            status,
            resource_operation_results: Vec::new(),
            synchronization_reports: Vec::new(),
            updated_at: None,
        }
    }

    fn failed_result(resource_type: &str) -> ResourceOperationResult {
        ResourceOperationResult {
            resource_type: resource_type.to_string(),
            resource_id: "res-1".to_string(),
            outcome: ResourceOutcome::Error,
            detail: Some("invalid field mapping".to_string()),
        }
    }

    #[test]
    fn pending_and_in_progress_are_not_terminal() {
        assert_eq!(
            classify(&report(ReportStatus::Pending)),
            Classification::Pending
        );
        assert_eq!(
            classify(&report(ReportStatus::InProgress)),
            Classification::Pending
        );
    }

    #[test]
    fn all_other_statuses_are_terminal() {
        for status in [
            ReportStatus::Success,
            ReportStatus::Error,
            ReportStatus::Aborted,
        ] {
            assert!(classify(&report(status)).is_terminal());
        }
    }

    #[test]
    fn success_classifies_as_success() {
        assert_eq!(
            classify(&report(ReportStatus::Success)),
            Classification::Terminal(Outcome::Success)
        );
    }

    #[test]
    fn error_with_failed_resources_is_content_validation() {
        let mut failed = report(ReportStatus::Error);
        failed.resource_operation_results.push(failed_result("FIELD"));

        assert_eq!(
            classify(&failed),
            Classification::Terminal(Outcome::Failure(FailureKind::ContentValidation))
        );
    }

    #[test]
    fn error_without_resource_detail_is_infrastructure() {
        for status in [ReportStatus::Error, ReportStatus::Aborted] {
            assert_eq!(
                classify(&report(status)),
                Classification::Terminal(Outcome::Failure(FailureKind::Infrastructure))
            );
        }
    }

    #[test]
    fn skipped_resources_do_not_count_as_content_failures() {
        let mut aborted = report(ReportStatus::Aborted);
        aborted.resource_operation_results.push(ResourceOperationResult {
            resource_type: "SOURCE".to_string(),
            resource_id: "res-2".to_string(),
            outcome: ResourceOutcome::Skipped,
            detail: None,
        });

        assert_eq!(
            classify(&aborted),
            Classification::Terminal(Outcome::Failure(FailureKind::Infrastructure))
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let mut failed = report(ReportStatus::Error);
        failed.resource_operation_results.push(failed_result("EXTENSION"));

        assert_eq!(classify(&failed), classify(&failed));
    }
}
