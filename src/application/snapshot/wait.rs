//! Poll loop driving a snapshot's server-side operation to a terminal state.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use orgsnap_api_types::{GetReportOptions, ReportType, SnapshotReport};

use crate::domain::reports::classify;

use super::{Snapshot, SnapshotError};

/// Polling budget for one wait.
///
/// `max_attempts` counts status queries: a wait with `max_attempts = 3`
/// performs exactly three fetches before giving up. The timeout is checked
/// after each fetch, so whichever bound trips first ends the wait.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub max_attempts: Option<u32>,
    /// Operation type the caller expects to observe. Guards against polling
    /// a stale report left by a different operation on the same snapshot.
    pub operation_to_wait_for: Option<ReportType>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
            max_attempts: None,
            operation_to_wait_for: None,
        }
    }
}

impl Snapshot {
    /// Poll the service until the operation reaches a terminal state.
    ///
    /// Terminal content failures are returned as data — the caller inspects
    /// the report. Only service faults, an exhausted budget, and cancellation
    /// are errors. Cancellation leaves the last successfully fetched report
    /// on the handle.
    pub async fn wait_until_done(
        &mut self,
        options: &WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<&SnapshotReport, SnapshotError> {
        let started = Instant::now();
        let get_options = GetReportOptions {
            include_reports: true,
            operation_type: options.operation_to_wait_for,
        };
        let mut attempts: u32 = 0;

        loop {
            let report = tokio::select! {
                () = cancel.cancelled() => return Err(SnapshotError::Cancelled),
                fetched = self.client.get_snapshot_report(&self.id, &get_options) => fetched?,
            };
            attempts += 1;
            self.report = report;

            let classification = classify(&self.report);
            if classification.is_terminal() {
                debug!(
                    target: "application::snapshot::wait",
                    snapshot_id = %self.id,
                    attempts,
                    status = self.report.status.as_str(),
                    "operation reached a terminal state"
                );
                break;
            }

            let attempts_exhausted = options.max_attempts.is_some_and(|max| attempts >= max);
            if attempts_exhausted || started.elapsed() >= options.timeout {
                return Err(SnapshotError::Timeout {
                    attempts,
                    elapsed: started.elapsed(),
                    last_status: self.report.status,
                });
            }

            tokio::select! {
                () = cancel.cancelled() => return Err(SnapshotError::Cancelled),
                () = sleep(options.poll_interval) => {}
            }
        }

        Ok(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use tokio_util::sync::CancellationToken;

    use orgsnap_api_types::ReportStatus;

    use super::super::testing::{ScriptedService, report};
    use super::*;

    fn fast_options() -> WaitOptions {
        WaitOptions {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_secs(60),
            max_attempts: None,
            operation_to_wait_for: None,
        }
    }

    fn snapshot_over(service: Arc<ScriptedService>) -> Snapshot {
        Snapshot::new(report(ReportStatus::Pending), "org-a", service)
    }

    #[tokio::test]
    async fn returns_terminal_report_after_exactly_three_queries() {
        let service = Arc::new(ScriptedService::new(vec![
            report(ReportStatus::Pending),
            report(ReportStatus::Pending),
            report(ReportStatus::Success),
        ]));
        let mut snapshot = snapshot_over(Arc::clone(&service));

        let final_status = snapshot
            .wait_until_done(&fast_options(), &CancellationToken::new())
            .await
            .expect("wait should succeed")
            .status;

        assert_eq!(final_status, ReportStatus::Success);
        assert_eq!(snapshot.report().status, ReportStatus::Success);
        assert_eq!(service.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn max_attempts_times_out_after_exactly_that_many_queries() {
        let service = Arc::new(ScriptedService::new(vec![report(
            ReportStatus::InProgress,
        )]));
        let mut snapshot = snapshot_over(Arc::clone(&service));
        let options = WaitOptions {
            max_attempts: Some(3),
            ..fast_options()
        };

        let err = snapshot
            .wait_until_done(&options, &CancellationToken::new())
            .await
            .expect_err("wait should time out");

        assert!(matches!(
            err,
            SnapshotError::Timeout {
                attempts: 3,
                last_status: ReportStatus::InProgress,
                ..
            }
        ));
        assert_eq!(service.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn elapsed_timeout_trips_without_max_attempts() {
        let service = Arc::new(ScriptedService::new(vec![report(ReportStatus::Pending)]));
        let mut snapshot = snapshot_over(service);
        let options = WaitOptions {
            timeout: Duration::from_millis(0),
            ..fast_options()
        };

        let err = snapshot
            .wait_until_done(&options, &CancellationToken::new())
            .await
            .expect_err("wait should time out");

        assert!(matches!(err, SnapshotError::Timeout { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn terminal_failure_is_returned_as_data() {
        let mut failed = report(ReportStatus::Error);
        failed
            .resource_operation_results
            .push(super::super::testing::failed_resource("FIELD", "bad mapping"));
        let service = Arc::new(ScriptedService::new(vec![failed]));
        let mut snapshot = snapshot_over(service);

        let final_report = snapshot
            .wait_until_done(&fast_options(), &CancellationToken::new())
            .await
            .expect("content failure is not a wait error");

        assert_eq!(final_report.status, ReportStatus::Error);
        assert_eq!(final_report.resource_operation_results.len(), 1);
    }

    #[tokio::test]
    async fn cancellation_keeps_last_fetched_report() {
        let cancel = CancellationToken::new();
        let service = Arc::new(ScriptedService::cancelling(
            vec![report(ReportStatus::InProgress)],
            cancel.clone(),
        ));
        let mut snapshot = snapshot_over(Arc::clone(&service));
        let options = WaitOptions {
            poll_interval: Duration::from_secs(60),
            ..fast_options()
        };

        let err = snapshot
            .wait_until_done(&options, &cancel)
            .await
            .expect_err("cancelled wait should fail");

        assert!(matches!(err, SnapshotError::Cancelled));
        assert_eq!(snapshot.report().status, ReportStatus::InProgress);
        assert_eq!(service.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forwards_expected_operation_type_to_the_service() {
        let service = Arc::new(ScriptedService::new(vec![report(ReportStatus::Success)]));
        let mut snapshot = snapshot_over(Arc::clone(&service));
        let options = WaitOptions {
            operation_to_wait_for: Some(ReportType::ApplySnapshot),
            ..fast_options()
        };

        snapshot
            .wait_until_done(&options, &CancellationToken::new())
            .await
            .expect("wait should succeed");

        let recorded = service.recorded_get_options.lock().expect("options lock");
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].include_reports);
        assert_eq!(recorded[0].operation_type, Some(ReportType::ApplySnapshot));
    }
}
