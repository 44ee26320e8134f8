//! Snapshot lifecycle commands.

#![deny(clippy::all, clippy::pedantic)]

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use orgsnap::application::snapshot::SnapshotFactory;
use orgsnap::domain::reports::{Classification, FailureKind, Outcome, classify};

use crate::args::SnapshotsCmd;
use crate::client::{CliError, Ctx};
use crate::io::{parse_selection, read_bytes};
use crate::print::print_json;

pub async fn handle(
    ctx: &Ctx,
    cmd: SnapshotsCmd,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    match cmd {
        SnapshotsCmd::Push { archive, wait } => {
            let bytes = Bytes::from(read_bytes(&archive)?);
            let snapshot = SnapshotFactory::create_from_archive(
                ctx.service.clone(),
                bytes,
                &ctx.organization,
                wait.resolve(&ctx.wait_defaults),
                cancel,
            )
            .await?;
            report_outcome(&snapshot)?;
        }
        SnapshotsCmd::Pull { resources, wait } => {
            let selection = parse_selection(&resources)?;
            let snapshot = SnapshotFactory::create_from_organization_export(
                ctx.service.clone(),
                &selection,
                &ctx.organization,
                wait.resolve(&ctx.wait_defaults),
                cancel,
            )
            .await?;
            report_outcome(&snapshot)?;
        }
        SnapshotsCmd::Monitor { id, wait } => {
            let snapshot = SnapshotFactory::create_from_existing_id(
                ctx.service.clone(),
                &id,
                &ctx.organization,
                wait.resolve(&ctx.wait_defaults),
                cancel,
            )
            .await?;
            report_outcome(&snapshot)?;
        }
        SnapshotsCmd::Delete { id } => {
            ctx.service.delete_snapshot(&id).await?;
            println!("Deleted snapshot {id}");
        }
    }
    Ok(())
}

/// Print the terminal report and flag content failures on stderr.
fn report_outcome(snapshot: &orgsnap::application::snapshot::Snapshot) -> Result<(), CliError> {
    if let Classification::Terminal(Outcome::Failure(kind)) = classify(snapshot.report()) {
        let failed: Vec<String> = snapshot
            .report()
            .failed_resources()
            .map(|result| format!("{}/{}", result.resource_type, result.resource_id))
            .collect();
        match kind {
            FailureKind::ContentValidation => warn!(
                target: "orgsnap_cli::snapshots",
                snapshot_id = %snapshot.id(),
                failed = %failed.join(", "),
                "snapshot content failed validation"
            ),
            FailureKind::Infrastructure => warn!(
                target: "orgsnap_cli::snapshots",
                snapshot_id = %snapshot.id(),
                status = snapshot.report().status.as_str(),
                "operation failed without resource-level detail"
            ),
        }
    }
    print_json(snapshot.report())
}
