use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use orgsnap::application::snapshot::{SnapshotFactory, WaitOptions};
use orgsnap::config::{LoggingSettings, LogFormat, PlatformSettings, Settings, WaitSettings};
use orgsnap::infra::platform::{ConfigService, HttpConfigService};
use tracing::level_filters::LevelFilter;

use crate::args::ConnectionArgs;
use crate::client::{CliError, build_ctx};
use crate::io::parse_selection;

fn settings() -> Settings {
    Settings {
        platform: PlatformSettings {
            base_url: Some("https://config.example.com".to_string()),
            organization: Some("org-a".to_string()),
        },
        wait: WaitSettings {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
            max_attempts: None,
        },
        logging: LoggingSettings {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        },
    }
}

fn success_report_body() -> serde_json::Value {
    json!({
        "snapshot_id": "snp-1",
        "operation_id": "7f0f239f-ab1f-4f22-9b35-341fd1a3a5a2",
        "operation_type": "CREATE_SNAPSHOT",
        "status": "SUCCESS"
    })
}

fn fast_options() -> WaitOptions {
    WaitOptions {
        poll_interval: Duration::from_millis(1),
        timeout: Duration::from_secs(30),
        max_attempts: None,
        operation_to_wait_for: None,
    }
}

#[test]
fn token_file_wins_over_environment_token() {
    let mut file = tempfile::NamedTempFile::new().expect("token file");
    writeln!(file, "tok-from-file").expect("write token");

    let connection = ConnectionArgs {
        token_file: Some(file.path().to_path_buf()),
        access_token_env: Some("tok-from-env".to_string()),
        ..ConnectionArgs::default()
    };

    let ctx = build_ctx(&connection, &settings()).expect("ctx should build");
    assert_eq!(ctx.organization, "org-a");
}

#[test]
fn missing_token_is_rejected() {
    let err = build_ctx(&ConnectionArgs::default(), &settings())
        .expect_err("no token configured");
    assert!(matches!(err, CliError::MissingToken));
}

#[test]
fn flags_override_configured_platform() {
    let connection = ConnectionArgs {
        organization: Some("org-b".to_string()),
        access_token_env: Some("tok".to_string()),
        ..ConnectionArgs::default()
    };

    let ctx = build_ctx(&connection, &settings()).expect("ctx should build");
    assert_eq!(ctx.organization, "org-b");
}

#[test]
fn missing_platform_is_rejected() {
    let mut settings = settings();
    settings.platform.base_url = None;
    let connection = ConnectionArgs {
        access_token_env: Some("tok".to_string()),
        ..ConnectionArgs::default()
    };

    let err = build_ctx(&connection, &settings).expect_err("no base url configured");
    assert!(matches!(err, CliError::MissingPlatform));
}

#[test]
fn selection_parses_bare_types_and_id_lists() {
    let selection = parse_selection(&[
        "FIELD".to_string(),
        "SOURCE:src-1, src-2".to_string(),
    ])
    .expect("valid selection");

    assert_eq!(
        selection.resource_types().collect::<Vec<_>>(),
        vec!["FIELD", "SOURCE"]
    );
    assert!(!selection.is_empty());
}

#[test]
fn selection_rejects_empty_id_list() {
    let err = parse_selection(&["SOURCE:".to_string()]).expect_err("empty id list");
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[test]
fn selection_rejects_missing_type() {
    let err = parse_selection(&[":src-1".to_string()]).expect_err("missing type");
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[tokio::test]
async fn monitor_fetches_report_with_reports_included() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/organizations/org-a/snapshots/snp-1/report")
                .query_param("include_reports", "true");
            then.status(200).json_body(success_report_body());
        })
        .await;

    let service = Arc::new(
        HttpConfigService::new(&server.base_url(), "org-a", "tok").expect("service"),
    );
    let snapshot = SnapshotFactory::create_from_existing_id(
        service,
        "snp-1",
        "org-a",
        fast_options(),
        &CancellationToken::new(),
    )
    .await
    .expect("existing snapshot should resolve");

    assert_eq!(snapshot.id(), "snp-1");
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn delete_issues_a_delete_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/v1/organizations/org-a/snapshots/snp-1");
            then.status(204);
        })
        .await;

    let service = HttpConfigService::new(&server.base_url(), "org-a", "tok").expect("service");
    service.delete_snapshot("snp-1").await.expect("delete");

    mock.assert_async().await;
}

#[tokio::test]
async fn push_submits_archive_then_polls_the_report() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/organizations/org-a/snapshots/file")
                .query_param("file_type", "ZIP");
            then.status(201).json_body(success_report_body());
        })
        .await;
    let report = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/organizations/org-a/snapshots/snp-1/report");
            then.status(200).json_body(success_report_body());
        })
        .await;

    let service = Arc::new(
        HttpConfigService::new(&server.base_url(), "org-a", "tok").expect("service"),
    );
    let snapshot = SnapshotFactory::create_from_archive(
        service,
        bytes::Bytes::from_static(b"PK\x03\x04"),
        "org-a",
        fast_options(),
        &CancellationToken::new(),
    )
    .await
    .expect("archive push should succeed");

    assert_eq!(snapshot.id(), "snp-1");
    create.assert_async().await;
    report.assert_async().await;
}
