//! Narrow seam over the Remote Configuration Service.
//!
//! The orchestrator only ever needs four calls: create a snapshot from raw
//! archive bytes, create one from a live organization export, fetch the
//! latest report for a snapshot, and delete a snapshot. Everything else the
//! service offers stays behind this trait so tests can script responses
//! without a network.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use orgsnap_api_types::{
    ArchiveFileType, GetReportOptions, ResourceSelection, SnapshotMetadata, SnapshotReport,
};

use super::error::PlatformError;

#[async_trait]
pub trait ConfigService: Send + Sync {
    /// Submit raw archive bytes as a new snapshot-creation job.
    async fn create_snapshot_from_bytes(
        &self,
        archive: Bytes,
        file_type: ArchiveFileType,
        metadata: &SnapshotMetadata,
    ) -> Result<SnapshotReport, PlatformError>;

    /// Request a live export of the selected resources as a new snapshot.
    async fn create_snapshot_from_organization(
        &self,
        selection: &ResourceSelection,
        metadata: &SnapshotMetadata,
    ) -> Result<SnapshotReport, PlatformError>;

    /// Fetch the latest report for a snapshot.
    async fn get_snapshot_report(
        &self,
        snapshot_id: &str,
        options: &GetReportOptions,
    ) -> Result<SnapshotReport, PlatformError>;

    /// Delete a snapshot server-side.
    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), PlatformError>;
}

/// HTTP binding for the Remote Configuration Service.
///
/// All configuration is passed in at construction time; nothing process-wide
/// is mutated, so any number of instances against different organizations can
/// coexist.
#[derive(Clone, Debug)]
pub struct HttpConfigService {
    client: Client,
    base: Url,
    organization: String,
    token: String,
}

impl HttpConfigService {
    pub fn new(
        base_url: &str,
        organization: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        let base = Url::parse(base_url)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            organization: organization.into(),
            token: token.into(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("orgsnap/", env!("CARGO_PKG_VERSION"))
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    fn auth_header(&self) -> Result<HeaderValue, PlatformError> {
        HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| PlatformError::InvalidHeader(e.to_string()))
    }

    fn snapshots_url(&self, rest: &str) -> Result<Url, PlatformError> {
        self.base
            .join(&format!(
                "api/v1/organizations/{}/snapshots{rest}",
                self.organization
            ))
            .map_err(PlatformError::Url)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, PlatformError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(PlatformError::Server {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|e| PlatformError::Decode(e.to_string()))
    }

    async fn expect_success(resp: Response) -> Result<(), PlatformError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlatformError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigService for HttpConfigService {
    async fn create_snapshot_from_bytes(
        &self,
        archive: Bytes,
        file_type: ArchiveFileType,
        metadata: &SnapshotMetadata,
    ) -> Result<SnapshotReport, PlatformError> {
        let mut url = self.snapshots_url("/file")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("file_type", file_type.as_str());
            if let Some(note) = &metadata.developer_note {
                query.append_pair("developer_note", note);
            }
        }

        let resp = self
            .client
            .request(Method::POST, url)
            .header(AUTHORIZATION, self.auth_header()?)
            .header(CONTENT_TYPE, file_type.content_type())
            .body(archive)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn create_snapshot_from_organization(
        &self,
        selection: &ResourceSelection,
        metadata: &SnapshotMetadata,
    ) -> Result<SnapshotReport, PlatformError> {
        let url = self.snapshots_url("/export")?;
        let body = json!({
            "resources_to_export": selection,
            "developer_note": metadata.developer_note,
            "include_children_resources": metadata.include_children_resources,
        });

        let resp = self
            .client
            .request(Method::POST, url)
            .header(AUTHORIZATION, self.auth_header()?)
            .json(&body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn get_snapshot_report(
        &self,
        snapshot_id: &str,
        options: &GetReportOptions,
    ) -> Result<SnapshotReport, PlatformError> {
        let mut url = self.snapshots_url(&format!("/{snapshot_id}/report"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("include_reports", if options.include_reports { "true" } else { "false" });
            if let Some(operation) = options.operation_type {
                query.append_pair("operation_type", operation.as_str());
            }
        }

        let resp = self
            .client
            .request(Method::GET, url)
            .header(AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), PlatformError> {
        let url = self.snapshots_url(&format!("/{snapshot_id}"))?;
        let resp = self
            .client
            .request(Method::DELETE, url)
            .header(AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;
        Self::expect_success(resp).await
    }
}
