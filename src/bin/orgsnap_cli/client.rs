//! Wiring from parsed arguments to a ready-to-use service binding.

#![deny(clippy::all, clippy::pedantic)]

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use orgsnap::application::snapshot::SnapshotError;
use orgsnap::application::template::TemplateValidationError;
use orgsnap::config::{LoadError, Settings, WaitSettings};
use orgsnap::infra::error::{InfraError, PlatformError};
use orgsnap::infra::platform::{ConfigService, HttpConfigService};

use crate::args::ConnectionArgs;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(
        "no service URL configured; pass --platform or set `platform.base_url` in the config file"
    )]
    MissingPlatform,
    #[error(
        "no organization configured; pass --organization or set `platform.organization` in the config file"
    )]
    MissingOrganization,
    #[error("no access token configured; pass --token-file or set ORGSNAP_ACCESS_TOKEN")]
    MissingToken,
    #[error("failed to read token file: {0}")]
    TokenFile(#[source] io::Error),
    #[error("failed to read `{path}`: {source}")]
    InputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Render(String),
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Template(#[from] TemplateValidationError),
}

/// Everything a snapshot command needs: the service binding, the organization
/// it targets, and the configured polling defaults.
pub struct Ctx {
    pub service: Arc<dyn ConfigService>,
    pub organization: String,
    pub wait_defaults: WaitSettings,
}

impl std::fmt::Debug for Ctx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ctx")
            .field("organization", &self.organization)
            .field("wait_defaults", &self.wait_defaults)
            .finish_non_exhaustive()
    }
}

/// Resolve connection flags over file/env settings and build the HTTP binding.
///
/// Token precedence: an explicit token file always wins over the environment
/// variable, so a stale shell export cannot shadow a rotated on-disk token.
pub fn build_ctx(connection: &ConnectionArgs, settings: &Settings) -> Result<Ctx, CliError> {
    let base_url = connection
        .platform
        .clone()
        .or_else(|| settings.platform.base_url.clone())
        .ok_or(CliError::MissingPlatform)?;
    let organization = connection
        .organization
        .clone()
        .or_else(|| settings.platform.organization.clone())
        .ok_or(CliError::MissingOrganization)?;

    let token = match &connection.token_file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(CliError::TokenFile)?
            .trim()
            .to_string(),
        None => connection
            .access_token_env
            .clone()
            .ok_or(CliError::MissingToken)?,
    };
    if token.is_empty() {
        return Err(CliError::MissingToken);
    }

    let service = HttpConfigService::new(&base_url, organization.clone(), token)?;
    Ok(Ctx {
        service: Arc::new(service),
        organization,
        wait_defaults: settings.wait.clone(),
    })
}
