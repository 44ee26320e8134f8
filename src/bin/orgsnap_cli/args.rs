//! Command-line surface for `orgsnap-cli`.
//! Kept in a shared file so tests can reuse the same definitions as the
//! binary itself.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use orgsnap::application::snapshot::WaitOptions;
use orgsnap::config::WaitSettings;
use orgsnap_api_types::ReportType;

#[derive(Parser, Debug)]
#[command(
    name = "orgsnap-cli",
    version,
    about = "Remote configuration snapshot CLI",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Optional path to a configuration file
    #[arg(long = "config-file", env = "ORGSNAP_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Service base URL, e.g. <https://config.example.com>
    #[arg(long, env = "ORGSNAP_PLATFORM_URL")]
    pub platform: Option<String>,

    /// Organization the command targets
    #[arg(long, env = "ORGSNAP_ORGANIZATION")]
    pub organization: Option<String>,

    /// Path to file containing the access token (takes precedence over env)
    #[arg(long, env = "ORGSNAP_ACCESS_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Access token; prefer `--token-file` or the env var so the token stays
    /// out of shell history
    #[arg(long = "access-token", hide = true, env = "ORGSNAP_ACCESS_TOKEN")]
    pub access_token_env: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Snapshot lifecycle operations
    Snapshots(SnapshotsArgs),
    /// Page-template package tooling
    Templates(TemplatesArgs),
}

#[derive(Parser, Debug)]
pub struct SnapshotsArgs {
    #[command(subcommand)]
    pub action: SnapshotsCmd,
}

#[derive(Subcommand, Debug)]
pub enum SnapshotsCmd {
    /// Create a snapshot from a local ZIP archive and wait for it
    Push {
        archive: PathBuf,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Export live resources from the organization into a new snapshot
    Pull {
        /// Resource selection, `TYPE` or `TYPE:id1,id2`; repeatable
        #[arg(long = "resource", required = true)]
        resources: Vec<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait for an existing snapshot's current operation and print its report
    Monitor {
        id: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Delete a snapshot server-side
    Delete { id: String },
}

#[derive(Args, Debug, Default)]
pub struct WaitArgs {
    /// Seconds between status checks
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Overall wait budget in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of status checks before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Operation type the wait should observe
    #[arg(long = "wait-for", value_enum)]
    pub wait_for: Option<OperationArg>,
}

impl WaitArgs {
    /// Resolve flags over the configured defaults.
    pub fn resolve(&self, defaults: &WaitSettings) -> WaitOptions {
        WaitOptions {
            poll_interval: self
                .poll_interval_secs
                .map_or(defaults.poll_interval, Duration::from_secs),
            timeout: self.timeout_secs.map_or(defaults.timeout, Duration::from_secs),
            max_attempts: self.max_attempts.or(defaults.max_attempts),
            operation_to_wait_for: self.wait_for.map(ReportType::from),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OperationArg {
    Create,
    Apply,
    Export,
}

impl From<OperationArg> for ReportType {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::Create => ReportType::CreateSnapshot,
            OperationArg::Apply => ReportType::ApplySnapshot,
            OperationArg::Export => ReportType::ExportOrganization,
        }
    }
}

#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub action: TemplatesCmd,
}

#[derive(Subcommand, Debug)]
pub enum TemplatesCmd {
    /// Validate a page-template package against its schema
    Validate {
        template: PathBuf,
        /// Schema file; the built-in page-template schema is used when omitted
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}
