//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::Path, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "orgsnap";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub platform: PlatformSettings,
    pub wait: WaitSettings,
    pub logging: LoggingSettings,
}

/// Where the Remote Configuration Service lives and which organization the
/// client targets by default. Both may instead come from CLI flags.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    pub base_url: Option<String>,
    pub organization: Option<String>,
}

/// Default polling budget applied when a command does not override it.
#[derive(Debug, Clone)]
pub struct WaitSettings {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment).
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("ORGSNAP").separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    platform: RawPlatformSettings,
    wait: RawWaitSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPlatformSettings {
    base_url: Option<String>,
    organization: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawWaitSettings {
    poll_interval_seconds: Option<u64>,
    timeout_seconds: Option<u64>,
    max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    format: Option<String>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let level = match raw.logging.level {
            Some(level) => LevelFilter::from_str(level.as_str())
                .map_err(|err| LoadError::invalid("logging.level", err.to_string()))?,
            None => LevelFilter::INFO,
        };

        let format = match raw.logging.format.as_deref() {
            Some("json") => LogFormat::Json,
            Some("compact") | None => LogFormat::Compact,
            Some(other) => {
                return Err(LoadError::invalid(
                    "logging.format",
                    format!("expected `json` or `compact`, got `{other}`"),
                ));
            }
        };

        let poll_interval = raw
            .wait
            .poll_interval_seconds
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_interval == 0 {
            return Err(LoadError::invalid(
                "wait.poll_interval_seconds",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            platform: PlatformSettings {
                base_url: raw.platform.base_url,
                organization: raw.platform.organization,
            },
            wait: WaitSettings {
                poll_interval: Duration::from_secs(poll_interval),
                timeout: Duration::from_secs(
                    raw.wait.timeout_seconds.unwrap_or(DEFAULT_WAIT_TIMEOUT_SECS),
                ),
                max_attempts: raw.wait.max_attempts,
            },
            logging: LoggingSettings { level, format },
        })
    }
}
