use thiserror::Error;

/// Failures reaching or understanding the Remote Configuration Service.
///
/// These are protocol-level faults of the orchestration itself, distinct from
/// content failures the service reports inside an otherwise well-formed
/// snapshot report.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Server { status: u16, body: String },
    #[error("failed to decode service response: {0}")]
    Decode(String),
    #[error("invalid request header: {0}")]
    InvalidHeader(String),
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
