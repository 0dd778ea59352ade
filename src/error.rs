use reqwest::StatusCode;
use thiserror::Error;

use crate::model::transaction::RecordError;

#[derive(Debug, Error)]
pub enum AppErrors {
    // -- General error
    #[error("Error: {0}")]
    Error(String),

    #[error("Can't set tracing Global Default")]
    SetGlobalDefaultError(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Can't set the logger")]
    SetLoggerError(#[from] tracing_log::log::SetLoggerError),

    // -- Authorisation
    #[error("Failed to exchange auth code for access token: {0}")]
    AuthExchangeFailed(String),

    // -- Pipeline
    #[error("Malformed transaction {index} on page {page}: {source}")]
    MalformedRecord {
        page: usize,
        index: usize,
        #[source]
        source: RecordError,
    },

    #[error("Transactions request for page {page} failed: {reason}")]
    UpstreamRequestFailed { page: usize, reason: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Session channel closed")]
    SessionChannelClosed,

    // -- Server error
    #[error("Server error")]
    ServerError,

    #[error("Reqwest error: {0}")]
    ReqwestError(String),

    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("Failed to decode response at `{path}`: {reason}")]
    DecodeError { path: String, reason: String },

    #[error("Invalid header value {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid url: {0}")]
    UrlError(#[from] url::ParseError),

    // -- File error
    #[error("Failed to open file")]
    FileError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] config::ConfigError),
}

impl From<reqwest::Error> for AppErrors {
    fn from(error: reqwest::Error) -> Self {
        AppErrors::ReqwestError(error.to_string())
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for AppErrors {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        AppErrors::DecodeError {
            path: error.path().to_string(),
            reason: error.inner().to_string(),
        }
    }
}
