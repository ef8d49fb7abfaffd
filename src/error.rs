//! Error handling

use thiserror::Error;

pub type AppResult<T> = Result<T, ConfigError>;

/// Configuration errors, raised before any request is made
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("server URL is required (use --cburl or CB_SERVER_URL)")]
    MissingServerUrl,

    #[error("API token is required (use --apitoken or CB_API_TOKEN)")]
    MissingApiToken,

    #[error("server URL must start with http:// or https://: {0}")]
    InvalidServerUrl(String),

    #[error("connection rate must be a non-negative number: {0}")]
    InvalidRate(f64),

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// API client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unauthorized: the server rejected the API token")]
    Unauthorized,

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::ParseError(err.to_string())
        } else {
            ClientError::NetworkError(err.to_string())
        }
    }
}
