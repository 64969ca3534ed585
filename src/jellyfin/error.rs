// src/jellyfin/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the Jellyfin API client.
///
/// A key lookup that finds nothing is not an error; those operations
/// return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configured endpoint cannot carry additional path segments.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed with status {status}: {body}")]
    AuthFailed { status: StatusCode, body: String },

    #[error("authentication succeeded but no access token was returned")]
    MissingAccessToken,

    #[error("API request failed with status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
