use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a remote inference call. Never terminal for the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited,

    #[error("API request failed with status code {}: {body}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("failed to build inference client: {0}")]
    Client(String),
}
