use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("request cancelled")]
    Cancelled,
}

pub type ApiResult<T> = Result<T, ApiError>;
