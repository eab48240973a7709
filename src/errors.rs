use thiserror::Error;
use reqwest::StatusCode;
use std::error::Error;

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("Not found")]
    NotFound,
    #[error("Ratelimited")]
    Ratelimited,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Internal server error")]
    InternalServerError,
    #[error("Unknown status code {0}")]
    UnknownStatusCode(StatusCode),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Other error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl YouTubeError {
    /// Short machine-readable code, shared by the HTTP layer and the feed view.
    pub fn code(&self) -> &'static str {
        match self {
            YouTubeError::NotFound => "not_found",
            YouTubeError::Ratelimited => "rate_limited",
            YouTubeError::Unauthorized => "unauthorized",
            YouTubeError::Forbidden => "forbidden",
            YouTubeError::InternalServerError => "internal_server_error",
            YouTubeError::UnknownStatusCode(_) => "unknown_status",
            YouTubeError::ParseError(_) => "parse_error",
            YouTubeError::Other(_) => "transport_error",
        }
    }

    /// Whether retrying the same call later can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            YouTubeError::Ratelimited
                | YouTubeError::InternalServerError
                | YouTubeError::UnknownStatusCode(_)
                | YouTubeError::Other(_)
        )
    }
}

impl From<reqwest::Error> for YouTubeError {
    fn from(err: reqwest::Error) -> Self {
        YouTubeError::Other(Box::new(err))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}
