use std::borrow::Cow;

use thiserror::Error;

/// Message shown when the upstream repository lookup returns 404.
pub const MSG_NOT_FOUND: &str = "Repository not found";
/// Message shown when GitHub refuses the request (403, usually rate limiting).
pub const MSG_RATE_LIMITED: &str = "API rate limit exceeded. Please try again later.";
/// Message shown for every other upstream failure.
pub const MSG_FETCH_FAILED: &str = "Failed to fetch repository";
/// Message shown when the pasted link is not a repository URL.
pub const MSG_INVALID_URL: &str = "Invalid GitHub repository URL";

#[derive(Error, Debug)]
pub enum SnapRepoError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl SnapRepoError {
    /// HTTP status reported by GitHub, when the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SnapRepoError::NotFound(_) => Some(404),
            SnapRepoError::RateLimitExceeded(_) => Some(403),
            SnapRepoError::Upstream { status, .. } => Some(*status),
            SnapRepoError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable text surfaced to the person asking for a card.
    ///
    /// Upstream failures collapse to one of three fixed messages. `ApiError`
    /// carries text already meant for people (an envelope's `error` field) and
    /// is passed through.
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            SnapRepoError::NotFound(_) => Cow::Borrowed(MSG_NOT_FOUND),
            SnapRepoError::RateLimitExceeded(_) => Cow::Borrowed(MSG_RATE_LIMITED),
            SnapRepoError::InvalidRepoUrl(_) => Cow::Borrowed(MSG_INVALID_URL),
            SnapRepoError::ApiError(message) => Cow::Owned(message.clone()),
            _ => Cow::Borrowed(MSG_FETCH_FAILED),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapRepoError>;
