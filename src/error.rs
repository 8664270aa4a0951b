//! Failures surfaced to HTTP callers

use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;

use crate::slack::SlackError;

/// Which part of the service produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Exchanging an authorization code for a token failed
    #[serde(rename = "oauth_exchange")]
    OAuthExchange,
    /// A messaging call to the Web API failed
    RemoteCall,
}

/// Failure of an OAuth exchange or a relayed Web API call
///
/// Remote responses with `ok: false` are not failures; they are relayed as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("OAuth error: {0}")]
    OAuthExchange(String),

    #[error("{0}")]
    RemoteCall(String),
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::OAuthExchange(_) => FailureKind::OAuthExchange,
            AppError::RemoteCall(_) => FailureKind::RemoteCall,
        }
    }

    /// The bare failure reason, without any prefix
    pub fn message(&self) -> &str {
        match self {
            AppError::OAuthExchange(message) | AppError::RemoteCall(message) => message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            // Shown to the browser as a plain page, not an error status
            AppError::OAuthExchange(_) => StatusCode::OK,
            AppError::RemoteCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn oauth(err: SlackError) -> Self {
        AppError::OAuthExchange(err.to_string())
    }
}

impl From<SlackError> for AppError {
    fn from(err: SlackError) -> Self {
        AppError::RemoteCall(err.to_string())
    }
}

/// JSON body returned for failed messaging calls
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
