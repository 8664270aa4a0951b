//! Error types for the Slack client

use thiserror::Error;

/// Errors that can occur when calling the Slack Web API
///
/// A 2xx response carrying `ok: false` is not an error at this layer.
#[derive(Debug, Error)]
pub enum SlackError {
    /// Transport failure: DNS, connect, TLS, reset
    #[error("{0}")]
    Request(String),

    /// Non-2xx HTTP response
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    /// Response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SlackError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SlackError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => SlackError::Request(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(err: serde_json::Error) -> Self {
        SlackError::Decode(err.to_string())
    }
}
