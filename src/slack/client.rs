//! reqwest-backed Slack client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::api::SlackApi;
use super::error::SlackError;
use super::types::{
    DeleteMessage, OAuthAccessResponse, PostMessage, ScheduleMessage, UpdateMessage,
};

/// Client for the Slack Web API
#[derive(Debug, Clone)]
pub struct SlackClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL, e.g. `https://slack.com/api`
    base_url: String,
}

impl SlackClient {
    /// Create a new client rooted at `base_url`
    ///
    /// Only a connect timeout is applied; a remote call that hangs after connecting
    /// holds the request open.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SlackError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| SlackError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the URL for a Web API method
    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        method: &str,
        token: &str,
        payload: &T,
    ) -> Result<Value, SlackError> {
        let request = self
            .http_client
            .post(self.endpoint(method))
            .bearer_auth(token)
            .json(payload);
        self.send(method, request).await
    }

    async fn send(&self, method: &str, request: RequestBuilder) -> Result<Value, SlackError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(method, status = status.as_u16(), "Slack returned non-success status");
            return Err(SlackError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn oauth_access(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<OAuthAccessResponse, SlackError> {
        // Credentials travel as query parameters with an empty body
        let request = self.http_client.post(self.endpoint("oauth.v2.access")).query(&[
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
        ]);
        let body = self.send("oauth.v2.access", request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn post_message(&self, token: &str, message: PostMessage) -> Result<Value, SlackError> {
        self.post_json("chat.postMessage", token, &message).await
    }

    async fn schedule_message(
        &self,
        token: &str,
        message: ScheduleMessage,
    ) -> Result<Value, SlackError> {
        self.post_json("chat.scheduleMessage", token, &message).await
    }

    async fn conversation_history(
        &self,
        token: &str,
        channel: &str,
        limit: u32,
    ) -> Result<Value, SlackError> {
        let request = self
            .http_client
            .get(self.endpoint("conversations.history"))
            .query(&[("channel", channel.to_string()), ("limit", limit.to_string())])
            .bearer_auth(token);
        self.send("conversations.history", request).await
    }

    async fn update_message(
        &self,
        token: &str,
        message: UpdateMessage,
    ) -> Result<Value, SlackError> {
        self.post_json("chat.update", token, &message).await
    }

    async fn delete_message(
        &self,
        token: &str,
        message: DeleteMessage,
    ) -> Result<Value, SlackError> {
        self.post_json("chat.delete", token, &message).await
    }
}
