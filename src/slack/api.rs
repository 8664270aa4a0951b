//! Trait over the Web API methods the service relays

use async_trait::async_trait;
use serde_json::Value;

use super::error::SlackError;
use super::types::{
    DeleteMessage, OAuthAccessResponse, PostMessage, ScheduleMessage, UpdateMessage,
};

/// Outbound Slack operations
///
/// Each method performs exactly one HTTP call. Messaging methods return the response
/// body untouched so handlers can relay it verbatim. `token` may be empty; the remote
/// service is the only validator.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Exchange an authorization code for an access token (`oauth.v2.access`)
    async fn oauth_access(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<OAuthAccessResponse, SlackError>;

    /// `chat.postMessage`
    async fn post_message(&self, token: &str, message: PostMessage) -> Result<Value, SlackError>;

    /// `chat.scheduleMessage`
    async fn schedule_message(
        &self,
        token: &str,
        message: ScheduleMessage,
    ) -> Result<Value, SlackError>;

    /// `conversations.history`, newest first
    async fn conversation_history(
        &self,
        token: &str,
        channel: &str,
        limit: u32,
    ) -> Result<Value, SlackError>;

    /// `chat.update`
    async fn update_message(
        &self,
        token: &str,
        message: UpdateMessage,
    ) -> Result<Value, SlackError>;

    /// `chat.delete`
    async fn delete_message(
        &self,
        token: &str,
        message: DeleteMessage,
    ) -> Result<Value, SlackError>;
}
