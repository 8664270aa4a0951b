//! Wire types for the Web API methods the service calls

use serde::{Deserialize, Serialize};

/// Body of `chat.postMessage`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMessage {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<serde_json::Value>,
}

/// Body of `chat.scheduleMessage`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleMessage {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<serde_json::Value>,
    /// Epoch seconds, passed through exactly as the caller sent it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_at: Option<serde_json::Value>,
}

/// Body of `chat.update`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMessage {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<serde_json::Value>,
}

/// Body of `chat.delete`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteMessage {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<serde_json::Value>,
}

/// Response from `oauth.v2.access`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthAccessResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<OAuthTeam>,
    /// Slack error code when `ok` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OAuthAccessResponse {
    /// Response carrying only an access token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            ok: true,
            access_token: Some(token.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthTeam {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
