// Request bodies and query strings accepted by the HTTP surface
//
// Every field is optional and untyped: nothing is validated locally, Slack rejects what it
// does not like.

use serde::Deserialize;

// GET /slack/callback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

// POST /api/send
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendRequest {
    pub text: Option<serde_json::Value>,
}

// POST /api/schedule
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRequest {
    pub text: Option<serde_json::Value>,
    /// Epoch seconds; number or string, forwarded unchanged
    #[serde(rename = "postAt")]
    pub post_at: Option<serde_json::Value>,
}

// POST /api/edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditRequest {
    pub ts: Option<serde_json::Value>,
    pub text: Option<serde_json::Value>,
}

// POST /api/delete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteRequest {
    pub ts: Option<serde_json::Value>,
}
