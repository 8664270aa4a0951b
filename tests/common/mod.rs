#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use slack_relay::slack::{
    DeleteMessage, OAuthAccessResponse, PostMessage, ScheduleMessage, SlackApi, SlackError,
    UpdateMessage,
};
use slack_relay::{AppState, Config, SessionStore};

/// Channel every test request is routed to
pub const CHANNEL: &str = "C0123";
pub const CLIENT_ID: &str = "123.456";
pub const REDIRECT_URI: &str = "http://localhost:3000/slack/callback";

/// One outbound call seen by the stub
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    OAuthAccess { code: String },
    PostMessage { token: String, message: Value },
    ScheduleMessage { token: String, message: Value },
    History { token: String, channel: String, limit: u32 },
    UpdateMessage { token: String, message: Value },
    DeleteMessage { token: String, message: Value },
}

/// Canned outcome for the next call
pub enum Outcome {
    Ok(Value),
    Err(SlackError),
}

/// In-memory stand-in for the Slack Web API
///
/// Calls are recorded in order. Responses are popped from a queue; when it is empty the
/// stub answers `{"ok": true, "ts": "<n>"}` with a fresh timestamp per call.
#[derive(Default)]
pub struct StubSlack {
    calls: Mutex<Vec<Call>>,
    outcomes: Mutex<VecDeque<Outcome>>,
    oauth: Mutex<VecDeque<Result<OAuthAccessResponse, SlackError>>>,
}

impl StubSlack {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, outcome: Outcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn respond_oauth(&self, outcome: Result<OAuthAccessResponse, SlackError>) {
        self.oauth.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<Value, SlackError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        let n = calls.len();
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Outcome::Ok(value)) => Ok(value),
            Some(Outcome::Err(err)) => Err(err),
            None => Ok(json!({ "ok": true, "ts": format!("{}.000100", 1_700_000_000 + n) })),
        }
    }
}

#[async_trait]
impl SlackApi for StubSlack {
    async fn oauth_access(
        &self,
        code: &str,
        _client_id: &str,
        _client_secret: &str,
        _redirect_uri: &str,
    ) -> Result<OAuthAccessResponse, SlackError> {
        self.calls.lock().unwrap().push(Call::OAuthAccess {
            code: code.to_string(),
        });
        self.oauth
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(OAuthAccessResponse::with_token("xoxb-default")))
    }

    async fn post_message(&self, token: &str, message: PostMessage) -> Result<Value, SlackError> {
        self.record(Call::PostMessage {
            token: token.to_string(),
            message: serde_json::to_value(message).unwrap(),
        })
    }

    async fn schedule_message(
        &self,
        token: &str,
        message: ScheduleMessage,
    ) -> Result<Value, SlackError> {
        self.record(Call::ScheduleMessage {
            token: token.to_string(),
            message: serde_json::to_value(message).unwrap(),
        })
    }

    async fn conversation_history(
        &self,
        token: &str,
        channel: &str,
        limit: u32,
    ) -> Result<Value, SlackError> {
        self.record(Call::History {
            token: token.to_string(),
            channel: channel.to_string(),
            limit,
        })
    }

    async fn update_message(
        &self,
        token: &str,
        message: UpdateMessage,
    ) -> Result<Value, SlackError> {
        self.record(Call::UpdateMessage {
            token: token.to_string(),
            message: serde_json::to_value(message).unwrap(),
        })
    }

    async fn delete_message(
        &self,
        token: &str,
        message: DeleteMessage,
    ) -> Result<Value, SlackError> {
        self.record(Call::DeleteMessage {
            token: token.to_string(),
            message: serde_json::to_value(message).unwrap(),
        })
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "SLACK_CLIENT_ID" => Some(CLIENT_ID),
            "SLACK_CLIENT_SECRET" => Some("client-secret"),
            "SLACK_REDIRECT_URI" => Some(REDIRECT_URI),
            "SLACK_CHANNEL_ID" => Some(CHANNEL),
            "SESSION_SECRET" => Some("test-session-secret"),
            "PUBLIC_DIR" => Some("tests/fixtures/public"),
            _ => None,
        };
        value.map(str::to_string)
    })
    .expect("test config")
}

/// Build state around a fresh stub and session store
pub fn test_state() -> (AppState, Arc<StubSlack>) {
    let slack = StubSlack::new();
    let config = test_config();
    let sessions = SessionStore::new(config.session_secret.clone(), None);
    (AppState::new(config, slack.clone(), sessions), slack)
}

/// `name=value` part of a Set-Cookie header, ready to send back as a Cookie header
pub fn cookie_pair(response: &warp::http::Response<bytes::Bytes>) -> Option<String> {
    response
        .headers()
        .get("set-cookie")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn body_json(response: &warp::http::Response<bytes::Bytes>) -> Value {
    serde_json::from_slice(response.body()).expect("response body is JSON")
}
