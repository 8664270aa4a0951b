// /api/* handlers relaying to the Slack Web API
//
// Each handler makes exactly one outbound call with the session token and relays the
// outcome. Nothing is retried and nothing is deduplicated.

use std::convert::Infallible;

use serde_json::Value;
use tracing::{info, warn};
use warp::http::StatusCode;

use crate::error::{AppError, ErrorBody};
use crate::models::{DeleteRequest, EditRequest, ScheduleRequest, SendRequest};
use crate::session::Session;
use crate::slack::{DeleteMessage, PostMessage, ScheduleMessage, SlackError, UpdateMessage};
use crate::state::AppState;

/// Number of messages returned by GET /api/messages
pub const HISTORY_LIMIT: u32 = 5;

/// Turn an outbound result into the HTTP reply
///
/// Success relays the remote body as-is with 200; failure is 500 `{"error": message}`.
fn relay(
    endpoint: &str,
    result: Result<Value, SlackError>,
    session: &Session,
) -> warp::reply::Response {
    let reply = match result.map_err(AppError::from) {
        Ok(payload) => warp::reply::with_status(warp::reply::json(&payload), StatusCode::OK),
        Err(err) => {
            warn!(endpoint, error = %err.message(), "Slack call failed");
            warp::reply::with_status(
                warp::reply::json(&ErrorBody::new(err.message())),
                err.status(),
            )
        }
    };
    session.attach(reply)
}

pub async fn send_handler(
    request: SendRequest,
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("POST /api/send");

    let message = PostMessage {
        channel: state.config.channel_id.clone(),
        text: request.text,
    };
    let result = state
        .slack
        .post_message(session.bearer_token(), message)
        .await;

    Ok(relay("send", result, &session))
}

pub async fn schedule_handler(
    request: ScheduleRequest,
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("POST /api/schedule");

    let message = ScheduleMessage {
        channel: state.config.channel_id.clone(),
        text: request.text,
        post_at: request.post_at,
    };
    let result = state
        .slack
        .schedule_message(session.bearer_token(), message)
        .await;

    Ok(relay("schedule", result, &session))
}

pub async fn messages_handler(
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("GET /api/messages");

    let result = state
        .slack
        .conversation_history(session.bearer_token(), &state.config.channel_id, HISTORY_LIMIT)
        .await;

    Ok(relay("messages", result, &session))
}

pub async fn edit_handler(
    request: EditRequest,
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("POST /api/edit");

    let message = UpdateMessage {
        channel: state.config.channel_id.clone(),
        ts: request.ts,
        text: request.text,
    };
    let result = state
        .slack
        .update_message(session.bearer_token(), message)
        .await;

    Ok(relay("edit", result, &session))
}

pub async fn delete_handler(
    request: DeleteRequest,
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("POST /api/delete");

    let message = DeleteMessage {
        channel: state.config.channel_id.clone(),
        ts: request.ts,
    };
    let result = state
        .slack
        .delete_message(session.bearer_token(), message)
        .await;

    Ok(relay("delete", result, &session))
}
