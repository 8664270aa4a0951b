// Route definitions and rejection handling

use std::convert::Infallible;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Filter, Rejection, Reply};

use crate::error::ErrorBody;
use crate::handlers;
use crate::models::CallbackQuery;
use crate::session::with_session;
use crate::state::{with_state, AppState};

/// Largest request body accepted on /api/*
pub const BODY_LIMIT: u64 = 64 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request body that could not be decoded
#[derive(Debug)]
struct InvalidBody(String);

impl Reject for InvalidBody {}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let session = with_session(state.sessions.clone());
    let public_dir = state.config.public_dir.clone();
    let state = with_state(state);

    let slack = warp::path("slack");
    let api = warp::path("api");

    // GET /slack/login
    let login = slack
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::get())
        .and(state.clone())
        .and(session.clone())
        .and_then(handlers::login_handler);

    // GET /slack/callback?code=...
    let callback = slack
        .and(warp::path("callback"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<CallbackQuery>())
        .and(state.clone())
        .and(session.clone())
        .and_then(handlers::callback_handler);

    // POST /api/send
    let send = api
        .and(warp::path("send"))
        .and(warp::path::end())
        .and(warp::post())
        .and(body())
        .and(state.clone())
        .and(session.clone())
        .and_then(handlers::send_handler);

    // POST /api/schedule
    let schedule = api
        .and(warp::path("schedule"))
        .and(warp::path::end())
        .and(warp::post())
        .and(body())
        .and(state.clone())
        .and(session.clone())
        .and_then(handlers::schedule_handler);

    // GET /api/messages
    let messages = api
        .and(warp::path("messages"))
        .and(warp::path::end())
        .and(warp::get())
        .and(state.clone())
        .and(session.clone())
        .and_then(handlers::messages_handler);

    // POST /api/edit
    let edit = api
        .and(warp::path("edit"))
        .and(warp::path::end())
        .and(warp::post())
        .and(body())
        .and(state.clone())
        .and(session.clone())
        .and_then(handlers::edit_handler);

    // POST /api/delete
    let delete = api
        .and(warp::path("delete"))
        .and(warp::path::end())
        .and(warp::post())
        .and(body())
        .and(state)
        .and(session)
        .and_then(handlers::delete_handler);

    // Everything else: static assets
    let assets = warp::get().and(warp::fs::dir(public_dir));

    // Combine routes
    login
        .or(callback)
        .or(send)
        .or(schedule)
        .or(messages)
        .or(edit)
        .or(delete)
        .or(assets)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Decode a request body sent as JSON or as an urlencoded form
///
/// An empty body decodes as if `{}` had been sent.
fn body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Default + Send + 'static,
{
    let form = is_form().and(warp::body::form::<T>());
    let json = warp::body::bytes().and_then(|raw: Bytes| async move { decode_json::<T>(&raw) });

    warp::body::content_length_limit(BODY_LIMIT).and(form.or(json).unify())
}

fn is_form() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::<String>("content-type")
        .and_then(|content_type: String| async move {
            if content_type.starts_with(FORM_CONTENT_TYPE) {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

fn decode_json<T: DeserializeOwned + Default>(raw: &[u8]) -> Result<T, Rejection> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(raw).map_err(|e| warp::reject::custom(InvalidBody(e.to_string())))
}

/// Map rejections to JSON `{"error": ...}` replies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(InvalidBody(reason)) = err.find::<InvalidBody>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", reason))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else {
        debug!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody::new(message)),
        status,
    ))
}
