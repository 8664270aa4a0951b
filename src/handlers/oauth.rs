// GET /slack/login and GET /slack/callback handlers

use std::convert::Infallible;

use tracing::{info, warn};
use warp::http::header::LOCATION;
use warp::http::StatusCode;
use warp::Reply;

use crate::config::Config;
use crate::error::AppError;
use crate::models::CallbackQuery;
use crate::session::Session;
use crate::state::AppState;

/// Scopes requested from every workspace
pub const SCOPES: &str = "chat:write,channels:history,channels:read";

/// Build the Slack authorization URL
///
/// No `state` parameter is sent, so the callback cannot detect a forged redirect.
pub fn authorize_url(config: &Config) -> String {
    format!(
        "{}?client_id={}&scope={}&redirect_uri={}",
        config.authorize_url,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(SCOPES),
        urlencoding::encode(&config.redirect_uri),
    )
}

fn found(location: &str) -> impl Reply {
    warp::reply::with_header(
        warp::reply::with_status(warp::reply(), StatusCode::FOUND),
        LOCATION,
        location,
    )
}

pub async fn login_handler(
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("GET /slack/login");
    let url = authorize_url(&state.config);
    Ok(session.attach(found(&url)))
}

pub async fn callback_handler(
    query: CallbackQuery,
    state: AppState,
    session: Session,
) -> Result<warp::reply::Response, Infallible> {
    info!("GET /slack/callback");

    match exchange_code(&state, query.code.as_deref().unwrap_or_default()).await {
        Ok(token) => {
            state.sessions.set_access_token(&session.id, token).await;
            info!(session = %session.id, "OAuth exchange succeeded");
            Ok(session.attach(found("/")))
        }
        Err(err) => {
            warn!(session = %session.id, error = %err.message(), "OAuth exchange failed");
            let status = err.status();
            Ok(session.attach(warp::reply::with_status(err.to_string(), status)))
        }
    }
}

/// Trade an authorization code for an access token
async fn exchange_code(state: &AppState, code: &str) -> Result<String, AppError> {
    let config = &state.config;
    let response = state
        .slack
        .oauth_access(
            code,
            &config.client_id,
            &config.client_secret,
            &config.redirect_uri,
        )
        .await
        .map_err(AppError::oauth)?;

    response.access_token.ok_or_else(|| {
        AppError::OAuthExchange(
            response
                .error
                .unwrap_or_else(|| "missing access_token".to_string()),
        )
    })
}
