//! Shared dependencies injected into request handlers

use std::convert::Infallible;
use std::sync::Arc;

use warp::Filter;

use crate::config::Config;
use crate::session::SessionStore;
use crate::slack::SlackApi;

/// Everything a handler needs, cloned into each request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub slack: Arc<dyn SlackApi>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, slack: Arc<dyn SlackApi>, sessions: SessionStore) -> Self {
        Self {
            config: Arc::new(config),
            slack,
            sessions,
        }
    }
}

/// Filter handing a clone of the state to the handler
pub fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
