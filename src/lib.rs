// HTTP Server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

// Configuration, sessions and error types
pub mod config;
pub mod error;
pub mod session;

// Slack Web API client
pub mod slack;

pub use config::Config;
pub use error::{AppError, FailureKind};
pub use routes::configure_routes;
pub use session::SessionStore;
pub use state::AppState;
