//! Slack Web API adapter
//!
//! The service talks to Slack only through the [`SlackApi`] trait, so handlers can be
//! driven against a stub in tests. [`SlackClient`] is the reqwest-backed implementation.

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::SlackApi;
pub use client::SlackClient;
pub use error::SlackError;
pub use types::{
    DeleteMessage, OAuthAccessResponse, OAuthTeam, PostMessage, ScheduleMessage, UpdateMessage,
};
