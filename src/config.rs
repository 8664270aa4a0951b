//! Process configuration, read once at startup

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://slack.com/oauth/v2/authorize";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Errors raised while building a [`Config`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or empty
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name} ({value:?}): {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Immutable service configuration shared by all components
#[derive(Clone)]
pub struct Config {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with the Slack app
    pub redirect_uri: String,
    /// Channel every message operation targets
    pub channel_id: String,
    /// Key for signing session cookies
    pub session_secret: String,
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Web API base URL, without trailing method name
    pub slack_api_base: String,
    /// Slack authorization page
    pub authorize_url: String,
    /// Directory served for unmatched GET requests
    pub public_dir: PathBuf,
    /// Idle lifetime of a session; `None` keeps sessions for the process lifetime
    pub session_ttl: Option<Duration>,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let client_id = required("SLACK_CLIENT_ID");
        let client_secret = required("SLACK_CLIENT_SECRET");
        let redirect_uri = required("SLACK_REDIRECT_URI");
        let channel_id = required("SLACK_CHANNEL_ID");
        let session_secret = required("SESSION_SECRET");

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let bind_addr = match get("BIND_ADDR") {
            Some(value) => value.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let session_ttl = match get("SESSION_TTL_SECS") {
            Some(value) => {
                let secs = value.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "SESSION_TTL_SECS",
                    reason: e.to_string(),
                    value: value.clone(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_TTL_SECS",
                        value,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            channel_id,
            session_secret,
            bind_addr,
            port,
            slack_api_base: get("SLACK_API_BASE")
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
            authorize_url: get("SLACK_AUTHORIZE_URL")
                .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string()),
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            session_ttl,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("channel_id", &self.channel_id)
            .field("session_secret", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("slack_api_base", &self.slack_api_base)
            .field("authorize_url", &self.authorize_url)
            .field("public_dir", &self.public_dir)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}
