//! In-memory session store keyed by a signed cookie
//!
//! A browser session is identified by a random UUID carried in the `slack.sid` cookie as
//! `<uuid>.<hex hmac-sha256(uuid)>`. The store holds at most one access token per session
//! and lives only as long as the process.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;
use warp::http::header::SET_COOKIE;
use warp::http::HeaderValue;
use warp::Filter;

pub const COOKIE_NAME: &str = "slack.sid";

type HmacSha256 = Hmac<Sha256>;

/// Stored state of one session
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Set once the OAuth callback succeeds
    pub access_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            access_token: None,
            created_at: now,
            last_seen: now,
        }
    }
}

/// The caller's session as seen by one request
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    /// Token at the time the request arrived
    pub access_token: Option<String>,
    /// Set-Cookie value when the session was created by this request
    set_cookie: Option<String>,
}

impl Session {
    pub fn is_new(&self) -> bool {
        self.set_cookie.is_some()
    }

    /// Token sent to Slack; empty when OAuth has not completed
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }

    /// Finish a reply, issuing the session cookie if this request created the session
    pub fn attach(&self, reply: impl warp::Reply) -> warp::reply::Response {
        let mut response = reply.into_response();
        if let Some(cookie) = &self.set_cookie {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

/// Signs and verifies session cookie values
#[derive(Clone)]
struct CookieSigner {
    secret: Arc<str>,
}

impl CookieSigner {
    fn signature(&self, id: &Uuid) -> Option<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).ok()?;
        mac.update(id.as_hyphenated().to_string().as_bytes());
        let digest = mac.finalize().into_bytes();

        let mut hex = String::with_capacity(64);
        for byte in digest {
            write!(&mut hex, "{:02x}", byte).ok()?;
        }
        Some(hex)
    }

    fn sign(&self, id: &Uuid) -> Option<String> {
        let signature = self.signature(id)?;
        Some(format!("{}.{}", id.as_hyphenated(), signature))
    }

    fn verify(&self, value: &str) -> Option<Uuid> {
        let (raw_id, signature) = value.split_once('.')?;
        let id = Uuid::parse_str(raw_id).ok()?;
        let expected = self.signature(&id)?;
        constant_time_eq(expected.as_bytes(), signature.as_bytes()).then_some(id)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Process-local session store, cheap to clone
///
/// Only sessions holding a token occupy memory. Without a TTL they are kept until the
/// process exits or [`SessionStore::remove`] / [`SessionStore::clear`] is called.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    signer: CookieSigner,
    ttl: Option<chrono::Duration>,
}

impl SessionStore {
    /// Create a store signing cookies with `secret`; `ttl` is the idle lifetime
    pub fn new(secret: impl Into<String>, ttl: Option<Duration>) -> Self {
        let secret: String = secret.into();
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            signer: CookieSigner {
                secret: Arc::from(secret),
            },
            // A TTL too large for chrono never expires in practice
            ttl: ttl.and_then(|ttl| chrono::Duration::from_std(ttl).ok()),
        }
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => now - entry.last_seen > ttl,
            None => false,
        }
    }

    /// Cookie value identifying `id`
    pub fn cookie_value(&self, id: &Uuid) -> Option<String> {
        self.signer.sign(id)
    }

    /// Session id carried by a cookie value, if the signature holds
    pub fn verify_cookie(&self, value: &str) -> Option<Uuid> {
        self.signer.verify(value)
    }

    /// Look up the session named by `cookie`, starting a new one if it is absent or forged
    ///
    /// Nothing is stored until a token is set, so requests that never finish OAuth leave
    /// no entry behind. A signed id with no live entry keeps its id but has no token.
    pub async fn resolve(&self, cookie: Option<&str>) -> Session {
        let now = Utc::now();

        if let Some(id) = cookie.and_then(|value| self.signer.verify(value)) {
            let mut sessions = self.sessions.write().await;
            let access_token = match sessions.get_mut(&id) {
                Some(entry) if !self.is_expired(entry, now) => {
                    entry.last_seen = now;
                    entry.access_token.clone()
                }
                Some(_) => {
                    debug!(session = %id, "Session expired");
                    sessions.remove(&id);
                    None
                }
                None => None,
            };
            return Session {
                id,
                access_token,
                set_cookie: None,
            };
        }

        let id = Uuid::new_v4();
        debug!(session = %id, "Session started");

        Session {
            id,
            access_token: None,
            set_cookie: self
                .signer
                .sign(&id)
                .map(|value| format!("{}={}; Path=/; HttpOnly; SameSite=Lax", COOKIE_NAME, value)),
        }
    }

    pub async fn access_token(&self, id: &Uuid) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .filter(|entry| !self.is_expired(entry, Utc::now()))
            .and_then(|entry| entry.access_token.clone())
    }

    /// Store the token for `id`, recreating the entry if it was purged meanwhile
    pub async fn set_access_token(&self, id: &Uuid, token: impl Into<String>) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(*id)
            .or_insert_with(|| SessionEntry::new(now));
        entry.access_token = Some(token.into());
        entry.last_seen = now;
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SessionEntry> {
        self.sessions.write().await.remove(id)
    }

    /// Drop every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Start a background task purging expired sessions every half TTL
    ///
    /// Returns `None` when sessions never expire.
    pub fn spawn_sweeper(&self) -> Option<JoinHandle<()>> {
        let ttl = self.ttl?.to_std().ok()?;
        let period = (ttl / 2).max(Duration::from_secs(1));
        let store = self.clone();

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    debug!(purged, "Purged expired sessions");
                }
            }
        }))
    }
}

/// Filter resolving the caller's [`Session`] from the session cookie
pub fn with_session(
    store: SessionStore,
) -> impl Filter<Extract = (Session,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(COOKIE_NAME).and_then(move |cookie: Option<String>| {
        let store = store.clone();
        async move { Ok::<_, Infallible>(store.resolve(cookie.as_deref()).await) }
    })
}
