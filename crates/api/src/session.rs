//! Per-visitor form sessions.
//!
//! Each browser gets its own [`FormSession`], found through the
//! `onboard_session` cookie. Sessions live in a bounded [`moka`] cache and
//! expire after a period without requests.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};
use axum::response::AppendHeaders;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use onboard_core::flow::FormSession;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::state::AppState;

/// Name of the cookie carrying the visitor's session id.
pub const SESSION_COOKIE: &str = "onboard_session";

/// One visitor's form state. Never locked across the outbound request.
pub type SharedSession = Arc<Mutex<FormSession>>;

/// Bounded store of visitor sessions keyed by session id.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionStore {
    /// At most `capacity` sessions are kept; least recently used go first.
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    /// Resolve the visitor behind `headers`, starting a fresh session when
    /// the cookie is missing, malformed or names an expired session.
    pub async fn visitor(&self, headers: &HeaderMap) -> Visitor {
        if let Some(id) = session_id(headers) {
            if let Some(session) = self.sessions.get(&id).await {
                return Visitor {
                    id,
                    session,
                    is_new: false,
                };
            }
            tracing::debug!(%id, "Unknown or expired session cookie");
        }

        let id = Uuid::new_v4();
        let session: SharedSession = Arc::new(Mutex::new(FormSession::new()));
        self.sessions.insert(id, session.clone()).await;
        tracing::debug!(%id, "Started visitor session");

        Visitor {
            id,
            session,
            is_new: true,
        }
    }

    /// Approximate number of live sessions.
    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending evictions and expirations.
    pub async fn sync(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

/// Pull the session id out of the request's `Cookie` headers.
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// The visitor making the current request and their form session.
///
/// Resolving a visitor never fails: a request without a usable cookie gets
/// a new session, and [`Visitor::cookie`] then yields the `Set-Cookie`
/// header that hands its id to the browser.
pub struct Visitor {
    pub id: Uuid,
    pub session: SharedSession,
    is_new: bool,
}

impl Visitor {
    /// `Set-Cookie` header for a newly started session; empty otherwise.
    pub fn cookie(&self) -> AppendHeaders<Option<(HeaderName, String)>> {
        AppendHeaders(self.is_new.then(|| {
            (
                SET_COOKIE,
                format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id),
            )
        }))
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.sessions.visitor(&parts.headers).await)
    }
}
