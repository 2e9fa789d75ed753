//! Cookie-keyed sessions carrying the one-shot `error` / `success` flash slots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "todo_session";

/// How long an unread flash is kept before it is dropped.
pub const FLASH_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

struct PendingFlash {
    flash: Flash,
    expires_at: Instant,
}

impl PendingFlash {
    fn is_valid(&self) -> bool { Instant::now() < self.expires_at }
}

/// Process-wide flash storage keyed by session id. Entries only exist while a
/// message is pending; taking the flash removes them, and unread entries are
/// pruned once their ttl has passed.
#[derive(Clone)]
pub struct SessionStore {
    flashes: Arc<Mutex<HashMap<String, PendingFlash>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self { Self::with_ttl(FLASH_TTL) }
}

impl SessionStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { flashes: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PendingFlash>> {
        let mut flashes = self.flashes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        flashes.retain(|_, pending| pending.is_valid());
        flashes
    }

    /// Sets one slot and restarts the entry's ttl.
    fn update(&self, id: &str, set: impl FnOnce(&mut Flash)) {
        let expires_at = Instant::now() + self.ttl;
        let mut flashes = self.lock();
        let pending = flashes
            .entry(id.to_string())
            .or_insert_with(|| PendingFlash { flash: Flash::default(), expires_at });
        pending.expires_at = expires_at;
        set(&mut pending.flash);
    }

    fn take(&self, id: &str) -> Flash {
        self.lock()
            .remove(id)
            .filter(PendingFlash::is_valid)
            .map(|pending| pending.flash)
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn pending(&self) -> usize { self.lock().len() }

    pub fn session(&self, id: impl Into<String>) -> Session {
        Session { id: id.into(), store: self.clone() }
    }
}

/// Handle to one client's session, inserted into request extensions by [`attach`].
#[derive(Clone)]
pub struct Session {
    id: String,
    store: SessionStore,
}

impl Session {
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.store.update(&self.id, |flash| flash.error = Some(message));
    }

    pub fn set_success(&self, message: impl Into<String>) {
        let message = message.into();
        self.store.update(&self.id, |flash| flash.success = Some(message));
    }

    /// Returns the pending messages and clears them.
    pub fn take_flash(&self) -> Flash { self.store.take(&self.id) }
}

pub async fn attach(State(store): State<SessionStore>, mut req: Request, next: Next) -> Response {
    let (id, fresh) = match session_id(req.headers()) {
        Some(id) => (id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    req.extensions_mut().insert(store.session(id.clone()));

    let mut res = next.run(req).await;
    if fresh {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => { res.headers_mut().append(header::SET_COOKIE, value); }
            Err(e) => tracing::warn!(error = %e, "could not encode session cookie"),
        }
    }
    res
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
