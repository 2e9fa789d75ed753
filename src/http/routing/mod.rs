use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::session::{self, SessionStore};

/// Wraps the page routes with the health probe, flash sessions and request tracing.
pub fn app(router: Router, sessions: SessionStore) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(middleware::from_fn_with_state(sessions, session::attach))
        .layer(TraceLayer::new_for_http())
}
