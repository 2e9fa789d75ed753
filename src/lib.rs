pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use std::sync::Arc;

use axum::Router;

use application::list_service::ListServiceImpl;
use http::{routes::lists, routing, session::SessionStore, views::Views};
use infrastructure::sqlite_repo::SqliteListRepository;

/// Full application router over an initialized repository.
pub fn build_app(repo: SqliteListRepository) -> anyhow::Result<Router> {
    let views = Arc::new(Views::new()?);
    let service = ListServiceImpl::new(repo);
    let pages = lists::router(lists::AppState { service, views });
    Ok(routing::app(pages, SessionStore::new()))
}
