use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::Serialize;

use crate::{
    application::list_service::{ListService, ServiceError},
    domain::list::{ListId, TodoId, TodoList},
    http::{
        session::Session,
        types::{AppError, ListNameForm, TodoForm, TodoStatusForm},
        views::{ListFormPage, ListPage, ListsPage, Page, Views},
    },
};

#[derive(Clone)]
pub struct AppState<S: ListService> {
    pub service: S,
    pub views: Arc<Views>,
}

impl<S: ListService> AppState<S> {
    fn render<T: Serialize>(&self, page: Page, model: &T, session: &Session) -> Result<Response, AppError> {
        let html = self.views.render(page, model, &session.take_flash())?;
        Ok(Html(html).into_response())
    }
}

pub fn router<S: ListService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(|| async { redirect("/lists") }))
        .route("/lists", get(index::<S>).post(create_list::<S>))
        .route("/lists/new", get(new_list::<S>))
        .route("/lists/:list_id", get(show_list::<S>).post(update_list::<S>))
        .route("/lists/:list_id/edit", get(edit_list::<S>))
        .route("/lists/:list_id/delete", post(delete_list::<S>))
        .route("/lists/:list_id/todos", post(add_todo::<S>))
        .route("/lists/:list_id/delete/:todo_id", post(delete_todo::<S>))
        .route("/lists/:list_id/complete/:todo_id", post(set_todo_status::<S>))
        .route("/lists/:list_id/complete_all", post(complete_all::<S>))
        .with_state(state)
}

async fn index<S: ListService>(State(state): State<AppState<S>>, Extension(session): Extension<Session>) -> Result<Response, AppError> {
    let lists = state.service.all_lists().await?;
    state.render(Page::Lists, &ListsPage::new(&lists), &session)
}

async fn new_list<S: ListService>(State(state): State<AppState<S>>, Extension(session): Extension<Session>) -> Result<Response, AppError> {
    state.render(Page::NewList, &ListFormPage::new(None, ""), &session)
}

async fn show_list<S: ListService>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    state.render(Page::List, &ListPage::new(&list, ""), &session)
}

async fn edit_list<S: ListService>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    state.render(Page::EditList, &ListFormPage::new(Some(&list), list.name.clone()), &session)
}

async fn create_list<S: ListService>(
    State(state): State<AppState<S>>,
    Extension(session): Extension<Session>,
    Form(form): Form<ListNameForm>,
) -> Result<Response, AppError> {
    match state.service.create_list(&form.list_name).await {
        Ok(()) => {
            session.set_success("The list has been created.");
            Ok(redirect("/lists"))
        }
        Err(ServiceError::Invalid(err)) => {
            session.set_error(err.to_string());
            state.render(Page::NewList, &ListFormPage::new(None, form.list_name), &session)
        }
        Err(err) => Err(err.into()),
    }
}

async fn update_list<S: ListService>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    Extension(session): Extension<Session>,
    Form(form): Form<ListNameForm>,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    match state.service.rename_list(list.id, &form.list_name).await {
        Ok(()) => {
            session.set_success("The list has been updated.");
            Ok(redirect(&list_path(list.id)))
        }
        Err(ServiceError::Invalid(err)) => {
            session.set_error(err.to_string());
            state.render(Page::EditList, &ListFormPage::new(Some(&list), form.list_name), &session)
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete_list<S: ListService>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    state.service.delete_list(list.id).await?;

    if is_xhr(&headers) {
        Ok("/lists".into_response())
    } else {
        session.set_success("The list has been deleted.");
        Ok(redirect("/lists"))
    }
}

async fn add_todo<S: ListService>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    Extension(session): Extension<Session>,
    Form(form): Form<TodoForm>,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    match state.service.add_todo(list.id, &form.todo).await {
        Ok(()) => {
            session.set_success("The item was added to the list.");
            Ok(redirect(&list_path(list.id)))
        }
        Err(ServiceError::Invalid(err)) => {
            session.set_error(err.to_string());
            state.render(Page::List, &ListPage::new(&list, form.todo), &session)
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete_todo<S: ListService>(
    State(state): State<AppState<S>>,
    Path((list_id, todo_id)): Path<(String, i64)>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    state.service.delete_todo(list.id, TodoId(todo_id)).await?;

    if is_xhr(&headers) {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        session.set_success("The item was deleted from the list.");
        Ok(redirect(&list_path(list.id)))
    }
}

async fn set_todo_status<S: ListService>(
    State(state): State<AppState<S>>,
    Path((list_id, todo_id)): Path<(String, i64)>,
    Extension(session): Extension<Session>,
    Form(form): Form<TodoStatusForm>,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    state.service.set_todo_status(list.id, TodoId(todo_id), form.completed).await?;
    session.set_success("The item was updated.");
    Ok(redirect(&list_path(list.id)))
}

async fn complete_all<S: ListService>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    let list = load_list(&state.service, &session, &list_id).await?;
    state.service.complete_all(list.id).await?;
    session.set_success("All items have been marked completed.");
    Ok(redirect(&list_path(list.id)))
}

/// Resolves a raw path id to its list. Unknown or malformed ids set the
/// error flash and bail out with a redirect to the index.
async fn load_list<S: ListService>(service: &S, session: &Session, raw_id: &str) -> Result<TodoList, AppError> {
    let loaded = match raw_id.parse::<i64>() {
        Ok(id) => service.load_list(ListId(id)).await,
        Err(_) => Err(ServiceError::NotFound),
    };
    match loaded {
        Ok(list) => Ok(list),
        Err(ServiceError::NotFound) => {
            tracing::debug!(list_id = raw_id, "list not found");
            session.set_error(ServiceError::NotFound.to_string());
            Err(AppError::NotFound)
        }
        Err(err) => Err(err.into()),
    }
}

fn list_path(id: ListId) -> String { format!("/lists/{}", id.0) }

fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers.get("x-requested-with").is_some_and(|v| v == "XMLHttpRequest")
}
