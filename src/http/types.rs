use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;
use thiserror::Error;

use crate::application::list_service::ServiceError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown list id. The error flash has already been set.
    #[error("list not found")]
    NotFound,
    #[error("store failure: {0}")]
    Store(#[from] anyhow::Error),
    #[error("template failure: {0}")]
    Render(#[from] tera::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => AppError::NotFound,
            // handlers re-render their form on validation errors before reaching here
            ServiceError::Invalid(e) => AppError::Store(anyhow::anyhow!("unhandled validation error: {e}")),
            ServiceError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::NotFound => (StatusCode::FOUND, [(header::LOCATION, "/lists")]).into_response(),
            AppError::Store(_) | AppError::Render(_) => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListNameForm {
    #[serde(default)]
    pub list_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub todo: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoStatusForm {
    #[serde(deserialize_with = "status_flag")]
    pub completed: bool,
}

/// Accepts `true`/`false` as well as the store's `t`/`f` and `1`/`0` spellings.
fn status_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        other => Err(de::Error::invalid_value(Unexpected::Str(other), &"a completion flag")),
    }
}
