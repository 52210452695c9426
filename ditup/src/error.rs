//! Errors surfaced by the HTTP API, rendered as JSON:API error documents.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::db::DbError;
use crate::jsonapi::JSON_API;
use crate::validation::ValidationError;

/// Result type of request handlers.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request data")]
    Validation(Vec<ValidationError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[source] DbError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Forbidden for anyone who isn't logged in with a verified account.
    pub const NOT_LOGGED: Self = Self::Forbidden("you need to be logged in with a verified account");

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Hash(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_objects(&self) -> Vec<Value> {
        let status = self.status();
        let code = status.as_str();
        let title = status.canonical_reason().unwrap_or("Error");

        match self {
            Self::Validation(errors) => errors
                .iter()
                .map(|e| {
                    json!({
                        "status": code,
                        "title": title,
                        "detail": e.msg,
                        "meta": e,
                    })
                })
                .collect(),
            _ if status.is_server_error() => vec![json!({ "status": code, "title": title })],
            other => vec![json!({
                "status": code,
                "title": title,
                "detail": other.to_string(),
            })],
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(what) => Self::Conflict(what),
            DbError::NotFound(what) => Self::NotFound(what),
            other => Self::Database(other),
        }
    }
}

impl From<Vec<ValidationError>> for AppError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = json!({ "errors": self.error_objects() });
        (status, [(header::CONTENT_TYPE, JSON_API)], Json(body)).into_response()
    }
}
