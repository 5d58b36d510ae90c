//! Boundary errors for the review service and its HTTP surface.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::db::DbLockError;

#[derive(Debug, Error)]
pub enum AppError {
  /// Rejected input, e.g. a quality outside 0-5
  #[error("Invalid input: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  /// Optimistic-lock retries exhausted for the card
  #[error("Card {0} was updated concurrently; retry the review")]
  Conflict(i64),

  #[error("Database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("{0}")]
  Lock(#[from] DbLockError),
}

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Database(_) | Self::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Validation(rejection.body_text())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{}", self);
    }
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}
