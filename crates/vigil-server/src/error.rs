//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use vigil_core::editor::SaveError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// A draft rejected by the editor's validation; no write was issued.
  #[error("validation error: {0}")]
  Invalid(#[from] vigil_core::Error),

  /// A malformed import file, rejected before any write.
  #[error("import error: {0}")]
  Import(#[from] vigil_export::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Flatten the editor's save error into the API error space.
  pub fn from_save<E>(e: SaveError<E>) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    match e {
      SaveError::Invalid(v) => ApiError::Invalid(v),
      SaveError::Store(s) => ApiError::Store(Box::new(s)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Invalid(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Import(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
