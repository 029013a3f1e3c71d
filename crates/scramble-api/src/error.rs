//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use scramble_core::{Error as CoreError, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error by the domain error it wraps, if any.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.as_core() {
      Some(CoreError::InvalidInput(_)) => Self::BadRequest(e.to_string()),
      Some(CoreError::DuplicateName(_)) => Self::Conflict(e.to_string()),
      Some(CoreError::ParticipantNotFound(_) | CoreError::ExchangeNotFound(_)) => {
        Self::NotFound(e.to_string())
      }
      Some(CoreError::Inconsistent(_)) | None => Self::Store(Box::new(e)),
    }
  }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self { Self::from_store(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    if status.is_server_error() {
      tracing::error!(%status, "{message}");
    } else {
      tracing::debug!(%status, "{message}");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
