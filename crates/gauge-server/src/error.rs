//! API error taxonomy and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure path produces a `{"message": string}` body. Store internals
//! (SQL text, driver messages) are logged, never sent to the client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gauge_core::ValidationError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed or out-of-constraint payload; the message carries the
  /// field-level detail.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("{0}")]
  BadRequest(&'static str),

  #[error("{0}")]
  Unauthorized(&'static str),

  #[error("Forbidden")]
  Forbidden,

  #[error("{0}")]
  NotFound(&'static str),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, (*m).to_owned()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, (*m).to_owned()),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_owned()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, (*m).to_owned()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
      }
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "internal error while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
