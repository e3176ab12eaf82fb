//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Wire bodies: `{"message": "..."}`, plus an `errors` field→message map on
//! validation failures. Store internals are logged, never leaked.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use patron_core::{Error as CoreError, ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed")]
  Validation(ValidationErrors),

  #[error("customer with id {0} not found")]
  NotFound(i64),

  #[error("phone number '{0}' already exists")]
  DuplicatePhone(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::Validation(errors) => Self::Validation(errors),
      CoreError::NotFound(id) => Self::NotFound(id),
      CoreError::DuplicatePhone(phone) => Self::DuplicatePhone(phone),
      CoreError::Store(inner) => Self::Internal(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Validation failed", "errors": errors })),
      )
        .into_response(),
      ApiError::NotFound(id) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Customer with id {id} not found") })),
      )
        .into_response(),
      ApiError::DuplicatePhone(phone) => (
        StatusCode::CONFLICT,
        Json(
          json!({ "message": format!("Phone number '{phone}' already exists") }),
        ),
      )
        .into_response(),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "message": "Something went wrong" })),
        )
          .into_response()
      }
    }
  }
}
