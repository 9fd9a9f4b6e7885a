//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as `{"success": false, "message": ...}` so form
//! clients handle one shape.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;
use vetsched_agent::AgentError;
use vetsched_core::{Rejection, STORE_FAILURE_MESSAGE, SchedulingError, store::StoreError};

use crate::ActionResponse;

/// Shown for malformed bodies, query strings, and path ids.
pub const INVALID_DATA_MESSAGE: &str = "Invalid data. Please check the fields.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid data: {0}")]
  InvalidData(String),

  #[error(transparent)]
  Rejected(#[from] Rejection),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("the assistant is not configured")]
  AgentUnavailable,

  #[error("assistant error: {0}")]
  Agent(#[from] AgentError),
}

impl<E: StoreError> From<SchedulingError<E>> for ApiError {
  fn from(e: SchedulingError<E>) -> Self {
    match e {
      SchedulingError::Rejected(r) => Self::Rejected(r),
      SchedulingError::Store(e) => Self::Store(Box::new(e)),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { Self::InvalidData(e.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { Self::InvalidData(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { Self::InvalidData(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::InvalidData(detail) => {
        tracing::debug!(detail = %detail, "malformed request");
        (StatusCode::BAD_REQUEST, INVALID_DATA_MESSAGE.to_owned())
      }
      ApiError::Rejected(r @ Rejection::AppointmentNotFound(_)) => {
        (StatusCode::NOT_FOUND, r.to_string())
      }
      ApiError::Rejected(r) => (StatusCode::UNPROCESSABLE_ENTITY, r.to_string()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, STORE_FAILURE_MESSAGE.to_owned())
      }
      ApiError::AgentUnavailable => (
        StatusCode::SERVICE_UNAVAILABLE,
        "The assistant is not configured.".to_owned(),
      ),
      ApiError::Agent(e) => {
        tracing::error!(error = %e, "assistant failure");
        (
          StatusCode::BAD_GATEWAY,
          "The assistant is unavailable right now. Please try again.".to_owned(),
        )
      }
    };
    (status, Json(ActionResponse::failure(message))).into_response()
  }
}
