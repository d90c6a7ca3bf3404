//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"error": ..., "details": ...}`, with `details`
//! omitted when there is nothing to add.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("external data source unavailable: {source_name}: {details}")]
  UpstreamUnavailable {
    source_name: String,
    details:     String,
  },

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }

  pub(crate) fn country_not_found() -> Self {
    Self::NotFound("Country not found".into())
  }
}

impl From<cxr_core::Error> for ApiError {
  fn from(err: cxr_core::Error) -> Self {
    match err {
      cxr_core::Error::UpstreamUnavailable { source_name, details } => {
        Self::UpstreamUnavailable { source_name, details }
      }
      cxr_core::Error::NotFound(_) => Self::country_not_found(),
      cxr_core::Error::Internal(e) => Self::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error, details) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m, None),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, "Validation failed".to_owned(), Some(m))
      }
      ApiError::UpstreamUnavailable { source_name, details } => (
        StatusCode::SERVICE_UNAVAILABLE,
        "External data source unavailable".to_owned(),
        Some(format!("Could not fetch data from {source_name}: {details}")),
      ),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".to_owned(),
          Some(e.to_string()),
        )
      }
    };

    let body = match details {
      Some(details) => json!({ "error": error, "details": details }),
      None => json!({ "error": error }),
    };
    (status, Json(body)).into_response()
  }
}
