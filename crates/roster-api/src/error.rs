//! API error type producing the uniform JSON error envelope:
//! `{status, error, message, path, validationErrors?}`.
//!
//! The client branches on `status` alone, so every failure — extractor
//! rejections included — goes through this type.

use std::collections::BTreeMap;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// An error returned by an API handler, tagged with the request path.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ApiError {
  path: String,
  kind: ErrorKind,
}

#[derive(Debug, Error)]
enum ErrorKind {
  #[error("Validation failed")]
  Validation(BTreeMap<String, String>),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Internal(String),
}

impl ApiError {
  /// Per-field validation failures, rejected before business logic runs.
  pub fn validation(path: &str, errors: BTreeMap<String, String>) -> Self {
    ApiError { path: path.to_owned(), kind: ErrorKind::Validation(errors) }
  }

  /// Malformed request (bad JSON, bad query string, bad path segment).
  pub fn bad_request(path: &str, message: impl Into<String>) -> Self {
    ApiError { path: path.to_owned(), kind: ErrorKind::BadRequest(message.into()) }
  }

  /// Translate a service error into its HTTP classification.
  ///
  /// Unclassified store failures are logged here and surface as a 500 with
  /// a generic message.
  pub fn from_service(err: roster_core::Error, path: &str) -> Self {
    use roster_core::Error;

    let kind = match err {
      Error::NotFound(_) | Error::EmailNotFound(_) => {
        ErrorKind::NotFound(err.to_string())
      }
      Error::EmailTaken(_) | Error::Integrity(_) => {
        ErrorKind::Conflict(err.to_string())
      }
      Error::Store(e) => {
        tracing::error!(error = %e, path, "store failure");
        ErrorKind::Internal("An unexpected error occurred".to_owned())
      }
    };
    ApiError { path: path.to_owned(), kind }
  }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
  status:  u16,
  error:   &'a str,
  message: String,
  path:    &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  validation_errors: Option<&'a BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, validation_errors) = match &self.kind {
      ErrorKind::Validation(errors) => (StatusCode::BAD_REQUEST, Some(errors)),
      ErrorKind::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
      ErrorKind::NotFound(_) => (StatusCode::NOT_FOUND, None),
      ErrorKind::Conflict(_) => (StatusCode::CONFLICT, None),
      ErrorKind::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };

    let body = ErrorBody {
      status:  status.as_u16(),
      error:   status.canonical_reason().unwrap_or("Unknown"),
      message: self.kind.to_string(),
      path:    &self.path,
      validation_errors,
    };

    (status, Json(body)).into_response()
  }
}
