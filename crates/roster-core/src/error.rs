//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found with id: {0}")]
  NotFound(i64),

  /// Keyed on the email that missed, not a sentinel id.
  #[error("user not found with email: {0}")]
  EmailNotFound(String),

  #[error("user already exists with email: {0}")]
  EmailTaken(String),

  /// A non-uniqueness constraint breach surfaced by the store.
  #[error("data integrity violation: {0}")]
  Integrity(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
