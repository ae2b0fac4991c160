//! Error type for `roster-store-sqlite`.

use roster_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A write-back targeted an id that no longer exists.
  #[error("no user row with id: {0}")]
  RowMissing(i64),
}

impl Error {
  fn as_rusqlite(&self) -> Option<&rusqlite::Error> {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => Some(e),
      _ => None,
    }
  }
}

impl StoreError for Error {
  /// True for rejections by the `users_email_uniq` index — the race backstop
  /// behind the service's email pre-checks.
  fn is_unique_violation(&self) -> bool {
    matches!(
      self.as_rusqlite(),
      Some(rusqlite::Error::SqliteFailure(e, _))
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
  }

  fn is_integrity_violation(&self) -> bool {
    matches!(
      self.as_rusqlite(),
      Some(rusqlite::Error::SqliteFailure(e, _))
        if e.code == rusqlite::ErrorCode::ConstraintViolation
    ) && !self.is_unique_violation()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
