//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings (always `+00:00`, so
//! lexicographic order equals chronological order). The `active` flag maps to
//! an INTEGER 0/1.

use chrono::{DateTime, Utc};
use roster_core::user::User;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Values read directly from a `users` row, timestamps still as text.
pub struct RawUser {
  pub id:         i64,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub active:     bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  /// Map a query row (columns in `users` table order) into a [`RawUser`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
    Ok(RawUser {
      id:         row.get(0)?,
      email:      row.get(1)?,
      first_name: row.get(2)?,
      last_name:  row.get(3)?,
      active:     row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         self.id,
      email:      self.email,
      first_name: self.first_name,
      last_name:  self.last_name,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
