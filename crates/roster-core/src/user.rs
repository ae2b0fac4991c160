//! The [`User`] entity and its creation / partial-update inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length of `email`, `first_name`, and `last_name`.
pub const FIELD_MAX_LEN: usize = 100;

/// A single directory entry.
///
/// `id` is store-assigned and immutable once set; it is never reused.
/// Deletion is soft: rows are flipped to `active = false` and never
/// physically removed, so an id stays resolvable forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id:         i64,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input for creating a user.
///
/// The store assigns the id, sets `active = true`, and stamps both
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
}

// ─── Partial update ───────────────────────────────────────────────────────────

/// A partial update: `Some` overwrites the stored field, `None` leaves it
/// untouched.
///
/// Field presence is exactly the `Option` — no stored field may itself be
/// null, so there is no absent-vs-null ambiguity.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
  pub email:      Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub active:     Option<bool>,
}

impl UserPatch {
  /// True when no field is present.
  pub fn is_empty(&self) -> bool {
    self.email.is_none()
      && self.first_name.is_none()
      && self.last_name.is_none()
      && self.active.is_none()
  }

  /// Overwrite `user`'s fields with the present ones.
  ///
  /// Timestamps are the caller's responsibility.
  pub fn apply(&self, user: &mut User) {
    if let Some(email) = &self.email {
      user.email = email.clone();
    }
    if let Some(first_name) = &self.first_name {
      user.first_name = first_name.clone();
    }
    if let Some(last_name) = &self.last_name {
      user.last_name = last_name.clone();
    }
    if let Some(active) = self.active {
      user.active = active;
    }
  }
}
