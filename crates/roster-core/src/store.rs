//! The [`UserStore`] trait and its error classification.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, the service) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  query::{Page, PageRequest, SortSpec, UserFilter},
  user::{NewUser, User},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Backend error with just enough structure for the service layer.
///
/// The check-then-write sequences in create/update are not atomic, so a
/// concurrent writer can slip past the existence check; the backend's unique
/// index then rejects the write. `is_unique_violation` lets the service turn
/// that rejection into a conflict instead of an internal error.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_unique_violation(&self) -> bool;

  /// Any other constraint breach reported by the backend.
  fn is_integrity_violation(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a user-directory storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new user. The store assigns the id, sets `active = true`,
  /// and stamps `created_at` / `updated_at`.
  ///
  /// Fails with a unique-violation error if the email is already taken.
  fn insert(
    &self,
    new: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  /// Soft-deleted rows are still returned.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by exact, case-sensitive email. Returns `None` if not
  /// found.
  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// True if any row other than `excluding` already holds `email`.
  fn email_taken<'a>(
    &'a self,
    email: &'a str,
    excluding: Option<i64>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Write back an existing user's mutable fields (`created_at` and `id`
  /// are immutable). Fails with a unique-violation error if the email
  /// collides with another row.
  fn save<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// A predicate-filtered, sorted, paginated scan.
  ///
  /// Matching semantics must agree with [`UserFilter::matches`]; ordering
  /// must be total (backends add an id tiebreaker).
  fn list<'a>(
    &'a self,
    filter: &'a UserFilter,
    sort: SortSpec,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<User>, Self::Error>> + Send + 'a;
}
