//! [`UserService`] — the single authority for user invariants.
//!
//! All mutations pass through here. The service owns the uniqueness and
//! partial-update rules; the store is a dumb capability behind the
//! [`UserStore`] trait.

use chrono::Utc;

use crate::{
  error::{Error, Result},
  query::{Page, PageRequest, SortSpec, UserFilter},
  store::{StoreError, UserStore},
  user::{NewUser, User, UserPatch},
};

/// Orchestrates create/read/update/soft-delete against a [`UserStore`].
///
/// Cloning is as cheap as cloning the store handle.
#[derive(Clone)]
pub struct UserService<S> {
  store: S,
}

impl<S: UserStore> UserService<S> {
  pub fn new(store: S) -> Self { UserService { store } }

  /// Create a user; conflicts if the email is already taken.
  ///
  /// The pre-check and the insert are not atomic, so a racing create can
  /// pass the check and trip the store's unique index instead; that path is
  /// reported as the same conflict.
  pub async fn create(&self, new: NewUser) -> Result<User> {
    if self.store.email_taken(&new.email, None).await.map_err(store_err)? {
      return Err(Error::EmailTaken(new.email));
    }

    let email = new.email.clone();
    match self.store.insert(new).await {
      Ok(user) => Ok(user),
      Err(e) if e.is_unique_violation() => Err(Error::EmailTaken(email)),
      Err(e) => Err(write_err(e)),
    }
  }

  /// Fetch by id. Soft-deleted users are still returned.
  pub async fn get(&self, id: i64) -> Result<User> {
    self
      .store
      .get(id)
      .await
      .map_err(store_err)?
      .ok_or(Error::NotFound(id))
  }

  /// Fetch by exact, case-sensitive email.
  pub async fn get_by_email(&self, email: &str) -> Result<User> {
    self
      .store
      .find_by_email(email)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::EmailNotFound(email.to_owned()))
  }

  /// A filtered, sorted page of users.
  pub async fn list(
    &self,
    filter: &UserFilter,
    sort: SortSpec,
    page: PageRequest,
  ) -> Result<Page<User>> {
    self.store.list(filter, sort, page).await.map_err(store_err)
  }

  /// Partial update: present fields overwrite, absent fields are untouched.
  ///
  /// `updated_at` is refreshed on every successful call, even when the patch
  /// is empty or a no-op.
  pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User> {
    let mut user = self.get(id).await?;

    if let Some(email) = &patch.email
      && *email != user.email
      && self.store.email_taken(email, Some(id)).await.map_err(store_err)?
    {
      return Err(Error::EmailTaken(email.clone()));
    }

    patch.apply(&mut user);
    user.updated_at = Utc::now();

    match self.store.save(&user).await {
      Ok(()) => Ok(user),
      Err(e) if e.is_unique_violation() => Err(Error::EmailTaken(user.email)),
      Err(e) => Err(write_err(e)),
    }
  }

  /// Soft delete: force `active = false` and refresh `updated_at`.
  ///
  /// Idempotent in effect — repeating on an inactive user succeeds and
  /// leaves the flag unchanged. A nonexistent id still fails.
  pub async fn soft_delete(&self, id: i64) -> Result<()> {
    let mut user = self.get(id).await?;

    user.active = false;
    user.updated_at = Utc::now();

    self.store.save(&user).await.map_err(store_err)
  }
}

fn store_err(e: impl std::error::Error + Send + Sync + 'static) -> Error {
  Error::Store(Box::new(e))
}

/// Classify a failed write: non-uniqueness constraint breaches get their own
/// signal, anything else is an opaque store failure.
fn write_err(e: impl StoreError) -> Error {
  if e.is_integrity_violation() {
    Error::Integrity(e.to_string())
  } else {
    store_err(e)
  }
}
