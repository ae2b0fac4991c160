//! JSON REST API for the Roster user directory.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::UserStore`]
//! through a [`UserService`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(service.clone()))
//! ```

pub mod dto;
pub mod error;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use roster_core::{UserService, store::UserStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<UserService<S>>) -> Router<()>
where
  S: UserStore + 'static,
{
  Router::new()
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    // Static segment must be registered alongside the `{id}` capture;
    // axum gives it precedence.
    .route("/users/by-email", get(users::by_email::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete_one::<S>),
    )
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────
