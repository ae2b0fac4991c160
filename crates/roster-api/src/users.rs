//! Handlers for the `/users` endpoints.
//!
//! | Method   | Path               | Notes                                   |
//! |----------|--------------------|-----------------------------------------|
//! | `POST`   | `/users`           | 201; 400 validation, 409 conflict       |
//! | `GET`    | `/users`           | `?page&size&sort&active&search`         |
//! | `GET`    | `/users/{id}`      | 404 if unknown id                       |
//! | `PUT`    | `/users/{id}`      | partial update; 404, 409                |
//! | `DELETE` | `/users/{id}`      | soft delete, 204; 404                   |
//! | `GET`    | `/users/by-email`  | `?email=`; 400 invalid email, 404       |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    OriginalUri, Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{UserService, store::UserStore};

use crate::{
  dto::{
    ByEmailParams, CreateUserBody, ListParams, PageDto, UpdateUserBody, UserDto,
  },
  error::ApiError,
};

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn create<S>(
  State(service): State<Arc<UserService<S>>>,
  OriginalUri(uri): OriginalUri,
  body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  let path = uri.path();
  let Json(body) = body.map_err(|e| ApiError::bad_request(path, e.body_text()))?;
  let new = body.validate().map_err(|e| ApiError::validation(path, e))?;

  let user = service
    .create(new)
    .await
    .map_err(|e| ApiError::from_service(e, path))?;
  Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /users[?page&size&sort&active&search]`
pub async fn list<S>(
  State(service): State<Arc<UserService<S>>>,
  OriginalUri(uri): OriginalUri,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PageDto<UserDto>>, ApiError>
where
  S: UserStore + 'static,
{
  let path = uri.path();
  let Query(params) =
    params.map_err(|e| ApiError::bad_request(path, e.body_text()))?;
  let (filter, sort, page) =
    params.into_query().map_err(|e| ApiError::validation(path, e))?;

  let page = service
    .list(&filter, sort, page)
    .await
    .map_err(|e| ApiError::from_service(e, path))?;
  Ok(Json(PageDto::from(page)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<UserService<S>>>,
  OriginalUri(uri): OriginalUri,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserDto>, ApiError>
where
  S: UserStore + 'static,
{
  let path = uri.path();
  let Path(id) = id.map_err(|e| ApiError::bad_request(path, e.body_text()))?;

  let user = service
    .get(id)
    .await
    .map_err(|e| ApiError::from_service(e, path))?;
  Ok(Json(UserDto::from(user)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /users/{id}` — PATCH-like partial update.
pub async fn update<S>(
  State(service): State<Arc<UserService<S>>>,
  OriginalUri(uri): OriginalUri,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateUserBody>, JsonRejection>,
) -> Result<Json<UserDto>, ApiError>
where
  S: UserStore + 'static,
{
  let path = uri.path();
  let Path(id) = id.map_err(|e| ApiError::bad_request(path, e.body_text()))?;
  let Json(body) = body.map_err(|e| ApiError::bad_request(path, e.body_text()))?;
  let patch = body.validate().map_err(|e| ApiError::validation(path, e))?;

  let user = service
    .update(id, patch)
    .await
    .map_err(|e| ApiError::from_service(e, path))?;
  Ok(Json(UserDto::from(user)))
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
pub async fn delete_one<S>(
  State(service): State<Arc<UserService<S>>>,
  OriginalUri(uri): OriginalUri,
  id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  let path = uri.path();
  let Path(id) = id.map_err(|e| ApiError::bad_request(path, e.body_text()))?;

  service
    .soft_delete(id)
    .await
    .map_err(|e| ApiError::from_service(e, path))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── By email ────────────────────────────────────────────────────────────────

/// `GET /users/by-email?email=`
pub async fn by_email<S>(
  State(service): State<Arc<UserService<S>>>,
  OriginalUri(uri): OriginalUri,
  params: Result<Query<ByEmailParams>, QueryRejection>,
) -> Result<Json<UserDto>, ApiError>
where
  S: UserStore + 'static,
{
  let path = uri.path();
  let Query(params) =
    params.map_err(|e| ApiError::bad_request(path, e.body_text()))?;
  let email = params.validate().map_err(|e| ApiError::validation(path, e))?;

  let user = service
    .get_by_email(&email)
    .await
    .map_err(|e| ApiError::from_service(e, path))?;
  Ok(Json(UserDto::from(user)))
}
