//! Request/response DTOs and field validation.
//!
//! All JSON is camelCase. Validation runs before the service is called and
//! collects one message per failing field, keyed by the wire-format field
//! name.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use roster_core::{
  query::{Page, PageRequest, SortField, SortSpec, UserFilter},
  user::{FIELD_MAX_LEN, NewUser, User, UserPatch},
};
use serde::{Deserialize, Serialize};

// ─── Field checks ────────────────────────────────────────────────────────────

/// Loose email-shape check: one `@`, non-empty local part and domain, no
/// whitespace.
pub fn looks_like_email(value: &str) -> bool {
  match value.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
    }
    None => false,
  }
}

fn email_error(value: &str) -> Option<String> {
  if value.trim().is_empty() {
    Some("Email is required".to_owned())
  } else if value.chars().count() > FIELD_MAX_LEN {
    Some(format!("Email must not exceed {FIELD_MAX_LEN} characters"))
  } else if !looks_like_email(value) {
    Some("Email must be valid".to_owned())
  } else {
    None
  }
}

fn name_error(label: &str, value: &str) -> Option<String> {
  if value.trim().is_empty() {
    Some(format!("{label} is required"))
  } else if value.chars().count() > FIELD_MAX_LEN {
    Some(format!("{label} must not exceed {FIELD_MAX_LEN} characters"))
  } else {
    None
  }
}

type FieldErrors = BTreeMap<String, String>;

fn collect(errors: &mut FieldErrors, field: &str, error: Option<String>) {
  if let Some(message) = error {
    errors.insert(field.to_owned(), message);
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Body of `POST /users`. Fields are optional at the serde level so a
/// missing field becomes a validation message instead of a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserBody {
  pub email:      Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
}

impl CreateUserBody {
  pub fn validate(self) -> Result<NewUser, FieldErrors> {
    let email      = self.email.unwrap_or_default();
    let first_name = self.first_name.unwrap_or_default();
    let last_name  = self.last_name.unwrap_or_default();

    let mut errors = FieldErrors::new();
    collect(&mut errors, "email", email_error(&email));
    collect(&mut errors, "firstName", name_error("First name", &first_name));
    collect(&mut errors, "lastName", name_error("Last name", &last_name));

    if errors.is_empty() {
      Ok(NewUser { email, first_name, last_name })
    } else {
      Err(errors)
    }
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Body of `PUT /users/{id}` — a partial update. Absent fields are left
/// untouched; present fields must pass the same checks as on creation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserBody {
  pub email:      Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub active:     Option<bool>,
}

impl UpdateUserBody {
  pub fn validate(self) -> Result<UserPatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(email) = &self.email {
      collect(&mut errors, "email", email_error(email));
    }
    if let Some(first_name) = &self.first_name {
      collect(&mut errors, "firstName", name_error("First name", first_name));
    }
    if let Some(last_name) = &self.last_name {
      collect(&mut errors, "lastName", name_error("Last name", last_name));
    }

    if errors.is_empty() {
      Ok(UserPatch {
        email:      self.email,
        first_name: self.first_name,
        last_name:  self.last_name,
        active:     self.active,
      })
    } else {
      Err(errors)
    }
  }
}

// ─── List parameters ─────────────────────────────────────────────────────────

pub const MAX_PAGE_SIZE: u64 = 100;

/// Query string of `GET /users`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:   Option<u64>,
  pub size:   Option<u64>,
  /// `field` or `field,asc|desc` (camelCase field names).
  pub sort:   Option<String>,
  pub active: Option<bool>,
  pub search: Option<String>,
}

impl ListParams {
  pub fn into_query(
    self,
  ) -> Result<(UserFilter, SortSpec, PageRequest), FieldErrors> {
    let mut errors = FieldErrors::new();

    let defaults = PageRequest::default();
    let page = PageRequest {
      page: self.page.unwrap_or(defaults.page),
      size: self.size.unwrap_or(defaults.size),
    };
    if page.size < 1 || page.size > MAX_PAGE_SIZE {
      errors.insert(
        "size".to_owned(),
        format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
      );
    }

    let sort = match self.sort.as_deref() {
      None => SortSpec::default(),
      Some(s) => match parse_sort(s) {
        Ok(sort) => sort,
        Err(message) => {
          errors.insert("sort".to_owned(), message);
          SortSpec::default()
        }
      },
    };

    if errors.is_empty() {
      let filter = UserFilter { search: self.search, active: self.active };
      Ok((filter, sort, page))
    } else {
      Err(errors)
    }
  }
}

fn parse_sort(s: &str) -> Result<SortSpec, String> {
  let (field_s, dir_s) = match s.split_once(',') {
    Some((f, d)) => (f.trim(), Some(d.trim())),
    None => (s.trim(), None),
  };

  let field = SortField::parse(field_s)
    .ok_or_else(|| format!("Unknown sort field: {field_s}"))?;

  let descending = match dir_s {
    None => false,
    Some(d) if d.eq_ignore_ascii_case("asc") => false,
    Some(d) if d.eq_ignore_ascii_case("desc") => true,
    Some(d) => return Err(format!("Unknown sort direction: {d}")),
  };

  Ok(SortSpec { field, descending })
}

// ─── By-email parameters ─────────────────────────────────────────────────────

/// Query string of `GET /users/by-email`.
#[derive(Debug, Default, Deserialize)]
pub struct ByEmailParams {
  pub email: Option<String>,
}

impl ByEmailParams {
  pub fn validate(self) -> Result<String, FieldErrors> {
    let email = self.email.unwrap_or_default();
    let mut errors = FieldErrors::new();
    collect(&mut errors, "email", email_error(&email));

    if errors.is_empty() { Ok(email) } else { Err(errors) }
  }
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
  pub id:         i64,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
  fn from(u: User) -> Self {
    UserDto {
      id:         u.id,
      email:      u.email,
      first_name: u.first_name,
      last_name:  u.last_name,
      active:     u.active,
      created_at: u.created_at,
      updated_at: u.updated_at,
    }
  }
}

/// The page envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
  pub content:        Vec<T>,
  pub total_elements: u64,
  pub total_pages:    u64,
  pub size:           u64,
  pub number:         u64,
  pub first:          bool,
  pub last:           bool,
  pub empty:          bool,
}

impl From<Page<User>> for PageDto<UserDto> {
  fn from(page: Page<User>) -> Self {
    let total_pages = page.total_pages();
    let first       = page.is_first();
    let last        = page.is_last();
    let empty       = page.is_empty();
    let page        = page.map(UserDto::from);

    PageDto {
      content: page.content,
      total_elements: page.total_elements,
      total_pages,
      size: page.size,
      number: page.number,
      first,
      last,
      empty,
    }
  }
}
