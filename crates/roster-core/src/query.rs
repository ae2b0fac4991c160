//! Filter, sort, and pagination value types.
//!
//! [`UserFilter`] is the backend-independent predicate: it defines the
//! matching semantics in plain Rust, and each store backend must translate it
//! into native query syntax with identical results (see
//! `roster-store-sqlite` for the SQL translation, including LIKE-wildcard
//! escaping).

use crate::user::User;

// ─── Filter ───────────────────────────────────────────────────────────────────

/// Optional sub-conditions combined with AND.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
  /// Case-insensitive substring match over first name, last name, or email.
  pub search: Option<String>,
  /// Exact match on the `active` flag.
  pub active: Option<bool>,
}

impl UserFilter {
  /// The normalised search term: trimmed, blank treated as absent.
  pub fn search_term(&self) -> Option<&str> {
    self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }

  /// Reference matching semantics. An absent sub-condition is a tautology.
  pub fn matches(&self, user: &User) -> bool {
    let search_ok = match self.search_term() {
      None => true,
      Some(term) => {
        let needle = term.to_lowercase();
        user.first_name.to_lowercase().contains(&needle)
          || user.last_name.to_lowercase().contains(&needle)
          || user.email.to_lowercase().contains(&needle)
      }
    };

    let active_ok = self.active.is_none_or(|a| user.active == a);

    search_ok && active_ok
  }
}

// ─── Sort ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
  #[default]
  Id,
  Email,
  FirstName,
  LastName,
  CreatedAt,
  UpdatedAt,
}

impl SortField {
  /// Parse a wire-format field name (camelCase, as exposed by the API).
  pub fn parse(s: &str) -> Option<SortField> {
    match s {
      "id" => Some(SortField::Id),
      "email" => Some(SortField::Email),
      "firstName" => Some(SortField::FirstName),
      "lastName" => Some(SortField::LastName),
      "createdAt" => Some(SortField::CreatedAt),
      "updatedAt" => Some(SortField::UpdatedAt),
      _ => None,
    }
  }
}

/// Result ordering; defaults to ascending by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortSpec {
  pub field:      SortField,
  pub descending: bool,
}

// ─── Pagination ───────────────────────────────────────────────────────────────

/// A zero-indexed page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
  pub page: u64,
  pub size: u64,
}

impl Default for PageRequest {
  fn default() -> Self { PageRequest { page: 0, size: 20 } }
}

impl PageRequest {
  /// Offset of the first row on this page. Saturates, so an absurd page
  /// number lands past the end of any result set instead of wrapping.
  pub fn offset(&self) -> u64 { self.page.saturating_mul(self.size) }
}

/// One slice of a result set plus the metadata needed to page through it.
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub content:        Vec<T>,
  /// Count of matching rows across all pages.
  pub total_elements: u64,
  /// The requested page size (not the slice length).
  pub size:           u64,
  /// The zero-indexed page number.
  pub number:         u64,
}

impl<T> Page<T> {
  pub fn total_pages(&self) -> u64 {
    if self.size == 0 {
      0
    } else {
      self.total_elements.div_ceil(self.size)
    }
  }

  pub fn is_first(&self) -> bool { self.number == 0 }

  /// The last page; an empty result set counts as its own last page.
  pub fn is_last(&self) -> bool {
    self.number.saturating_add(1) >= self.total_pages().max(1)
  }

  pub fn is_empty(&self) -> bool { self.content.is_empty() }

  /// Map the content, keeping the pagination metadata.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      content:        self.content.into_iter().map(f).collect(),
      total_elements: self.total_elements,
      size:           self.size,
      number:         self.number,
    }
  }
}
