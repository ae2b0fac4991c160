//! Translation of the backend-independent [`UserFilter`] and [`SortSpec`]
//! into SQLite query fragments.
//!
//! The search condition is a case-insensitive LIKE over first name, last
//! name, and email. Caller input must never be interpreted as a pattern:
//! [`escape_like`] turns the store's metacharacters into literals before the
//! text is wrapped in `%…%`.

use roster_core::query::{SortField, SortSpec, UserFilter};

/// The LIKE escape character, as it appears inside a SQL string literal.
const ESCAPE_CLAUSE: &str = "ESCAPE '\\'";

// ─── Wildcard escaping ───────────────────────────────────────────────────────

/// Escape `\`, `%`, and `_` with a leading backslash so they match
/// themselves.
///
/// The single pass escapes each character before it can be re-read, which is
/// the same result as the classic replace-backslash-first-then-wildcards
/// ordering: a caller-supplied `\%` becomes `\\\%` (literal backslash,
/// literal percent), never a bare escape sequence.
pub fn escape_like(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// The full LIKE pattern for a normalised search term: lowercased, escaped,
/// wrapped in `%…%`.
pub fn like_pattern(term: &str) -> String {
  format!("%{}%", escape_like(&term.to_lowercase()))
}

// ─── Fragments ───────────────────────────────────────────────────────────────

/// Pattern for [`UserFilter::search_term`], ready to bind; `None` when the
/// search condition is a tautology.
pub fn search_pattern(filter: &UserFilter) -> Option<String> {
  filter.search_term().map(like_pattern)
}

/// The search sub-condition with the pattern bound at placeholder `?{idx}`.
pub fn search_condition(idx: usize) -> String {
  format!(
    "(LOWER(first_name) LIKE ?{idx} {esc} \
      OR LOWER(last_name) LIKE ?{idx} {esc} \
      OR LOWER(email) LIKE ?{idx} {esc})",
    esc = ESCAPE_CLAUSE,
  )
}

/// `ORDER BY` clause for `sort`, with an `id ASC` tiebreaker so the order is
/// total and pages concatenate without duplicates or gaps.
pub fn order_clause(sort: SortSpec) -> String {
  let dir = if sort.descending { "DESC" } else { "ASC" };
  let col = match sort.field {
    SortField::Id => return format!("ORDER BY id {dir}"),
    SortField::Email => "email",
    SortField::FirstName => "first_name",
    SortField::LastName => "last_name",
    SortField::CreatedAt => "created_at",
    SortField::UpdatedAt => "updated_at",
  };
  format!("ORDER BY {col} {dir}, id ASC")
}
