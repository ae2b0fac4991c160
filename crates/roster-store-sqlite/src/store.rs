//! [`SqliteStore`] — the SQLite implementation of [`UserStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  query::{Page, PageRequest, SortSpec, UserFilter},
  store::UserStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{RawUser, encode_dt},
  query::{order_clause, search_condition, search_pattern},
  schema::SCHEMA,
};

const USER_COLUMNS: &str =
  "id, email, first_name, last_name, active, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster user store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// statements run serially on the connection's worker thread, so each
/// operation is atomic with respect to the others.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, new: NewUser) -> Result<User> {
    let now = Utc::now();
    let now_str = encode_dt(now);

    let NewUser { email, first_name, last_name } = new;
    let email_c = email.clone();
    let first_c = first_name.clone();
    let last_c  = last_name.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (email, first_name, last_name, active, created_at, updated_at)
           VALUES (?1, ?2, ?3, 1, ?4, ?4)",
          rusqlite::params![email_c, first_c, last_c, now_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      id,
      email,
      first_name,
      last_name,
      active: true,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
              rusqlite::params![id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    // BINARY collation on the column makes this exact and case-sensitive.
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn email_taken(
    &self,
    email: &str,
    excluding: Option<i64>,
  ) -> Result<bool> {
    let email = email.to_owned();

    let hit: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM users
               WHERE email = ?1 AND (?2 IS NULL OR id <> ?2)
               LIMIT 1",
              rusqlite::params![email, excluding],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(hit.is_some())
  }

  async fn save(&self, user: &User) -> Result<()> {
    let id          = user.id;
    let email       = user.email.clone();
    let first_name  = user.first_name.clone();
    let last_name   = user.last_name.clone();
    let active      = user.active;
    let updated_str = encode_dt(user.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
           SET email = ?2, first_name = ?3, last_name = ?4, active = ?5,
               updated_at = ?6
           WHERE id = ?1",
          rusqlite::params![id, email, first_name, last_name, active, updated_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RowMissing(id));
    }
    Ok(())
  }

  async fn list(
    &self,
    filter: &UserFilter,
    sort:   SortSpec,
    page:   PageRequest,
  ) -> Result<Page<User>> {
    let pattern = search_pattern(filter);
    let active  = filter.active;
    let order   = order_clause(sort);
    // Clamp rather than cast: a wrapped-negative OFFSET would silently read
    // from the start of the table.
    let limit   = i64::try_from(page.size).unwrap_or(i64::MAX);
    let offset  = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    let (total, raws): (u64, Vec<RawUser>) = self
      .conn
      .call(move |conn| {
        // Build the WHERE clause dynamically; placeholder indices follow the
        // order conditions are appended.
        let mut conds: Vec<String> = Vec::new();
        let mut args: Vec<&dyn rusqlite::ToSql> = Vec::new();

        if let Some(p) = &pattern {
          args.push(p);
          conds.push(search_condition(args.len()));
        }
        if let Some(a) = &active {
          args.push(a);
          conds.push(format!("active = ?{}", args.len()));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let total: u64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM users {where_clause}"),
          rusqlite::params_from_iter(args.iter()),
          |row| row.get(0),
        )?;

        args.push(&limit);
        let limit_idx = args.len();
        args.push(&offset);
        let offset_idx = args.len();

        let sql = format!(
          "SELECT {USER_COLUMNS} FROM users
           {where_clause}
           {order}
           LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args.iter()), RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let content: Vec<User> = raws
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<_>>()?;

    Ok(Page {
      content,
      total_elements: total,
      size:           page.size,
      number:         page.page,
    })
  }
}
