//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// AUTOINCREMENT keeps ids monotonic so a soft-deleted user's id is never
/// reused. The unique index on `email` (BINARY collation, so case-sensitive)
/// is the write-time backstop for the service's check-then-insert sequence.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at  TEXT NOT NULL    -- refreshed on every mutation
);

CREATE UNIQUE INDEX IF NOT EXISTS users_email_uniq ON users(email);
CREATE INDEX IF NOT EXISTS users_active_idx ON users(active);

PRAGMA user_version = 1;
";
