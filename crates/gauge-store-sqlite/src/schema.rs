//! SQL schema for the Gauge SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Cascade contract: deleting a user removes their series, measurements and
/// sessions; deleting a series removes its measurements. Both are `ON DELETE
/// CASCADE` so a concurrent insert against a row being deleted either fails
/// the foreign key or is itself cascaded — no orphan rows.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id  TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,      -- argon2 PHC string, never cleartext
    role     TEXT NOT NULL DEFAULT 'admin'
);

CREATE TABLE IF NOT EXISTS series (
    series_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    min_value     REAL NOT NULL,
    max_value     REAL NOT NULL,
    color         TEXT NOT NULL,
    icon          TEXT NOT NULL,
    created_by_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    CHECK (max_value > min_value)
);

CREATE TABLE IF NOT EXISTS measurements (
    measurement_id TEXT PRIMARY KEY,
    value          REAL NOT NULL,
    timestamp      TEXT NOT NULL,  -- semantic measurement time
    series_id      TEXT NOT NULL REFERENCES series(series_id) ON DELETE CASCADE,
    created_by_id  TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at     TEXT NOT NULL   -- server-assigned; distinct from timestamp
);

-- Sessions are a separate keyspace with their own expiry lifecycle,
-- not a domain entity.
CREATE TABLE IF NOT EXISTS sessions (
    token      TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS series_created_idx       ON series(created_at);
CREATE INDEX IF NOT EXISTS measurements_series_idx  ON measurements(series_id);
CREATE INDEX IF NOT EXISTS measurements_ts_idx      ON measurements(timestamp);
CREATE INDEX IF NOT EXISTS sessions_expires_idx     ON sessions(expires_at);

PRAGMA user_version = 1;
";
