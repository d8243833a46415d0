//! SQL schema for the vigil SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- The single live record. The CHECK pins the table to one row under the
-- fixed key, matching the original document path 'deadlines/current'.
CREATE TABLE IF NOT EXISTS current (
    slot        TEXT PRIMARY KEY CHECK (slot = 'current'),
    record_json TEXT NOT NULL,    -- full DeadlineRecord document
    updated_at  TEXT NOT NULL     -- ISO 8601 UTC
);

-- History is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS history (
    entry_id    TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,    -- ordering key for newest-first listing
    record_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS history_created_idx ON history(created_at);

PRAGMA user_version = 1;
";
