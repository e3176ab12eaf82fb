//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The UNIQUE constraint on `phone_number` is the storage-level uniqueness
/// guarantee; the service's pre-check only rejects known duplicates early.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS customers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,          -- ISO 8601 calendar date
    country_code  TEXT NOT NULL,
    country_name  TEXT NOT NULL,
    phone_number  TEXT NOT NULL UNIQUE,
    created_at    TEXT NOT NULL,          -- RFC 3339 UTC; set once at insert
    updated_at    TEXT NOT NULL
);

-- Strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS audit_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_name TEXT NOT NULL,
    entity_id   INTEGER NOT NULL,         -- weak reference, no FK
    action      TEXT NOT NULL,            -- 'CREATE' | 'UPDATE' | 'DELETE'
    changes     TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS customers_country_code_idx ON customers(country_code);
CREATE INDEX IF NOT EXISTS audit_log_entity_idx       ON audit_log(entity_id);

PRAGMA user_version = 1;
";
