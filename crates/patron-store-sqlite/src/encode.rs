//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`.
//! Both orders lexicographically the same as chronologically, so ORDER BY on
//! the raw columns is correct.

use chrono::{DateTime, NaiveDate, Utc};
use patron_core::{
  audit::{AuditAction, AuditEntry},
  customer::Customer,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── AuditAction ─────────────────────────────────────────────────────────────

pub fn encode_action(a: AuditAction) -> &'static str {
  match a {
    AuditAction::Create => "CREATE",
    AuditAction::Update => "UPDATE",
    AuditAction::Delete => "DELETE",
  }
}

pub fn decode_action(s: &str) -> Result<AuditAction> {
  match s {
    "CREATE" => Ok(AuditAction::Create),
    "UPDATE" => Ok(AuditAction::Update),
    "DELETE" => Ok(AuditAction::Delete),
    other => Err(Error::UnknownAction(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `customers` row.
pub struct RawCustomer {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: String,
  pub country_code:  String,
  pub country_name:  String,
  pub phone_number:  String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawCustomer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      date_of_birth: row.get(3)?,
      country_code:  row.get(4)?,
      country_name:  row.get(5)?,
      phone_number:  row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_customer(self) -> Result<Customer> {
    Ok(Customer {
      id:            self.id,
      first_name:    self.first_name,
      last_name:     self.last_name,
      date_of_birth: decode_date(&self.date_of_birth)?,
      country_code:  self.country_code,
      country_name:  self.country_name,
      phone_number:  self.phone_number,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `audit_log` row.
pub struct RawAuditEntry {
  pub id:          i64,
  pub entity_name: String,
  pub entity_id:   i64,
  pub action:      String,
  pub changes:     String,
  pub recorded_at: String,
}

impl RawAuditEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      entity_name: row.get(1)?,
      entity_id:   row.get(2)?,
      action:      row.get(3)?,
      changes:     row.get(4)?,
      recorded_at: row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      id:          self.id,
      entity_name: self.entity_name,
      entity_id:   self.entity_id,
      action:      decode_action(&self.action)?,
      changes:     self.changes,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
