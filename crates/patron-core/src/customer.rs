//! Customer — the persisted entity and its write-side input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored customer record.
///
/// The identifier and both timestamps are assigned by the store; everything
/// else comes from caller input. This is also the outward-facing projection —
/// it carries no storage artifacts, so it serialises directly across the
/// service boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: NaiveDate,
  pub country_code:  String,
  pub country_name:  String,
  pub phone_number:  String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// The caller-supplied field set accepted by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: NaiveDate,
  pub country_code:  String,
  pub country_name:  String,
  pub phone_number:  String,
}

impl CustomerInput {
  /// Return a copy with surrounding whitespace stripped from every string
  /// field. Trimming happens before validation and before storage.
  pub fn trimmed(&self) -> Self {
    Self {
      first_name:    self.first_name.trim().to_owned(),
      last_name:     self.last_name.trim().to_owned(),
      date_of_birth: self.date_of_birth,
      country_code:  self.country_code.trim().to_owned(),
      country_name:  self.country_name.trim().to_owned(),
      phone_number:  self.phone_number.trim().to_owned(),
    }
  }
}
