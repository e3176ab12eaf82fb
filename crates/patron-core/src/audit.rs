//! Audit types — the append-only trail written alongside every mutation.
//!
//! Entries are never updated or deleted once inserted. Each entry references
//! its customer by identifier only; the customer may later be deleted while
//! its trail remains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::customer::Customer;

/// Entity name recorded on every customer audit entry.
pub const CUSTOMER_ENTITY: &str = "Customer";

/// The kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
  Create,
  Update,
  Delete,
}

/// A stored audit entry. Identifier and timestamp are store-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
  pub id:          i64,
  pub entity_name: String,
  pub entity_id:   i64,
  pub action:      AuditAction,
  /// Human-readable change summary, free text.
  pub changes:     String,
  pub recorded_at: DateTime<Utc>,
}

/// An audit entry awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
  pub entity_name: String,
  pub entity_id:   i64,
  pub action:      AuditAction,
  pub changes:     String,
}

impl NewAuditEntry {
  /// Entry for a freshly created customer.
  pub fn created(customer: &Customer) -> Self {
    Self {
      entity_name: CUSTOMER_ENTITY.to_owned(),
      entity_id:   customer.id,
      action:      AuditAction::Create,
      changes:     format!(
        "Created customer: {} {}, phone: {}",
        customer.first_name, customer.last_name, customer.phone_number
      ),
    }
  }

  /// Entry for an update, with the summary computed by [`crate::diff`].
  pub fn updated(entity_id: i64, summary: String) -> Self {
    Self {
      entity_name: CUSTOMER_ENTITY.to_owned(),
      entity_id,
      action: AuditAction::Update,
      changes: summary,
    }
  }

  /// Entry for a deletion; `customer` is the record captured before removal.
  pub fn deleted(customer: &Customer) -> Self {
    Self {
      entity_name: CUSTOMER_ENTITY.to_owned(),
      entity_id:   customer.id,
      action:      AuditAction::Delete,
      changes:     format!(
        "Deleted customer: {} {}, phone: {}",
        customer.first_name, customer.last_name, customer.phone_number
      ),
    }
  }
}
