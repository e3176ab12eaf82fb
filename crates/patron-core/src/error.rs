//! Error types for `patron-core`.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field name → human-readable message, one entry per violated constraint.
///
/// Backed by a `BTreeMap` so the reported order is deterministic. Keys use
/// the wire-facing camelCase field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub BTreeMap<&'static str, &'static str>);

impl ValidationErrors {
  pub fn add(&mut self, field: &'static str, message: &'static str) {
    self.0.insert(field, message);
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl std::fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut first = true;
    for (field, message) in &self.0 {
      if !first {
        write!(f, "; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// One or more field constraints violated; all are reported together.
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("customer with id {0} not found")]
  NotFound(i64),

  /// The phone number collides with another record's.
  #[error("phone number '{0}' already exists")]
  DuplicatePhone(String),

  /// Any other failure, surfaced opaquely to callers.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
