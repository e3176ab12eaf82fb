//! Error type for `patron-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The UNIQUE constraint on `phone_number` rejected a write. Raced writes
  /// that slip past the service's pre-check land here.
  #[error("phone number '{0}' already exists")]
  DuplicatePhone(String),

  #[error("customer not found: {0}")]
  CustomerNotFound(i64),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown audit action: {0:?}")]
  UnknownAction(String),
}

impl From<Error> for patron_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicatePhone(phone) => patron_core::Error::DuplicatePhone(phone),
      Error::CustomerNotFound(id) => patron_core::Error::NotFound(id),
      other => patron_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
