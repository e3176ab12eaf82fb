//! The `CustomerStore` / `AuditStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `patron-store-sqlite`). Higher layers depend on these abstractions, not on
//! any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  audit::{AuditEntry, NewAuditEntry},
  customer::{Customer, CustomerInput},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// At most one filter predicate applies per query. Name, phone, and country
/// code cannot be combined; selection priority is fixed (see
/// [`CustomerFilter::select`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerFilter {
  /// Case-insensitive substring match against first OR last name.
  Name(String),
  /// Phone numbers starting with the given digits.
  PhonePrefix(String),
  /// Exact country-code match.
  CountryCode(String),
}

impl CustomerFilter {
  /// Pick the effective filter from the raw query parameters.
  ///
  /// Priority: name, then phone, then country code; a parameter counts only
  /// when non-blank after trimming. Lower-priority parameters are ignored,
  /// never combined.
  pub fn select(
    name: Option<&str>,
    phone: Option<&str>,
    country_code: Option<&str>,
  ) -> Option<Self> {
    if let Some(name) = non_blank(name) {
      return Some(Self::Name(name));
    }
    if let Some(phone) = non_blank(phone) {
      return Some(Self::PhonePrefix(phone));
    }
    non_blank(country_code).map(Self::CountryCode)
  }
}

fn non_blank(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
}

/// A sortable customer field. Wire names are camelCase, matching the
/// serialised record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
  #[default]
  Id,
  FirstName,
  LastName,
  DateOfBirth,
  CountryCode,
  CountryName,
  PhoneNumber,
  CreatedAt,
  UpdatedAt,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

impl SortDirection {
  /// Lenient parse: `"asc"` in any case is ascending, everything else
  /// descends.
  pub fn from_param(s: &str) -> Self {
    if s.eq_ignore_ascii_case("asc") { Self::Asc } else { Self::Desc }
  }
}

/// Sort order applied before pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
  pub field:     SortField,
  pub direction: SortDirection,
}

impl Sort {
  pub fn new(field: SortField, direction: SortDirection) -> Self {
    Self { field, direction }
  }

  /// Identifier descending — the export order.
  pub fn id_desc() -> Self {
    Self::default()
  }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: usize,
  pub size: usize,
}

impl PageRequest {
  pub fn new(page: usize, size: usize) -> Self {
    Self { page, size }
  }
}

/// One page of results plus match totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items:          Vec<T>,
  pub page:           usize,
  pub size:           usize,
  pub total_elements: u64,
  pub total_pages:    u64,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Durable keyed storage of customer records.
///
/// The backend must enforce phone-number uniqueness itself (e.g. a UNIQUE
/// column constraint) and surface a conflicting write as an error that
/// converts into [`crate::Error::DuplicatePhone`] — the service's pre-check
/// is an early rejection, not a substitute for that guarantee.
pub trait CustomerStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Insert a new record; the store assigns the identifier and sets both
  /// timestamps to the insertion time.
  fn insert<'a>(
    &'a self,
    input: &'a CustomerInput,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + 'a;

  /// Overwrite the mutable fields and phone number of the record with `id`,
  /// refreshing `updated_at` and leaving `id`/`created_at` untouched.
  fn update<'a>(
    &'a self,
    id: i64,
    input: &'a CustomerInput,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + 'a;

  /// Permanently remove the record with `id`.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch a record by identifier. Returns `None` if absent.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Paginated scan with an optional filter predicate, sorted before the
  /// page slice is taken.
  fn list<'a>(
    &'a self,
    filter: Option<&'a CustomerFilter>,
    sort: Sort,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Customer>, Self::Error>> + Send + 'a;

  /// Every record in the given order, unpaginated.
  fn list_all(
    &self,
    sort: Sort,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// Does any record (other than `exclude_id`, when given) hold this phone
  /// number?
  fn phone_exists<'a>(
    &'a self,
    phone: &'a str,
    exclude_id: Option<i64>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Total number of stored records.
  fn count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

/// Durable append-only storage of audit entries. Insert only; the core never
/// reads the trail back.
pub trait AuditStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Append one entry; the store assigns the identifier and timestamp.
  fn append(
    &self,
    entry: NewAuditEntry,
  ) -> impl Future<Output = Result<AuditEntry, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_priority_is_name_then_phone_then_country() {
    let f = CustomerFilter::select(Some("ann"), Some("98"), Some("+91"));
    assert_eq!(f, Some(CustomerFilter::Name("ann".into())));

    let f = CustomerFilter::select(None, Some("98"), Some("+91"));
    assert_eq!(f, Some(CustomerFilter::PhonePrefix("98".into())));

    let f = CustomerFilter::select(None, None, Some("+91"));
    assert_eq!(f, Some(CustomerFilter::CountryCode("+91".into())));

    assert_eq!(CustomerFilter::select(None, None, None), None);
  }

  #[test]
  fn blank_parameters_fall_through() {
    let f = CustomerFilter::select(Some("   "), Some(" 98 "), None);
    assert_eq!(f, Some(CustomerFilter::PhonePrefix("98".into())));
  }

  #[test]
  fn sort_direction_parses_leniently() {
    assert_eq!(SortDirection::from_param("asc"), SortDirection::Asc);
    assert_eq!(SortDirection::from_param("ASC"), SortDirection::Asc);
    assert_eq!(SortDirection::from_param("desc"), SortDirection::Desc);
    assert_eq!(SortDirection::from_param("sideways"), SortDirection::Desc);
  }
}
