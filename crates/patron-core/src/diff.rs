//! Change-summary computation for update audit entries.
//!
//! The comparison is an explicit ordered field list, not generic reflection;
//! the set and order below are fixed and covered by tests. Phone number is
//! persisted by updates but deliberately left out of the summary.

use crate::customer::{Customer, CustomerInput};

/// Literal summary recorded when an update changes nothing.
pub const NO_CHANGES: &str = "No changes";

/// Compare the stored record against trimmed incoming input, producing one
/// `field: 'old' -> 'new'` fragment per differing field, joined with `"; "`.
pub fn change_summary(existing: &Customer, incoming: &CustomerInput) -> String {
  let mut fragments: Vec<String> = Vec::new();

  if existing.first_name != incoming.first_name {
    fragments.push(format!(
      "firstName: '{}' -> '{}'",
      existing.first_name, incoming.first_name
    ));
  }
  if existing.last_name != incoming.last_name {
    fragments.push(format!(
      "lastName: '{}' -> '{}'",
      existing.last_name, incoming.last_name
    ));
  }
  if existing.date_of_birth != incoming.date_of_birth {
    fragments.push(format!(
      "dateOfBirth: '{}' -> '{}'",
      existing.date_of_birth, incoming.date_of_birth
    ));
  }
  if existing.country_code != incoming.country_code {
    fragments.push(format!(
      "countryCode: '{}' -> '{}'",
      existing.country_code, incoming.country_code
    ));
  }
  if existing.country_name != incoming.country_name {
    fragments.push(format!(
      "countryName: '{}' -> '{}'",
      existing.country_name, incoming.country_name
    ));
  }

  if fragments.is_empty() {
    NO_CHANGES.to_owned()
  } else {
    fragments.join("; ")
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;

  fn stored() -> Customer {
    Customer {
      id:            7,
      first_name:    "Anna".into(),
      last_name:     "Lee".into(),
      date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
      country_code:  "+91".into(),
      country_name:  "India".into(),
      phone_number:  "9876543210".into(),
      created_at:    Utc::now(),
      updated_at:    Utc::now(),
    }
  }

  fn same_input() -> CustomerInput {
    let c = stored();
    CustomerInput {
      first_name:    c.first_name,
      last_name:     c.last_name,
      date_of_birth: c.date_of_birth,
      country_code:  c.country_code,
      country_name:  c.country_name,
      phone_number:  c.phone_number,
    }
  }

  #[test]
  fn identical_input_yields_no_changes() {
    assert_eq!(change_summary(&stored(), &same_input()), "No changes");
  }

  #[test]
  fn single_field_change() {
    let mut input = same_input();
    input.first_name = "Annabel".into();
    assert_eq!(
      change_summary(&stored(), &input),
      "firstName: 'Anna' -> 'Annabel'"
    );
  }

  #[test]
  fn multiple_changes_join_in_field_order() {
    let mut input = same_input();
    input.last_name = "Ray".into();
    input.country_code = "+44".into();
    input.country_name = "United Kingdom".into();
    assert_eq!(
      change_summary(&stored(), &input),
      "lastName: 'Lee' -> 'Ray'; countryCode: '+91' -> '+44'; \
       countryName: 'India' -> 'United Kingdom'"
    );
  }

  #[test]
  fn date_change_uses_iso_format() {
    let mut input = same_input();
    input.date_of_birth = NaiveDate::from_ymd_opt(1991, 1, 2).unwrap();
    assert_eq!(
      change_summary(&stored(), &input),
      "dateOfBirth: '1990-04-12' -> '1991-01-02'"
    );
  }

  #[test]
  fn phone_number_is_excluded_from_the_summary() {
    let mut input = same_input();
    input.phone_number = "1112223334".into();
    assert_eq!(change_summary(&stored(), &input), "No changes");
  }
}
