//! Field validation for customer input.
//!
//! Runs after trimming, before any store access. Every violated constraint
//! is collected so the caller sees all of them at once, not just the first.

use chrono::Utc;

use crate::{customer::CustomerInput, error::ValidationErrors};

const NAME_MAX: usize = 50;

/// Validate a trimmed [`CustomerInput`] against the field constraints.
pub fn validate(input: &CustomerInput) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::default();

  if input.first_name.is_empty() {
    errors.add("firstName", "First name is required");
  } else if input.first_name.chars().count() > NAME_MAX {
    errors.add("firstName", "First name must be at most 50 characters");
  }

  if input.last_name.is_empty() {
    errors.add("lastName", "Last name is required");
  } else if input.last_name.chars().count() > NAME_MAX {
    errors.add("lastName", "Last name must be at most 50 characters");
  }

  if input.date_of_birth > Utc::now().date_naive() {
    errors.add("dateOfBirth", "Date of birth must be today or in the past");
  }

  if !is_country_code(&input.country_code) {
    errors.add(
      "countryCode",
      "Country code must start with + followed by 1-4 digits",
    );
  }

  if input.country_name.is_empty() {
    errors.add("countryName", "Country name is required");
  }

  if !is_phone_number(&input.phone_number) {
    errors.add("phoneNumber", "Phone number must be exactly 10 digits");
  }

  if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// `+` followed by 1–4 ASCII digits, nothing else.
fn is_country_code(s: &str) -> bool {
  let Some(digits) = s.strip_prefix('+') else {
    return false;
  };
  (1..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly 10 ASCII digits.
fn is_phone_number(s: &str) -> bool {
  s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit())
}
