//! CSV export handler — every record, identifier descending, unpaginated.

use std::sync::Arc;

use axum::{
  extract::State,
  http::header,
  response::IntoResponse,
};
use patron_core::{
  CustomerService,
  customer::Customer,
  store::{AuditStore, CustomerStore},
};

use crate::error::ApiError;

const CSV_HEADER: &str = "ID,First Name,Last Name,Date of Birth,Country Code,\
Country Name,Phone Number,Created At,Updated At";

/// `GET /customers/export` — `text/csv` attachment.
pub async fn csv<C, A>(
  State(service): State<Arc<CustomerService<C, A>>>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CustomerStore,
  A: AuditStore,
{
  let customers = service.export_all().await?;
  let body = to_csv(&customers);

  Ok((
    [
      (header::CONTENT_TYPE, "text/csv"),
      (
        header::CONTENT_DISPOSITION,
        "attachment; filename=customers.csv",
      ),
    ],
    body,
  ))
}

/// Render the fixed-column CSV body, or a single placeholder line when there
/// is nothing to export.
fn to_csv(customers: &[Customer]) -> String {
  if customers.is_empty() {
    return "No customer data available\n".to_owned();
  }

  let mut out = String::from(CSV_HEADER);
  out.push('\n');
  for c in customers {
    out.push_str(&format!(
      "{},{},{},{},{},{},{},{},{}\n",
      c.id,
      c.first_name,
      c.last_name,
      c.date_of_birth,
      c.country_code,
      c.country_name,
      c.phone_number,
      c.created_at.to_rfc3339(),
      c.updated_at.to_rfc3339(),
    ));
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};

  use super::*;

  #[test]
  fn empty_export_is_a_placeholder_line() {
    assert_eq!(to_csv(&[]), "No customer data available\n");
  }

  #[test]
  fn rows_follow_the_fixed_column_order() {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let customer = Customer {
      id:            3,
      first_name:    "Anna".into(),
      last_name:     "Lee".into(),
      date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
      country_code:  "+91".into(),
      country_name:  "India".into(),
      phone_number:  "9876543210".into(),
      created_at:    at,
      updated_at:    at,
    };

    let body = to_csv(&[customer]);
    let mut lines = body.lines();
    assert_eq!(
      lines.next().unwrap(),
      "ID,First Name,Last Name,Date of Birth,Country Code,Country Name,\
       Phone Number,Created At,Updated At"
    );
    assert_eq!(
      lines.next().unwrap(),
      "3,Anna,Lee,1990-04-12,+91,India,9876543210,\
       2024-01-02T03:04:05+00:00,2024-01-02T03:04:05+00:00"
    );
    assert!(lines.next().is_none());
  }
}
