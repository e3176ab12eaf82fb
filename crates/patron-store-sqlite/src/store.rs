//! [`SqliteStore`] — the SQLite implementation of [`CustomerStore`] and
//! [`AuditStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use patron_core::{
  audit::{AuditEntry, NewAuditEntry},
  customer::{Customer, CustomerInput},
  store::{
    AuditStore, CustomerFilter, CustomerStore, Page, PageRequest, Sort,
    SortDirection, SortField,
  },
};

use crate::{
  encode::{encode_action, encode_date, encode_dt, RawAuditEntry, RawCustomer},
  schema::SCHEMA,
  Error, Result,
};

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, date_of_birth, \
   country_code, country_name, phone_number, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Customer and audit storage backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read the full audit trail, oldest first. Diagnostic accessor — nothing
  /// in the service path reads the trail back.
  pub async fn audit_entries(&self) -> Result<Vec<AuditEntry>> {
    let raws: Vec<RawAuditEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, entity_name, entity_id, action, changes, recorded_at
           FROM audit_log ORDER BY id",
        )?;
        let rows = stmt.query_map([], RawAuditEntry::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await?;

    raws.into_iter().map(RawAuditEntry::into_entry).collect()
  }
}

// ─── SQL fragments ───────────────────────────────────────────────────────────

/// WHERE clause plus positional string arguments for a filter.
fn filter_clause(
  filter: Option<&CustomerFilter>,
) -> (&'static str, Vec<String>) {
  match filter {
    None => ("", vec![]),
    Some(CustomerFilter::Name(name)) => (
      " WHERE LOWER(first_name) LIKE '%' || LOWER(?1) || '%' \
         OR LOWER(last_name) LIKE '%' || LOWER(?1) || '%'",
      vec![name.clone()],
    ),
    Some(CustomerFilter::PhonePrefix(prefix)) => {
      (" WHERE phone_number LIKE ?1 || '%'", vec![prefix.clone()])
    }
    Some(CustomerFilter::CountryCode(code)) => {
      (" WHERE country_code = ?1", vec![code.clone()])
    }
  }
}

/// ORDER BY clause. Column names are fixed strings picked by enum match;
/// no caller input reaches the SQL text.
fn order_clause(sort: Sort) -> String {
  let column = match sort.field {
    SortField::Id => "id",
    SortField::FirstName => "first_name",
    SortField::LastName => "last_name",
    SortField::DateOfBirth => "date_of_birth",
    SortField::CountryCode => "country_code",
    SortField::CountryName => "country_name",
    SortField::PhoneNumber => "phone_number",
    SortField::CreatedAt => "created_at",
    SortField::UpdatedAt => "updated_at",
  };
  let direction = match sort.direction {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  };
  format!(" ORDER BY {column} {direction}")
}

/// Rewrite a UNIQUE-constraint failure on a write as [`Error::DuplicatePhone`]
/// for `phone`. The phone number carries the only UNIQUE constraint in the
/// schema.
fn map_constraint(e: tokio_rusqlite::Error, phone: &str) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    f,
    _,
  )) = &e
    && f.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return Error::DuplicatePhone(phone.to_owned());
  }
  Error::Database(e)
}

// ─── CustomerStore impl ──────────────────────────────────────────────────────

impl CustomerStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: &CustomerInput) -> Result<Customer> {
    let now = Utc::now();
    let now_str = encode_dt(now);
    let dob_str = encode_date(input.date_of_birth);
    let fields = input.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO customers (
             first_name, last_name, date_of_birth,
             country_code, country_name, phone_number,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            fields.first_name,
            fields.last_name,
            dob_str,
            fields.country_code,
            fields.country_name,
            fields.phone_number,
            now_str,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| map_constraint(e, &input.phone_number))?;

    Ok(Customer {
      id,
      first_name: input.first_name.clone(),
      last_name: input.last_name.clone(),
      date_of_birth: input.date_of_birth,
      country_code: input.country_code.clone(),
      country_name: input.country_name.clone(),
      phone_number: input.phone_number.clone(),
      created_at: now,
      updated_at: now,
    })
  }

  async fn update(&self, id: i64, input: &CustomerInput) -> Result<Customer> {
    let now_str = encode_dt(Utc::now());
    let dob_str = encode_date(input.date_of_birth);
    let fields = input.clone();

    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE customers SET
             first_name = ?1, last_name = ?2, date_of_birth = ?3,
             country_code = ?4, country_name = ?5, phone_number = ?6,
             updated_at = ?7
           WHERE id = ?8",
          rusqlite::params![
            fields.first_name,
            fields.last_name,
            dob_str,
            fields.country_code,
            fields.country_name,
            fields.phone_number,
            now_str,
            id,
          ],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
              rusqlite::params![id],
              RawCustomer::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(|e| map_constraint(e, &input.phone_number))?;

    raw.ok_or(Error::CustomerNotFound(id))?.into_customer()
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM customers WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if n == 0 {
      return Err(Error::CustomerNotFound(id));
    }
    Ok(())
  }

  async fn get(&self, id: i64) -> Result<Option<Customer>> {
    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
              rusqlite::params![id],
              RawCustomer::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCustomer::into_customer).transpose()
  }

  async fn list(
    &self,
    filter: Option<&CustomerFilter>,
    sort: Sort,
    page: PageRequest,
  ) -> Result<Page<Customer>> {
    let filter = filter.cloned();
    let order = order_clause(sort);
    let size = page.size.max(1);
    // Page index and size come straight from the query string; saturate and
    // clamp to what SQLite accepts as an integer literal so absurd values
    // yield an empty page instead of overflowing.
    let limit = size.min(i64::MAX as usize) as i64;
    let offset =
      page.page.saturating_mul(size).min(i64::MAX as usize) as i64;

    let (raws, total): (Vec<RawCustomer>, u64) = self
      .conn
      .call(move |conn| {
        let (where_sql, args) = filter_clause(filter.as_ref());

        let total: u64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM customers{where_sql}"),
          rusqlite::params_from_iter(args.iter()),
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {CUSTOMER_COLUMNS} FROM customers{where_sql}{order} \
           LIMIT {limit} OFFSET {offset}"
        ))?;
        let rows =
          stmt.query_map(rusqlite::params_from_iter(args.iter()), RawCustomer::from_row)?;
        let raws = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((raws, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawCustomer::into_customer)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page {
      items,
      page: page.page,
      size,
      total_elements: total,
      total_pages: total.div_ceil(size as u64),
    })
  }

  async fn list_all(&self, sort: Sort) -> Result<Vec<Customer>> {
    let order = order_clause(sort);

    let raws: Vec<RawCustomer> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers{order}"))?;
        let rows = stmt.query_map([], RawCustomer::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await?;

    raws.into_iter().map(RawCustomer::into_customer).collect()
  }

  async fn phone_exists(
    &self,
    phone: &str,
    exclude_id: Option<i64>,
  ) -> Result<bool> {
    let phone = phone.to_owned();

    let exists: bool = self
      .conn
      .call(move |conn| {
        let exists = match exclude_id {
          Some(id) => conn.query_row(
            "SELECT EXISTS(
               SELECT 1 FROM customers WHERE phone_number = ?1 AND id <> ?2
             )",
            rusqlite::params![phone, id],
            |row| row.get(0),
          )?,
          None => conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE phone_number = ?1)",
            rusqlite::params![phone],
            |row| row.get(0),
          )?,
        };
        Ok(exists)
      })
      .await?;

    Ok(exists)
  }

  async fn count(&self) -> Result<u64> {
    let total: u64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?)
      })
      .await?;
    Ok(total)
  }
}

// ─── AuditStore impl ─────────────────────────────────────────────────────────

impl AuditStore for SqliteStore {
  type Error = Error;

  async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry> {
    let recorded_at = Utc::now();
    let at_str = encode_dt(recorded_at);
    let action_str = encode_action(entry.action).to_owned();
    let row = entry.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO audit_log (entity_name, entity_id, action, changes, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            row.entity_name,
            row.entity_id,
            action_str,
            row.changes,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(AuditEntry {
      id,
      entity_name: entry.entity_name,
      entity_id: entry.entity_id,
      action: entry.action,
      changes: entry.changes,
      recorded_at,
    })
  }
}
