//! [`CustomerService`] — validation, uniqueness enforcement, audit writes,
//! and query orchestration over the two storage collaborators.

use crate::{
  audit::NewAuditEntry,
  customer::{Customer, CustomerInput},
  diff,
  error::{Error, Result},
  store::{AuditStore, CustomerFilter, CustomerStore, Page, PageRequest, Sort},
  validate,
};

/// The customer-record service.
///
/// Holds no mutable state of its own; all consistency is delegated to the
/// backing stores. One audit entry is written per successful mutation —
/// exactly one, even when an update changes nothing.
#[derive(Debug, Clone)]
pub struct CustomerService<C, A> {
  customers: C,
  audits:    A,
}

impl<C, A> CustomerService<C, A>
where
  C: CustomerStore,
  A: AuditStore,
{
  pub fn new(customers: C, audits: A) -> Self {
    Self { customers, audits }
  }

  /// Create a customer from trimmed, validated input.
  ///
  /// Fails with [`Error::DuplicatePhone`] when any record already holds the
  /// phone number.
  pub async fn create(&self, input: &CustomerInput) -> Result<Customer> {
    let input = input.trimmed();
    validate::validate(&input).map_err(Error::Validation)?;

    if self
      .customers
      .phone_exists(&input.phone_number, None)
      .await
      .map_err(Into::into)?
    {
      return Err(Error::DuplicatePhone(input.phone_number));
    }

    let customer = self.customers.insert(&input).await.map_err(Into::into)?;
    tracing::info!(id = customer.id, "created customer");

    self.record_audit(NewAuditEntry::created(&customer)).await;
    Ok(customer)
  }

  /// Update every mutable field (and the phone number) of an existing
  /// customer.
  ///
  /// Precondition order: [`Error::NotFound`] when `id` is absent, then
  /// [`Error::DuplicatePhone`] when a *different* record holds the phone
  /// number. The audit summary is the ordered field diff from [`diff`].
  pub async fn update(&self, id: i64, input: &CustomerInput) -> Result<Customer> {
    let input = input.trimmed();
    validate::validate(&input).map_err(Error::Validation)?;

    let existing = self
      .customers
      .get(id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound(id))?;

    if self
      .customers
      .phone_exists(&input.phone_number, Some(id))
      .await
      .map_err(Into::into)?
    {
      return Err(Error::DuplicatePhone(input.phone_number));
    }

    let summary = diff::change_summary(&existing, &input);
    let updated = self.customers.update(id, &input).await.map_err(Into::into)?;
    tracing::info!(id, "updated customer");

    self.record_audit(NewAuditEntry::updated(id, summary)).await;
    Ok(updated)
  }

  /// Permanently remove a customer. The audit summary names the record as it
  /// was before removal.
  pub async fn delete(&self, id: i64) -> Result<()> {
    let existing = self
      .customers
      .get(id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound(id))?;

    self.customers.delete(id).await.map_err(Into::into)?;
    tracing::info!(id, "deleted customer");

    self.record_audit(NewAuditEntry::deleted(&existing)).await;
    Ok(())
  }

  /// Pure read; no audit entry.
  pub async fn get_by_id(&self, id: i64) -> Result<Customer> {
    self
      .customers
      .get(id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound(id))
  }

  /// Paginated, sorted scan with single-filter selection: name beats phone
  /// beats country code; blank parameters are ignored.
  pub async fn list(
    &self,
    page: PageRequest,
    name: Option<&str>,
    phone: Option<&str>,
    country_code: Option<&str>,
    sort: Sort,
  ) -> Result<Page<Customer>> {
    let filter = CustomerFilter::select(name, phone, country_code);
    self
      .customers
      .list(filter.as_ref(), sort, page)
      .await
      .map_err(Into::into)
  }

  /// Every record, identifier descending, for the export collaborator.
  pub async fn export_all(&self) -> Result<Vec<Customer>> {
    self
      .customers
      .list_all(Sort::id_desc())
      .await
      .map_err(Into::into)
  }

  /// Audit-write failure after a successful record write is logged and
  /// swallowed; the mutation itself already happened.
  async fn record_audit(&self, entry: NewAuditEntry) {
    if let Err(e) = self.audits.append(entry).await {
      tracing::warn!(error = %e, "audit write failed");
    }
  }
}
