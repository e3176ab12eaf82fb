//! Integration tests for `SqliteStore` and the service flows on top of it,
//! against an in-memory database.

use chrono::NaiveDate;
use patron_core::{
  audit::{AuditAction, AuditEntry, NewAuditEntry},
  customer::CustomerInput,
  store::{AuditStore, CustomerStore, PageRequest, Sort, SortDirection, SortField},
  CustomerService, Error,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn service() -> (CustomerService<SqliteStore, SqliteStore>, SqliteStore) {
  let s = store().await;
  (CustomerService::new(s.clone(), s.clone()), s)
}

fn input(first: &str, last: &str, phone: &str) -> CustomerInput {
  CustomerInput {
    first_name:    first.into(),
    last_name:     last.into(),
    date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
    country_code:  "+91".into(),
    country_name:  "India".into(),
    phone_number:  phone.into(),
  }
}

fn page(page: usize, size: usize) -> PageRequest {
  PageRequest::new(page, size)
}

fn by(field: SortField, direction: SortDirection) -> Sort {
  Sort::new(field, direction)
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips() {
  let (svc, _) = service().await;

  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(created.created_at, created.updated_at);

  let fetched = svc.get_by_id(created.id).await.unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_trims_string_fields() {
  let (svc, _) = service().await;

  let created = svc
    .create(&input("  Anna ", " Lee  ", " 9876543210 "))
    .await
    .unwrap();

  assert_eq!(created.first_name, "Anna");
  assert_eq!(created.last_name, "Lee");
  assert_eq!(created.phone_number, "9876543210");
}

#[tokio::test]
async fn create_rejects_duplicate_phone() {
  let (svc, _) = service().await;
  svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  // Same phone after trimming, everything else different.
  let err = svc
    .create(&input("Bob", "Smith", " 9876543210"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicatePhone(p) if p == "9876543210"));
}

#[tokio::test]
async fn create_collects_all_validation_errors() {
  let (svc, store) = service().await;

  let bad = CustomerInput {
    first_name:    "   ".into(),
    last_name:     String::new(),
    date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
    country_code:  "91".into(),
    country_name:  " ".into(),
    phone_number:  "12x".into(),
  };
  let err = svc.create(&bad).await.unwrap_err();

  let Error::Validation(errors) = err else {
    panic!("expected validation failure");
  };
  assert_eq!(errors.0.len(), 5);

  // Rejected input writes nothing.
  assert_eq!(store.count().await.unwrap(), 0);
  assert!(store.audit_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn unique_constraint_backstops_the_precheck() {
  let (svc, store) = service().await;
  svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  // Write through the store directly, as a racing request that passed the
  // service pre-check would.
  let err = store
    .insert(&input("Bob", "Smith", "9876543210"))
    .await
    .unwrap_err();
  assert!(matches!(
    patron_core::Error::from(err),
    Error::DuplicatePhone(_)
  ));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_missing_id_is_not_found_and_writes_no_audit() {
  let (svc, store) = service().await;

  let err = svc.update(42, &input("Anna", "Lee", "9876543210")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(42)));
  assert!(store.audit_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_overwrites_fields_and_refreshes_updated_at() {
  let (svc, _) = service().await;
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  let mut changed = input("Annabel", "Lee", "9876543211");
  changed.country_code = "+44".into();
  changed.country_name = "United Kingdom".into();
  let updated = svc.update(created.id, &changed).await.unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.first_name, "Annabel");
  assert_eq!(updated.phone_number, "9876543211");
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn update_writes_field_diff_summary() {
  let (svc, store) = service().await;
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  let mut changed = input("Annabel", "Lee", "9876543210");
  changed.country_name = "Bharat".into();
  svc.update(created.id, &changed).await.unwrap();

  let entries = store.audit_entries().await.unwrap();
  assert_eq!(entries.len(), 2);
  let entry = &entries[1];
  assert_eq!(entry.action, AuditAction::Update);
  assert_eq!(entry.entity_id, created.id);
  assert_eq!(
    entry.changes,
    "firstName: 'Anna' -> 'Annabel'; countryName: 'India' -> 'Bharat'"
  );
}

#[tokio::test]
async fn noop_update_records_no_changes() {
  let (svc, store) = service().await;
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  svc
    .update(created.id, &input("Anna", "Lee", "9876543210"))
    .await
    .unwrap();

  let entries = store.audit_entries().await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[1].changes, "No changes");
}

#[tokio::test]
async fn update_with_own_phone_is_not_a_duplicate() {
  let (svc, _) = service().await;
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  let updated = svc
    .update(created.id, &input("Annabel", "Lee", "9876543210"))
    .await
    .unwrap();
  assert_eq!(updated.phone_number, "9876543210");
}

#[tokio::test]
async fn update_rejects_phone_held_by_another_record() {
  let (svc, _) = service().await;
  svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();
  let other = svc.create(&input("Bob", "Smith", "1112223334")).await.unwrap();

  let err = svc
    .update(other.id, &input("Bob", "Smith", "9876543210"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicatePhone(_)));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_get_is_not_found() {
  let (svc, _) = service().await;
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();

  svc.delete(created.id).await.unwrap();

  let err = svc.get_by_id(created.id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(id) if id == created.id));
}

#[tokio::test]
async fn delete_missing_id_is_not_found() {
  let (svc, _) = service().await;
  let err = svc.delete(42).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(42)));
}

#[tokio::test]
async fn delete_summary_names_the_removed_customer() {
  let (svc, store) = service().await;
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();
  svc.delete(created.id).await.unwrap();

  let entries = store.audit_entries().await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[1].action, AuditAction::Delete);
  assert_eq!(
    entries[1].changes,
    "Deleted customer: Anna Lee, phone: 9876543210"
  );
}

// ─── Audit trail ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_mutation_appends_exactly_one_entry() {
  let (svc, store) = service().await;

  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();
  svc
    .update(created.id, &input("Annabel", "Lee", "9876543210"))
    .await
    .unwrap();
  svc.delete(created.id).await.unwrap();

  // A read in between adds nothing.
  let err = svc.get_by_id(created.id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));

  let entries = store.audit_entries().await.unwrap();
  assert_eq!(entries.len(), 3);
  assert_eq!(entries[0].action, AuditAction::Create);
  assert_eq!(
    entries[0].changes,
    "Created customer: Anna Lee, phone: 9876543210"
  );
  assert_eq!(entries[1].action, AuditAction::Update);
  assert_eq!(entries[2].action, AuditAction::Delete);
  assert!(entries.iter().all(|e| e.entity_name == "Customer"));
  assert!(entries.iter().all(|e| e.entity_id == created.id));
}

/// Audit store whose `append` always fails, standing in for a broken trail.
#[derive(Clone)]
struct BrokenAuditStore;

impl AuditStore for BrokenAuditStore {
  type Error = crate::Error;

  async fn append(&self, _entry: NewAuditEntry) -> crate::Result<AuditEntry> {
    Err(crate::Error::Database(tokio_rusqlite::Error::ConnectionClosed))
  }
}

#[tokio::test]
async fn mutations_succeed_when_the_audit_write_fails() {
  let store = store().await;
  let svc = CustomerService::new(store.clone(), BrokenAuditStore);

  // Create still returns the record, and the record write persisted.
  let created = svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();
  assert_eq!(svc.get_by_id(created.id).await.unwrap(), created);

  // Same for update and delete.
  let updated = svc
    .update(created.id, &input("Annabel", "Lee", "9876543210"))
    .await
    .unwrap();
  assert_eq!(updated.first_name, "Annabel");

  svc.delete(created.id).await.unwrap();
  let err = svc.get_by_id(created.id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));

  // Nothing ever reached the real trail.
  assert!(store.audit_entries().await.unwrap().is_empty());
}

// ─── List: filters ───────────────────────────────────────────────────────────

async fn seed_three(svc: &CustomerService<SqliteStore, SqliteStore>) {
  svc.create(&input("Anna", "Lee", "9876543210")).await.unwrap();
  svc.create(&input("Susanna", "Roy", "9876543211")).await.unwrap();
  let mut bob = input("Bob", "Smith", "1112223334");
  bob.country_code = "+1".into();
  bob.country_name = "United States".into();
  svc.create(&bob).await.unwrap();
}

#[tokio::test]
async fn name_filter_matches_either_name_case_insensitively() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  let result = svc
    .list(page(0, 10), Some("ann"), None, None, Sort::default())
    .await
    .unwrap();

  let names: Vec<&str> =
    result.items.iter().map(|c| c.first_name.as_str()).collect();
  assert_eq!(result.total_elements, 2);
  assert!(names.contains(&"Anna"));
  assert!(names.contains(&"Susanna"));
  assert!(!names.contains(&"Bob"));
}

#[tokio::test]
async fn phone_filter_matches_prefix_only() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  let result = svc
    .list(page(0, 10), None, Some("98765"), None, Sort::default())
    .await
    .unwrap();
  assert_eq!(result.total_elements, 2);

  // "1112" is a prefix of Bob's number; "2223" is interior and matches nothing.
  let result = svc
    .list(page(0, 10), None, Some("2223"), None, Sort::default())
    .await
    .unwrap();
  assert_eq!(result.total_elements, 0);
}

#[tokio::test]
async fn country_code_filter_is_exact() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  let result = svc
    .list(page(0, 10), None, None, Some("+1"), Sort::default())
    .await
    .unwrap();
  assert_eq!(result.total_elements, 1);
  assert_eq!(result.items[0].first_name, "Bob");
}

#[tokio::test]
async fn name_filter_wins_when_several_are_given() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  // Phone and country code would match Bob; the name filter shadows both.
  let result = svc
    .list(page(0, 10), Some("ann"), Some("111"), Some("+1"), Sort::default())
    .await
    .unwrap();
  assert_eq!(result.total_elements, 2);
  assert!(result.items.iter().all(|c| c.first_name != "Bob"));
}

#[tokio::test]
async fn blank_filters_return_everything() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  let result = svc
    .list(page(0, 10), Some("  "), Some(""), None, Sort::default())
    .await
    .unwrap();
  assert_eq!(result.total_elements, 3);
}

// ─── List: sorting and pagination ────────────────────────────────────────────

#[tokio::test]
async fn pages_fifteen_records_by_id_descending() {
  let (svc, _) = service().await;
  for i in 0..15 {
    svc
      .create(&input("Anna", "Lee", &format!("98765432{i:02}")))
      .await
      .unwrap();
  }

  let first = svc
    .list(
      page(0, 10),
      None,
      None,
      None,
      by(SortField::Id, SortDirection::Desc),
    )
    .await
    .unwrap();

  assert_eq!(first.items.len(), 10);
  assert_eq!(first.total_elements, 15);
  assert_eq!(first.total_pages, 2);
  assert!(first.items.windows(2).all(|w| w[0].id > w[1].id));

  let second = svc
    .list(
      page(1, 10),
      None,
      None,
      None,
      by(SortField::Id, SortDirection::Desc),
    )
    .await
    .unwrap();
  assert_eq!(second.items.len(), 5);

  // The two pages partition the id space.
  let min_first = first.items.last().unwrap().id;
  assert!(second.items.iter().all(|c| c.id < min_first));
}

#[tokio::test]
async fn sorts_by_first_name_ascending() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  let result = svc
    .list(
      page(0, 10),
      None,
      None,
      None,
      by(SortField::FirstName, SortDirection::Asc),
    )
    .await
    .unwrap();

  let names: Vec<&str> =
    result.items.iter().map(|c| c.first_name.as_str()).collect();
  assert_eq!(names, ["Anna", "Bob", "Susanna"]);
}

#[tokio::test]
async fn huge_page_index_yields_an_empty_page() {
  let (svc, _) = service().await;
  seed_three(&svc).await;

  let result = svc
    .list(page(usize::MAX, 10), None, None, None, Sort::default())
    .await
    .unwrap();

  assert!(result.items.is_empty());
  assert_eq!(result.total_elements, 3);
  assert_eq!(result.total_pages, 1);
}

#[tokio::test]
async fn empty_store_lists_an_empty_page() {
  let (svc, _) = service().await;

  let result = svc
    .list(page(0, 10), None, None, None, Sort::default())
    .await
    .unwrap();
  assert!(result.items.is_empty());
  assert_eq!(result.total_elements, 0);
  assert_eq!(result.total_pages, 0);
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn export_returns_everything_by_id_descending() {
  let (svc, _) = service().await;
  for i in 0..12 {
    svc
      .create(&input("Anna", "Lee", &format!("98765432{i:02}")))
      .await
      .unwrap();
  }

  let all = svc.export_all().await.unwrap();
  assert_eq!(all.len(), 12);
  assert!(all.windows(2).all(|w| w[0].id > w[1].id));
}
