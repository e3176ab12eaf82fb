//! Handlers for `/customers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/customers` | Paginated; `?page&size&name&phone&countryCode&sortBy&sortDir` |
//! | `POST`   | `/customers` | Body: [`CustomerInput`]; 201 + created record |
//! | `GET`    | `/customers/{id}` | 404 if not found |
//! | `PUT`    | `/customers/{id}` | Full field set; 404/409/400 on failure |
//! | `DELETE` | `/customers/{id}` | 204 on success |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use patron_core::{
  CustomerService,
  customer::{Customer, CustomerInput},
  store::{
    AuditStore, CustomerStore, Page, PageRequest, Sort, SortDirection,
    SortField,
  },
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

fn default_size() -> usize {
  10
}

fn default_sort_dir() -> String {
  "desc".to_owned()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  #[serde(default)]
  pub page:         usize,
  #[serde(default = "default_size")]
  pub size:         usize,
  pub name:         Option<String>,
  pub phone:        Option<String>,
  pub country_code: Option<String>,
  #[serde(default)]
  pub sort_by:      SortField,
  #[serde(default = "default_sort_dir")]
  pub sort_dir:     String,
}

/// Spring-style page envelope: the row slice plus nested page metadata.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
  pub content: Vec<T>,
  pub page:    PageMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
  pub size:           usize,
  pub number:         usize,
  pub total_elements: u64,
  pub total_pages:    u64,
}

impl<T> From<Page<T>> for PageResponse<T> {
  fn from(page: Page<T>) -> Self {
    Self {
      content: page.items,
      page:    PageMeta {
        size:           page.size,
        number:         page.page,
        total_elements: page.total_elements,
        total_pages:    page.total_pages,
      },
    }
  }
}

/// `GET /customers?page&size[&name|&phone|&countryCode][&sortBy][&sortDir]`
pub async fn list<C, A>(
  State(service): State<Arc<CustomerService<C, A>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<PageResponse<Customer>>, ApiError>
where
  C: CustomerStore,
  A: AuditStore,
{
  let sort = Sort::new(
    params.sort_by,
    SortDirection::from_param(&params.sort_dir),
  );
  let page = service
    .list(
      PageRequest::new(params.page, params.size),
      params.name.as_deref(),
      params.phone.as_deref(),
      params.country_code.as_deref(),
      sort,
    )
    .await?;
  Ok(Json(page.into()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /customers` — 201 + the created record.
pub async fn create<C, A>(
  State(service): State<Arc<CustomerService<C, A>>>,
  Json(body): Json<CustomerInput>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CustomerStore,
  A: AuditStore,
{
  let customer = service.create(&body).await?;
  Ok((StatusCode::CREATED, Json(customer)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/{id}`
pub async fn get_one<C, A>(
  State(service): State<Arc<CustomerService<C, A>>>,
  Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError>
where
  C: CustomerStore,
  A: AuditStore,
{
  Ok(Json(service.get_by_id(id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /customers/{id}`
pub async fn update_one<C, A>(
  State(service): State<Arc<CustomerService<C, A>>>,
  Path(id): Path<i64>,
  Json(body): Json<CustomerInput>,
) -> Result<Json<Customer>, ApiError>
where
  C: CustomerStore,
  A: AuditStore,
{
  Ok(Json(service.update(id, &body).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /customers/{id}` — 204 on success.
pub async fn delete_one<C, A>(
  State(service): State<Arc<CustomerService<C, A>>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  C: CustomerStore,
  A: AuditStore,
{
  service.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
