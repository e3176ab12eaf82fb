//! JSON REST API for the customer-record service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`patron_core::store::CustomerStore`] / [`patron_core::store::AuditStore`]
//! pair. CORS, tracing layers, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", patron_api::api_router(service))
//! ```

pub mod customers;
pub mod error;
pub mod export;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use patron_core::{
  CustomerService,
  store::{AuditStore, CustomerStore},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<C, A>(service: Arc<CustomerService<C, A>>) -> Router<()>
where
  C: CustomerStore + 'static,
  A: AuditStore + 'static,
{
  Router::new()
    .route(
      "/customers",
      get(customers::list::<C, A>).post(customers::create::<C, A>),
    )
    .route("/customers/export", get(export::csv::<C, A>))
    .route(
      "/customers/{id}",
      get(customers::get_one::<C, A>)
        .put(customers::update_one::<C, A>)
        .delete(customers::delete_one::<C, A>),
    )
    .with_state(service)
}
