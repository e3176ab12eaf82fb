//! Core types, trait definitions, and the customer-record service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::CustomerStore`] and
//! [`store::AuditStore`]; everything else depends on those abstractions.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod audit;
pub mod customer;
pub mod diff;
pub mod error;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{Error, Result, ValidationErrors};
pub use service::CustomerService;
