//! Core business logic - framework-agnostic queries, aggregations and ingestion.
//!
//! Functions in here take any `sea_orm` connection and know nothing about HTTP.

/// Customer aggregations (per location, per customer)
pub mod customer;
/// Bulk CSV ingestion
pub mod ingest;
/// Record listing, keyword and range filters
pub mod product;
