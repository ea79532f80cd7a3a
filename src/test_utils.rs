//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and building sale records with sensible defaults.

use crate::{entities::product_sale, errors::Result};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with the sales table initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date in test data.
///
/// # Panics
/// Panics on an impossible date; test input only.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builds a sale record field by field, starting from defaults.
///
/// # Defaults
/// * `date`: 2025-03-14
/// * `name`: "Wireless Mouse", `category`: "Electronics"
/// * `price`: 25.0, `quantity`: 1, `total_sales`: 25
/// * customer "Test Customer" in "Test City", paid by "Credit Card", status "Completed"
pub struct SaleBuilder {
    record: product_sale::Model,
}

impl SaleBuilder {
    /// Starts a record with the given `id`.
    pub fn new(id: &str) -> Self {
        Self {
            record: product_sale::Model {
                id: id.to_string(),
                date: date(2025, 3, 14),
                name: "Wireless Mouse".to_string(),
                category: "Electronics".to_string(),
                price: 25.0,
                quantity: 1,
                total_sales: 25,
                customer_name: "Test Customer".to_string(),
                customer_location: "Test City".to_string(),
                payment_method: "Credit Card".to_string(),
                status: "Completed".to_string(),
            },
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.record.date = date;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_string();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.record.price = price;
        self
    }

    pub fn total_sales(mut self, total_sales: i64) -> Self {
        self.record.total_sales = total_sales;
        self
    }

    pub fn customer(mut self, name: &str, location: &str) -> Self {
        self.record.customer_name = name.to_string();
        self.record.customer_location = location.to_string();
        self
    }

    pub fn build(self) -> product_sale::Model {
        self.record
    }
}

/// A default sale record with the given `id`.
pub fn test_sale(id: &str) -> product_sale::Model {
    SaleBuilder::new(id).build()
}

/// Stores fixture records through the ingestion insert path, skipping CSV parsing.
pub async fn seed_sales(db: &DatabaseConnection, records: Vec<product_sale::Model>) -> Result<()> {
    crate::core::ingest::insert_sales(db, records).await?;
    Ok(())
}
