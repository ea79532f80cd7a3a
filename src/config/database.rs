//! Database configuration module.
//!
//! This module handles the record store connection and table creation using `SeaORM`.
//! The table is generated from the entity definition with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust struct without hand-written SQL. Creation is
//! `IF NOT EXISTS`, which makes it safe to run on every startup.

use crate::entities::ProductSale;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Connection target used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/sales.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection pool to the store named by `database_url`.
///
/// Both `sqlite://` and `postgres://` URLs are accepted. The returned handle is
/// cheap to clone and is passed down to every request; each query checks a
/// connection out of the pool and returns it when done.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to record store");
    let db = Database::connect(database_url).await?;
    info!("Connected to {:?} record store", db.get_database_backend());
    Ok(db)
}

/// Creates the `product_sales` table if it does not exist yet.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut sales_table = schema.create_table_from_entity(ProductSale);
    sales_table.if_not_exists();

    db.execute(builder.build(&sales_table)).await?;
    debug!("Ensured product_sales table exists");

    Ok(())
}
