//! Product sale entity - One row per sale event.
//!
//! Rows are written once by the CSV ingestion path and never updated afterwards.
//! The `id` comes from the external source, so it is a string key rather than an
//! auto-incremented integer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_sales")]
pub struct Model {
    /// Identifier supplied by the source feed
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Calendar date of the sale, serialized as `YYYY-MM-DD`
    pub date: Date,
    /// Product name
    pub name: String,
    /// Product category (e.g. "Electronics", "Clothing")
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Units sold
    pub quantity: i32,
    /// Revenue for the line as reported by the source, not derived from price * quantity
    pub total_sales: i64,
    /// Buyer name
    pub customer_name: String,
    /// Buyer location (city or country)
    pub customer_location: String,
    pub payment_method: String,
    /// Order status (e.g. "Completed", "Cancelled")
    pub status: String,
}

/// Sale records stand alone; there are no related tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
