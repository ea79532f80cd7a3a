//! Product sale queries - Read-only operations over the sale records.
//!
//! Every function here is side-effect free and returns an empty `Vec` when nothing
//! matches. Keyword matching is done in Rust after loading the rows, so the
//! case-insensitive substring rule behaves the same on `SQLite` and `PostgreSQL`
//! (their `LIKE` operators disagree on case). Range filters are pushed down to SQL.

use crate::{
    entities::{ProductSale, product_sale},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, prelude::*};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Projection returned by the price-range filter.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ProductPrice {
    /// Product name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Product category
    pub category: String,
}

/// Overview metrics for the whole store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    /// Number of sale records
    pub total_orders: u64,
    /// Sum of `total_sales` across all records
    pub total_sales: i64,
    /// Mean unit price, `0.0` for an empty store
    pub average_price: f64,
    /// Number of distinct customer names
    pub unique_customers: u64,
}

/// Returns every sale record, ordered by `id`.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn list_all_products<C: ConnectionTrait>(db: &C) -> Result<Vec<product_sale::Model>> {
    let records = ProductSale::find()
        .order_by_asc(product_sale::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} sale records", records.len());
    Ok(records)
}

/// Case-insensitive substring test used by the keyword filters.
#[must_use]
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    haystack.to_lowercase().contains(&keyword.to_lowercase())
}

/// Returns the records whose `name` contains `keyword`, ignoring case.
///
/// The caller is expected to reject empty keywords; an empty keyword matches everything.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn search_products_by_name<C: ConnectionTrait>(
    db: &C,
    keyword: &str,
) -> Result<Vec<product_sale::Model>> {
    let mut records = list_all_products(db).await?;
    records.retain(|record| contains_keyword(&record.name, keyword));
    debug!("{} records matched name keyword", records.len());
    Ok(records)
}

/// Returns the records whose `category` contains `keyword`, ignoring case.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn filter_products_by_category<C: ConnectionTrait>(
    db: &C,
    keyword: &str,
) -> Result<Vec<product_sale::Model>> {
    let mut records = list_all_products(db).await?;
    records.retain(|record| contains_keyword(&record.category, keyword));
    debug!("{} records matched category keyword", records.len());
    Ok(records)
}

/// Returns the records dated between `from_date` and `to_date`, both inclusive.
///
/// Bounds given in the wrong order are swapped, so `(a, b)` and `(b, a)` select the
/// same rows.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn filter_products_by_date_range<C: ConnectionTrait>(
    db: &C,
    from_date: NaiveDate,
    to_date: NaiveDate,
) -> Result<Vec<product_sale::Model>> {
    let (from_date, to_date) = if from_date > to_date {
        (to_date, from_date)
    } else {
        (from_date, to_date)
    };

    ProductSale::find()
        .filter(product_sale::Column::Date.between(from_date, to_date))
        .order_by_asc(product_sale::Column::Date)
        .order_by_asc(product_sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns `(name, price, category)` for records priced within
/// `min_price..=max_price`, most expensive first (equal prices by `id`).
///
/// Unlike the date filter the bounds are NOT swapped: `min_price > max_price`
/// selects nothing.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn filter_products_by_price_range<C: ConnectionTrait>(
    db: &C,
    min_price: f64,
    max_price: f64,
) -> Result<Vec<ProductPrice>> {
    ProductSale::find()
        .select_only()
        .column(product_sale::Column::Name)
        .column(product_sale::Column::Price)
        .column(product_sale::Column::Category)
        .filter(product_sale::Column::Price.gte(min_price))
        .filter(product_sale::Column::Price.lte(max_price))
        .order_by_desc(product_sale::Column::Price)
        .order_by_asc(product_sale::Column::Id)
        .into_model::<ProductPrice>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the dashboard overview metrics over every record.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn sales_summary<C: ConnectionTrait>(db: &C) -> Result<SalesSummary> {
    let records = list_all_products(db).await?;
    Ok(summarize(&records))
}

fn summarize(records: &[product_sale::Model]) -> SalesSummary {
    let total_orders = records.len() as u64;
    let total_sales = records.iter().map(|r| r.total_sales).sum();
    let price_total: f64 = records.iter().map(|r| r.price).sum();
    #[allow(clippy::cast_precision_loss)]
    let average_price = if records.is_empty() {
        0.0
    } else {
        price_total / records.len() as f64
    };
    let unique_customers = records
        .iter()
        .map(|r| r.customer_name.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    SalesSummary {
        total_orders,
        total_sales,
        average_price,
        unique_customers,
    }
}
