//! Customer analytics - Group-by aggregations over the sale records.
//!
//! Both reports are computed per request with a single `GROUP BY` query and are
//! sorted by their count, highest first. Equal counts are ordered by the group key
//! so the output is stable between calls.

use crate::{
    entities::{ProductSale, product_sale},
    errors::Result,
};
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, Order},
};
use serde::Serialize;
use tracing::instrument;

/// Number of customers attributed to one location.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct LocationCount {
    /// Location the customers were grouped by
    pub customer_location: String,
    /// Count of customer-name occurrences recorded at this location
    pub total_customers: i64,
}

/// Number of orders placed by one customer.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct CustomerOrderCount {
    /// Customer the orders were grouped by
    pub customer_name: String,
    /// Number of sale records for this customer
    pub no_of_orders: i64,
}

/// Counts customers per `customer_location`.
///
/// Every record contributes its customer name to its location, so the counts sum
/// to the number of records in the store.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn customers_by_location<C: ConnectionTrait>(db: &C) -> Result<Vec<LocationCount>> {
    ProductSale::find()
        .select_only()
        .column(product_sale::Column::CustomerLocation)
        .column_as(
            Expr::col(product_sale::Column::CustomerName).count(),
            "total_customers",
        )
        .group_by(product_sale::Column::CustomerLocation)
        .order_by(Expr::cust("total_customers"), Order::Desc)
        .order_by_asc(product_sale::Column::CustomerLocation)
        .into_model::<LocationCount>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts orders per `customer_name`, most active customers first.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn top_customers_by_orders<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<CustomerOrderCount>> {
    ProductSale::find()
        .select_only()
        .column(product_sale::Column::CustomerName)
        .column_as(Expr::col(product_sale::Column::Id).count(), "no_of_orders")
        .group_by(product_sale::Column::CustomerName)
        .order_by(Expr::cust("no_of_orders"), Order::Desc)
        .order_by_asc(product_sale::Column::CustomerName)
        .into_model::<CustomerOrderCount>()
        .all(db)
        .await
        .map_err(Into::into)
}
