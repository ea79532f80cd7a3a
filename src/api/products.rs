//! Product endpoints: listing, keyword search and range filters.

use super::{AppState, require_keyword};
use crate::{
    core::product::{self, ProductPrice, SalesSummary},
    entities::ProductSaleModel,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::NaiveDate;

/// Date format accepted in `/products/filter/{from_date}/{to_date}`.
pub const PATH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Routes under `/products`.
pub fn routes() -> Router<AppState> {
    // The router needs one parameter name per shared segment position, so `{term}` is
    // the category keyword in the one-segment route and the start date in the other.
    Router::new()
        .route("/products", get(list_products))
        .route("/products/", get(list_products))
        .route("/products/summary", get(summary))
        .route("/products/search/{keyword}", get(search_by_name))
        .route("/products/filter/{term}", get(filter_by_category))
        .route("/products/filter/{term}/{to_date}", get(filter_by_date_range))
        .route(
            "/products/filter/price/{max_price}/{min_price}",
            get(filter_by_price_range),
        )
}

fn parse_path_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), PATH_DATE_FORMAT)
        .map_err(|_| Error::validation(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

fn parse_price(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(Error::validation(format!(
            "invalid price '{raw}', expected a non-negative number"
        ))),
    }
}

#[tracing::instrument(name = "GET /products/", skip(state))]
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductSaleModel>>> {
    Ok(Json(product::list_all_products(&state.database).await?))
}

#[tracing::instrument(name = "GET /products/summary", skip(state))]
async fn summary(State(state): State<AppState>) -> Result<Json<SalesSummary>> {
    Ok(Json(product::sales_summary(&state.database).await?))
}

#[tracing::instrument(name = "GET /products/search", skip(state))]
async fn search_by_name(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<ProductSaleModel>>> {
    let keyword = require_keyword(&keyword)?;
    Ok(Json(
        product::search_products_by_name(&state.database, keyword).await?,
    ))
}

#[tracing::instrument(name = "GET /products/filter", skip(state))]
async fn filter_by_category(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<ProductSaleModel>>> {
    let keyword = require_keyword(&keyword)?;
    Ok(Json(
        product::filter_products_by_category(&state.database, keyword).await?,
    ))
}

#[tracing::instrument(name = "GET /products/filter/dates", skip(state))]
async fn filter_by_date_range(
    State(state): State<AppState>,
    Path((from_date, to_date)): Path<(String, String)>,
) -> Result<Json<Vec<ProductSaleModel>>> {
    let from_date = parse_path_date(&from_date)?;
    let to_date = parse_path_date(&to_date)?;
    Ok(Json(
        product::filter_products_by_date_range(&state.database, from_date, to_date).await?,
    ))
}

#[tracing::instrument(name = "GET /products/filter/price", skip(state))]
async fn filter_by_price_range(
    State(state): State<AppState>,
    Path((max_price, min_price)): Path<(String, String)>,
) -> Result<Json<Vec<ProductPrice>>> {
    let max_price = parse_price(&max_price)?;
    let min_price = parse_price(&min_price)?;
    Ok(Json(
        product::filter_products_by_price_range(&state.database, min_price, max_price).await?,
    ))
}
