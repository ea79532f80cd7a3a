//! Customer analytics endpoints.

use super::AppState;
use crate::{
    core::customer::{self, CustomerOrderCount, LocationCount},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::get};

/// Routes under `/customer`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customer/user", get(customers_by_location))
        .route("/customer/mostorder", get(top_customers_by_orders))
}

#[tracing::instrument(name = "GET /customer/user", skip(state))]
async fn customers_by_location(State(state): State<AppState>) -> Result<Json<Vec<LocationCount>>> {
    Ok(Json(customer::customers_by_location(&state.database).await?))
}

#[tracing::instrument(name = "GET /customer/mostorder", skip(state))]
async fn top_customers_by_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerOrderCount>>> {
    Ok(Json(customer::top_customers_by_orders(&state.database).await?))
}
