//! CSV load endpoint.

use super::AppState;
use crate::{
    core::ingest::{self, IngestSummary},
    errors::Result,
};
use axum::{Json, Router, extract::State, routing::post};
use tracing::info;

/// Route for `POST /load-products`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/load-products", post(load_products))
}

/// Loads the configured CSV source into the store.
///
/// Rows are inserted sequentially, so the request takes time proportional to the
/// file size. On any failure nothing is committed.
#[tracing::instrument(name = "POST /load-products", skip(state))]
async fn load_products(State(state): State<AppState>) -> Result<Json<IngestSummary>> {
    info!("Loading products from {}", state.csv_path.display());
    let summary = ingest::ingest_csv_file(&state.database, &state.csv_path).await?;
    Ok(Json(summary))
}
