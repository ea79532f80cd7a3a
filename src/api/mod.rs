//! HTTP layer - axum routes over the core services.
//!
//! Handlers validate path parameters, call into [`crate::core`] and serialize the
//! result as JSON. Errors become JSON error bodies through
//! [`crate::errors::Error`]'s `IntoResponse` impl.

/// Customer analytics endpoints
pub mod customers;
/// CSV load endpoint
pub mod ingest;
/// Product listing and filter endpoints
pub mod products;

use crate::errors::{Error, Result};
use axum::{Json, Router, routing::get};
use sea_orm::DatabaseConnection;
use std::{path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared data available to every handler.
///
/// Holds the pooled store connection built once at startup and the ingestion
/// source path; there is no other in-process state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for all store operations
    pub database: DatabaseConnection,
    /// CSV file loaded by `POST /load-products`
    pub csv_path: Arc<PathBuf>,
}

impl AppState {
    /// Creates a new `AppState` from a connection and the configured CSV path.
    #[must_use]
    pub fn new(database: DatabaseConnection, csv_path: PathBuf) -> Self {
        Self {
            database,
            csv_path: Arc::new(csv_path),
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(products::routes())
        .merge(customers::routes())
        .merge(ingest::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tracing::instrument(name = "GET /")]
async fn welcome() -> Json<&'static str> {
    Json("Welcome to the home page")
}

/// Trims a keyword path segment, rejecting blank input.
pub(crate) fn require_keyword(raw: &str) -> Result<&str> {
    let keyword = raw.trim();
    if keyword.is_empty() {
        return Err(Error::validation("keyword must not be empty"));
    }
    Ok(keyword)
}
