//! Unified error types for the sales analytics service.
//!
//! Every layer returns [`Result`]; the HTTP layer converts an [`Error`] into a
//! JSON response with a matching status code. An empty query result is never an
//! error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable application configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Any failure reported by the record store, including an unreachable store.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Malformed input supplied by a client.
    #[error("Invalid input: {message}")]
    Validation {
        /// Human readable description of the rejected input
        message: String,
    },

    /// A CSV row could not be converted into a sale record.
    #[error("Malformed row at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source file (header is line 1)
        line: u64,
        /// Description of the conversion failure
        message: String,
    },

    /// An ingested record collides with an `id` that already exists.
    #[error("Duplicate record id '{id}'")]
    DuplicateKey {
        /// The colliding identifier
        id: String,
    },

    /// Reading the ingestion source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing or not unicode.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status and public error code for this error.
    #[must_use]
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::DuplicateKey { .. } => (StatusCode::CONFLICT, "DUPLICATE_KEY"),
            Self::Parse { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_ERROR"),
            Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::Config { .. } | Self::Io(_) | Self::EnvVar(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            message: String,
        }

        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (
            status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code,
                    message: self.to_string(),
                },
            }),
        )
            .into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
