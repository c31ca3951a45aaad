//! HTTP API layer - axum router, shared handler state, and error mapping.
//!
//! Handlers stay thin: decode the request, call into [`crate::core`], and let
//! the error mapping below pick the status code. Validation failures surface
//! their full message (including remaining-capacity detail); store failures
//! surface a generic message and are logged instead.

/// Product composition endpoints
pub mod compositions;
/// Liveness endpoint
pub mod health;
/// Material catalog endpoints
pub mod materials;
/// Product catalog endpoints
pub mod products;

use crate::errors::Error;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
}

impl AppState {
    /// Creates new application state around a database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Builds the application router with all routes, permissive CORS for the
/// admin UI, and per-request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(products::routes())
        .merge(materials::routes())
        .merge(compositions::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Config errors reaching a handler come from input validation (empty
        // names and the like); file-level config errors only occur at startup.
        let status = match &self {
            Error::ProductNotFound { .. }
            | Error::MaterialNotFound { .. }
            | Error::CompositionNotFound { .. } => StatusCode::NOT_FOUND,
            Error::DuplicateComposition { .. }
            | Error::DuplicateSku { .. }
            | Error::DuplicateCode { .. } => StatusCode::CONFLICT,
            Error::Config { .. }
            | Error::InvalidWeight { .. }
            | Error::InvalidPercentage { .. }
            | Error::WeightExceedsProduct { .. }
            | Error::WeightCapacityExceeded { .. }
            | Error::PercentageCapacityExceeded { .. }
            | Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {self}");
            (status, Json(json!({ "error": "Internal server error" }))).into_response()
        } else {
            (status, Json(json!({ "error": self.to_string() }))).into_response()
        }
    }
}
