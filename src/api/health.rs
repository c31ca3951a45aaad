//! Health check endpoint

use axum::Json;
use serde_json::{Value, json};

/// GET /health
///
/// Liveness probe for deployment tooling; does not touch the database.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "module": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
