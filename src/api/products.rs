//! Product catalog endpoints.

use crate::{
    api::AppState,
    core::product,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

/// Request body for creating or updating a product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub weight: Decimal,
}

/// Query parameters for product search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match against names
    #[serde(default)]
    pub q: String,
}

/// Routes under /api/products
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/search", get(search_products))
        .route("/api/products/sku/:sku", get(get_product_by_sku))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// GET /api/products
async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = product::get_all_active_products(&state.db).await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let found = product::get_product_by_id(&state.db, id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;
    Ok(Json(found))
}

/// GET /api/products/sku/{sku}
async fn get_product_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<axum::response::Response> {
    match product::get_product_by_sku(&state.db, &sku).await? {
        Some(found) => Ok(Json(found).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Product with SKU '{sku}' not found") })),
        )
            .into_response()),
    }
}

/// GET /api/products/search?q=term
async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let products = product::search_products(&state.db, &query.q).await?;
    Ok(Json(products))
}

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    let created =
        product::create_product(&state.db, body.name, body.sku, body.description, body.weight)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    let updated = product::update_product(
        &state.db,
        id,
        body.name,
        body.sku,
        body.description,
        body.weight,
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /api/products/{id}
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    product::delete_product(&state.db, id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
