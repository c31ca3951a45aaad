//! Product composition endpoints.
//!
//! The write endpoints return the full validation detail (remaining weight or
//! percentage capacity) in the error body so the admin UI can tell users how
//! much would still fit.

use crate::{
    api::AppState,
    core::composition,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

/// Request body for creating or updating a composition.
///
/// On update the product and material references are fixed; only weight,
/// percentage, and notes are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRequest {
    pub product_id: i32,
    pub material_id: i32,
    pub weight: Decimal,
    pub composition_percentage: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Routes under /api/product-compositions
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/product-compositions",
            get(list_compositions).post(create_composition),
        )
        .route(
            "/api/product-compositions/:id",
            get(get_composition)
                .put(update_composition)
                .delete(delete_composition),
        )
        .route(
            "/api/product-compositions/product/:product_id",
            get(list_for_product),
        )
        .route(
            "/api/product-compositions/material/:material_id",
            get(list_for_material),
        )
        .route(
            "/api/product-compositions/product/:product_id/total-weight",
            get(total_weight),
        )
        .route(
            "/api/product-compositions/product/:product_id/remaining-weight",
            get(remaining_weight),
        )
        .route(
            "/api/product-compositions/product/:product_id/total-percentage",
            get(total_percentage),
        )
        .route(
            "/api/product-compositions/product/:product_id/remaining-percentage",
            get(remaining_percentage),
        )
        .route(
            "/api/product-compositions/product/:product_id/validate",
            get(validate_percentages),
        )
        .route(
            "/api/product-compositions/product/:product_id/weight-valid",
            get(weight_valid),
        )
        .route(
            "/api/product-compositions/product/:product_id/weight-validation",
            get(weight_validation),
        )
        .route(
            "/api/product-compositions/product/:product_id/validate-all",
            post(validate_all),
        )
}

/// GET /api/product-compositions
async fn list_compositions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let compositions = composition::get_all_active_compositions(&state.db).await?;
    Ok(Json(compositions))
}

/// GET /api/product-compositions/{id}
async fn get_composition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let found = composition::get_composition_by_id(&state.db, id)
        .await?
        .ok_or(Error::CompositionNotFound { id })?;
    Ok(Json(found))
}

/// GET /api/product-compositions/product/{product_id}
async fn list_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let compositions = composition::get_compositions_for_product(&state.db, product_id).await?;
    Ok(Json(compositions))
}

/// GET /api/product-compositions/material/{material_id}
async fn list_for_material(
    State(state): State<AppState>,
    Path(material_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let compositions = composition::get_compositions_for_material(&state.db, material_id).await?;
    Ok(Json(compositions))
}

/// POST /api/product-compositions
async fn create_composition(
    State(state): State<AppState>,
    Json(body): Json<CompositionRequest>,
) -> Result<impl IntoResponse> {
    let created = composition::create_composition(
        &state.db,
        body.product_id,
        body.material_id,
        body.weight,
        body.composition_percentage,
        body.notes,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/product-compositions/{id}
async fn update_composition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CompositionRequest>,
) -> Result<impl IntoResponse> {
    let updated = composition::update_composition(
        &state.db,
        id,
        body.weight,
        body.composition_percentage,
        body.notes,
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /api/product-compositions/{id}
async fn delete_composition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    composition::delete_composition(&state.db, id).await?;
    Ok(Json(
        json!({ "message": "Product composition deleted successfully" }),
    ))
}

/// GET /api/product-compositions/product/{product_id}/total-weight
async fn total_weight(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let total = composition::total_material_weight(&state.db, product_id).await?;
    Ok(Json(total))
}

/// GET /api/product-compositions/product/{product_id}/remaining-weight
async fn remaining_weight(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let remaining = composition::remaining_weight(&state.db, product_id).await?;
    Ok(Json(remaining))
}

/// GET /api/product-compositions/product/{product_id}/total-percentage
async fn total_percentage(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let total = composition::total_percentage(&state.db, product_id).await?;
    Ok(Json(total))
}

/// GET /api/product-compositions/product/{product_id}/remaining-percentage
async fn remaining_percentage(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let remaining = composition::remaining_percentage(&state.db, product_id).await?;
    Ok(Json(remaining))
}

/// GET /api/product-compositions/product/{product_id}/validate
async fn validate_percentages(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let valid = composition::is_percentage_valid(&state.db, product_id).await?;
    Ok(Json(valid))
}

/// GET /api/product-compositions/product/{product_id}/weight-valid
async fn weight_valid(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let valid = composition::is_weight_valid(&state.db, product_id).await?;
    Ok(Json(valid))
}

/// GET /api/product-compositions/product/{product_id}/weight-validation
async fn weight_validation(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let report = composition::weight_report(&state.db, product_id).await?;
    Ok(Json(report))
}

/// POST /api/product-compositions/product/{product_id}/validate-all
async fn validate_all(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse> {
    composition::audit_compositions(&state.db, product_id).await?;
    Ok(Json(json!({ "message": "All compositions are valid" })))
}
