//! Material catalog endpoints.

use crate::{
    api::AppState,
    core::material,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

/// Request body for creating or updating a material
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for material search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match against names
    #[serde(default)]
    pub q: String,
}

/// Routes under /api/materials
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/materials", get(list_materials).post(create_material))
        .route("/api/materials/search", get(search_materials))
        .route("/api/materials/code/:code", get(get_material_by_code))
        .route(
            "/api/materials/:id",
            get(get_material)
                .put(update_material)
                .delete(delete_material),
        )
}

/// GET /api/materials
async fn list_materials(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let materials = material::get_all_active_materials(&state.db).await?;
    Ok(Json(materials))
}

/// GET /api/materials/{id}
async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let found = material::get_material_by_id(&state.db, id)
        .await?
        .ok_or(Error::MaterialNotFound { id })?;
    Ok(Json(found))
}

/// GET /api/materials/code/{code}
async fn get_material_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<axum::response::Response> {
    match material::get_material_by_code(&state.db, &code).await? {
        Some(found) => Ok(Json(found).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Material with code '{code}' not found") })),
        )
            .into_response()),
    }
}

/// GET /api/materials/search?q=term
async fn search_materials(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let materials = material::search_materials(&state.db, &query.q).await?;
    Ok(Json(materials))
}

/// POST /api/materials
async fn create_material(
    State(state): State<AppState>,
    Json(body): Json<MaterialRequest>,
) -> Result<impl IntoResponse> {
    let created =
        material::create_material(&state.db, body.name, body.code, body.description).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/materials/{id}
async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<MaterialRequest>,
) -> Result<impl IntoResponse> {
    let updated =
        material::update_material(&state.db, id, body.name, body.code, body.description).await?;
    Ok(Json(updated))
}

/// DELETE /api/materials/{id}
async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    material::delete_material(&state.db, id).await?;
    Ok(Json(json!({ "message": "Material deleted successfully" })))
}
