//! Integration tests for the REST API.
//!
//! Tests drive the full router against an in-memory database and cover:
//! - Health endpoint
//! - Product and material CRUD with not-found and conflict mapping
//! - Composition create/update/delete with validation failures carrying
//!   remaining-capacity detail
//! - Read-side aggregate endpoints (totals, remaining capacity, validity)

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use epr_api::api::{AppState, build_router};
use epr_api::core::{composition, material, product};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: in-memory database with tables created
async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Should connect to in-memory database");
    epr_api::config::database::create_tables(&db)
        .await
        .expect("Should create tables");
    db
}

/// Test helper: router over a fresh database, returning both
async fn setup_app() -> (Router, DatabaseConnection) {
    let db = setup_db().await;
    let app = build_router(AppState::new(db.clone()));
    (app, db)
}

/// Test helper: request without a body
fn get_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: request with a JSON body
fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _db) = setup_app().await;

    let response = app.oneshot(get_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "epr-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Product endpoints
// =============================================================================

#[tokio::test]
async fn test_product_crud_roundtrip() {
    let (app, _db) = setup_app().await;

    // Create
    let payload = json!({
        "name": "PET Bottle",
        "sku": "BTL-500",
        "description": "500ml bottle",
        "weight": "10.000",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = extract_json(response.into_body()).await;
    assert_eq!(created["name"], "PET Bottle");
    assert_eq!(created["sku"], "BTL-500");
    // Decimal fields serialize as strings; compare numerically.
    assert_eq!(dec(created["weight"].as_str().unwrap()), dec("10.000"));
    assert_eq!(created["isActive"], true);
    let id = created["id"].as_i64().unwrap();

    // Read back by id and by SKU
    let response = app
        .clone()
        .oneshot(get_request("GET", &format!("/api/products/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("GET", "/api/products/sku/BTL-500"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Update
    let payload = json!({
        "name": "PET Bottle v2",
        "sku": "BTL-501",
        "weight": "12.000",
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/api/products/{id}"), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = extract_json(response.into_body()).await;
    assert_eq!(updated["sku"], "BTL-501");

    // Delete, then read back as 404
    let response = app
        .clone()
        .oneshot(get_request("DELETE", &format!("/api/products/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("GET", &format!("/api/products/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_not_found_and_conflict() {
    let (app, db) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get_request("GET", "/api/products/999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    product::create_product(
        &db,
        "PET Bottle".to_string(),
        "BTL-500".to_string(),
        None,
        dec("10.000"),
    )
    .await
    .unwrap();

    // Duplicate SKU maps to 409.
    let payload = json!({ "name": "Other", "sku": "BTL-500", "weight": "5.000" });
    let response = app
        .oneshot(json_request("POST", "/api/products", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_product_validation_maps_to_bad_request() {
    let (app, _db) = setup_app().await;

    let payload = json!({ "name": "", "sku": "BTL-500", "weight": "5.000" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = json!({ "name": "Bottle", "sku": "BTL-500", "weight": "0" });
    let response = app
        .oneshot(json_request("POST", "/api/products", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Material endpoints
// =============================================================================

#[tokio::test]
async fn test_material_crud_roundtrip() {
    let (app, _db) = setup_app().await;

    let payload = json!({ "name": "Aluminium", "code": "ALU" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/materials", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = extract_json(response.into_body()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request("GET", "/api/materials/code/ALU"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Duplicate code maps to 409.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/materials", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get_request("DELETE", &format!("/api/materials/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("GET", "/api/materials/code/ALU"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Composition endpoints
// =============================================================================

/// Seeds one 10.000 kg product and two materials, returning their ids.
async fn seed_catalog(db: &DatabaseConnection) -> (i32, i32, i32) {
    let product = product::create_product(
        db,
        "PET Bottle".to_string(),
        "BTL-500".to_string(),
        None,
        dec("10.000"),
    )
    .await
    .unwrap();
    let aluminium = material::create_material(db, "Aluminium".to_string(), "ALU".to_string(), None)
        .await
        .unwrap();
    let pet = material::create_material(db, "PET".to_string(), "PET".to_string(), None)
        .await
        .unwrap();
    (product.id, aluminium.id, pet.id)
}

#[tokio::test]
async fn test_create_composition_success() {
    let (app, db) = setup_app().await;
    let (product_id, material_id, _) = seed_catalog(&db).await;

    let payload = json!({
        "productId": product_id,
        "materialId": material_id,
        "weight": "6.000",
        "compositionPercentage": "60.00",
        "notes": "bottle body",
    });
    let response = app
        .oneshot(json_request("POST", "/api/product-compositions", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = extract_json(response.into_body()).await;
    assert_eq!(created["productId"].as_i64().unwrap(), i64::from(product_id));
    assert_eq!(dec(created["weight"].as_str().unwrap()), dec("6.000"));
    assert_eq!(dec(created["percentage"].as_str().unwrap()), dec("60.00"));
    assert_eq!(created["notes"], "bottle body");
    assert_eq!(created["isActive"], true);
}

#[tokio::test]
async fn test_create_composition_capacity_error_carries_detail() {
    let (app, db) = setup_app().await;
    let (product_id, aluminium, pet) = seed_catalog(&db).await;

    composition::create_composition(&db, product_id, aluminium, dec("6.000"), dec("60.00"), None)
        .await
        .unwrap();

    // 6.000 + 5.000 kg overshoots the 10.000 kg product.
    let payload = json!({
        "productId": product_id,
        "materialId": pet,
        "weight": "5.000",
        "compositionPercentage": "50.00",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/product-compositions", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("remaining capacity: 4.000 kg"), "{message}");

    // The revised candidate fills the product exactly; equality is allowed.
    let payload = json!({
        "productId": product_id,
        "materialId": pet,
        "weight": "4.000",
        "compositionPercentage": "40.00",
    });
    let response = app
        .oneshot(json_request("POST", "/api/product-compositions", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_composition_reference_and_conflict_mapping() {
    let (app, db) = setup_app().await;
    let (product_id, material_id, _) = seed_catalog(&db).await;

    // Unknown product maps to 404.
    let payload = json!({
        "productId": 999,
        "materialId": material_id,
        "weight": "1.000",
        "compositionPercentage": "10.00",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/product-compositions", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    composition::create_composition(&db, product_id, material_id, dec("1.000"), dec("10.00"), None)
        .await
        .unwrap();

    // Second active composition for the same pair maps to 409.
    let payload = json!({
        "productId": product_id,
        "materialId": material_id,
        "weight": "1.000",
        "compositionPercentage": "10.00",
    });
    let response = app
        .oneshot(json_request("POST", "/api/product-compositions", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_composition_endpoint() {
    let (app, db) = setup_app().await;
    let (product_id, material_id, _) = seed_catalog(&db).await;

    let created =
        composition::create_composition(&db, product_id, material_id, dec("6.000"), dec("60.00"), None)
            .await
            .unwrap();

    // Updating to its own values succeeds.
    let payload = json!({
        "productId": product_id,
        "materialId": material_id,
        "weight": "6.000",
        "compositionPercentage": "60.00",
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/product-compositions/{}", created.id),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Growing beyond the product weight fails with 400.
    let payload = json!({
        "productId": product_id,
        "materialId": material_id,
        "weight": "11.000",
        "compositionPercentage": "60.00",
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/product-compositions/{}", created.id),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown id maps to 404.
    let response = app
        .oneshot(json_request("PUT", "/api/product-compositions/999", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_composition_frees_capacity() {
    let (app, db) = setup_app().await;
    let (product_id, material_id, _) = seed_catalog(&db).await;

    let created =
        composition::create_composition(&db, product_id, material_id, dec("6.000"), dec("60.00"), None)
            .await
            .unwrap();

    let uri = format!(
        "/api/product-compositions/product/{product_id}/remaining-weight"
    );
    let response = app.clone().oneshot(get_request("GET", &uri)).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!("4.000"));

    let response = app
        .clone()
        .oneshot(get_request(
            "DELETE",
            &format!("/api/product-compositions/{}", created.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Product composition deleted successfully");

    // The freed capacity is visible immediately.
    let response = app.clone().oneshot(get_request("GET", &uri)).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!("10.000"));

    // Deleting again maps to 404.
    let response = app
        .oneshot(get_request(
            "DELETE",
            &format!("/api/product-compositions/{}", created.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_aggregate_endpoints() {
    let (app, db) = setup_app().await;
    let (product_id, aluminium, pet) = seed_catalog(&db).await;

    composition::create_composition(&db, product_id, aluminium, dec("6.000"), dec("60.00"), None)
        .await
        .unwrap();
    composition::create_composition(&db, product_id, pet, dec("3.000"), dec("30.00"), None)
        .await
        .unwrap();

    let base = format!("/api/product-compositions/product/{product_id}");

    let cases = [
        ("total-weight", json!("9.000")),
        ("remaining-weight", json!("1.000")),
        ("total-percentage", json!("90.00")),
        ("remaining-percentage", json!("10.00")),
        ("validate", json!(true)),
        ("weight-valid", json!(true)),
    ];
    for (path, expected) in cases {
        let response = app
            .clone()
            .oneshot(get_request("GET", &format!("{base}/{path}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body = extract_json(response.into_body()).await;
        assert_eq!(body, expected, "{path}");
    }

    let response = app
        .clone()
        .oneshot(get_request("GET", &format!("{base}/weight-validation")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = extract_json(response.into_body()).await;
    assert_eq!(report["valid"], true);
    assert_eq!(report["productWeight"], "10.000");
    assert_eq!(report["materialWeight"], "9.000");
    assert_eq!(report["remainingWeight"], "1.000");

    let response = app
        .oneshot(get_request("POST", &format!("{base}/validate-all")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_remaining_weight_unknown_product_is_not_found() {
    let (app, _db) = setup_app().await;

    let response = app
        .oneshot(get_request(
            "GET",
            "/api/product-compositions/product/999/remaining-weight",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_all_reports_violation_after_product_shrinks() {
    let (app, db) = setup_app().await;
    let (product_id, material_id, _) = seed_catalog(&db).await;

    composition::create_composition(&db, product_id, material_id, dec("8.000"), dec("80.00"), None)
        .await
        .unwrap();

    // Shrinking the product leaves the stored composition over the limit.
    product::update_product(
        &db,
        product_id,
        "PET Bottle".to_string(),
        "BTL-500".to_string(),
        None,
        dec("5.000"),
    )
    .await
    .unwrap();

    let response = app
        .oneshot(get_request(
            "POST",
            &format!("/api/product-compositions/product/{product_id}/validate-all"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("exceeds product weight"));
}
