//! HTTP-level tests for the bearer-protected `/admin` CRUD surface.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth, DEMO_TOKEN,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create(app: axum::Router, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, uri, DEMO_TOKEN, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn gst(client_id: &str) -> serde_json::Value {
    json!({
        "client_id": client_id,
        "registration_id": format!("REG-{client_id}"),
        "gst_registration_number": "M90312345A",
        "name": "Acme Pte Ltd",
        "status": "Registered",
    })
}

/// Register a plain user and return a JWT for them.
async fn user_token(app: axum::Router) -> String {
    let registration = json!({
        "name": "Tan Ah Kow",
        "username": "ahkow",
        "email": "ahkow@example.com",
        "password": "secret123",
    });
    let response = post_json(app.clone(), "/auth/register", registration).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = json!({ "username": "ahkow", "password": "secret123" });
    let json = body_json(post_json(app, "/auth/login", login).await).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// GST registrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gst_registration_crud_round() {
    let app = common::build_test_app();
    let created = create(app.clone(), "/admin/gst-registrations", gst("C1")).await;
    assert_eq!(created["message"], "GST registration created successfully");
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/admin/gst-registrations/{id}");

    let patch = json!({ "remarks": "checked" });
    let response = put_json_auth(app.clone(), &uri, DEMO_TOKEN, patch).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["remarks"], "checked");
    assert_eq!(json["data"]["name"], "Acme Pte Ltd");

    let response = delete_auth(app.clone(), &uri, DEMO_TOKEN).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &uri, DEMO_TOKEN).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "GST registration not found");
    assert_eq!(json["error"], "NOT_FOUND");
}

#[tokio::test]
async fn list_reports_pagination() {
    let app = common::build_test_app();
    for client in ["C1", "C2", "C3"] {
        create(app.clone(), "/admin/gst-registrations", gst(client)).await;
    }

    let response = get_auth(app, "/admin/gst-registrations?page=2&limit=2", DEMO_TOKEN).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["page"], 2);
    assert_eq!(json["data"]["limit"], 2);
    assert_eq!(json["data"]["total_pages"], 2);
    assert_eq!(json["data"]["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = common::build_test_app();
    let response = get_auth(app, "/admin/gst-registrations/abc", DEMO_TOKEN).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid ID format");
}

#[tokio::test]
async fn admin_routes_require_a_bearer() {
    let app = common::build_test_app();
    let response = get(app, "/admin/gst-registrations").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_management_requires_admin_role() {
    let app = common::build_test_app();
    let token = user_token(app.clone()).await;

    let response = get_auth(app.clone(), "/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Admin access required");

    let response = get_auth(app, "/admin/users", DEMO_TOKEN).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
}

#[tokio::test]
async fn admin_cannot_delete_themselves() {
    let app = common::build_test_app();
    let response = delete_auth(app, "/admin/users/999", DEMO_TOKEN).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "cannot delete your own account");
}

#[tokio::test]
async fn admin_creates_user_with_unknown_role_rejected() {
    let app = common::build_test_app();
    let body = json!({
        "name": "Lim Bee Leng",
        "username": "beeleng",
        "email": "beeleng@example.com",
        "password": "secret123",
        "role": "superuser",
    });
    let response = post_json_auth(app, "/admin/users", DEMO_TOKEN, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Categories and products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn products_carry_their_category_name() {
    let app = common::build_test_app();
    let category = create(app.clone(), "/admin/categories", json!({ "name": "Stationery" })).await;
    let category_id = category["data"]["id"].as_i64().unwrap();

    let product = create(
        app.clone(),
        "/admin/products",
        json!({ "name": "Stapler", "price": 12.5, "stock": 4, "category_id": category_id }),
    )
    .await;
    assert_eq!(product["data"]["category_name"], "Stationery");
    assert!(product["data"]["user_id"].is_null());

    let json = body_json(get_auth(app, "/admin/products", DEMO_TOKEN).await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["data"][0]["category_name"], "Stationery");
}

#[tokio::test]
async fn category_with_products_cannot_be_deleted() {
    let app = common::build_test_app();
    let category = create(app.clone(), "/admin/categories", json!({ "name": "Stationery" })).await;
    let category_id = category["data"]["id"].as_i64().unwrap();
    create(
        app.clone(),
        "/admin/products",
        json!({ "name": "Stapler", "category_id": category_id }),
    )
    .await;

    let uri = format!("/admin/categories/{category_id}");
    let response = delete_auth(app, &uri, DEMO_TOKEN).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], "cannot delete category with existing products");
}

#[tokio::test]
async fn blank_category_name_is_rejected() {
    let app = common::build_test_app();
    let response =
        post_json_auth(app, "/admin/categories", DEMO_TOKEN, json!({ "name": "  " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
}
