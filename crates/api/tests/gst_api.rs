//! HTTP-level tests for the GST register lookup.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_json_auth, post_json_with_headers, post_raw, DEMO_TOKEN};
use serde_json::json;

const SEARCH: &str = "/iras/prod/GSTListing/SearchGSTRegistered";

/// Seed one registration through the admin API.
async fn seed_registration(app: axum::Router) {
    let body = json!({
        "client_id": "client-1",
        "registration_id": "M90312345A",
        "gst_registration_number": "M90312345A",
        "name": "ACME PTE LTD",
        "registered_from": "2020-01-01",
        "registered_to": "",
        "status": "Registered",
        "remarks": "",
    });
    let response = post_json_auth(app, "/admin/gst-registrations", DEMO_TOKEN, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn known_registration_returns_10() {
    let app = common::build_test_app();
    seed_registration(app.clone()).await;

    let response = post_json(
        app,
        SEARCH,
        json!({ "clientID": "client-1", "regID": "M90312345A" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 10);
    assert_eq!(json["data"]["name"], "ACME PTE LTD");
    assert_eq!(json["data"]["gstRegistrationNumber"], "M90312345A");
    assert_eq!(json["data"]["RegisteredFrom"], "2020-01-01");
    assert_eq!(json["data"]["Status"], "Registered");
    assert!(json.get("info").is_none());
}

#[tokio::test]
async fn registration_is_scoped_to_client_id() {
    let app = common::build_test_app();
    seed_registration(app.clone()).await;

    let response = post_json(
        app,
        SEARCH,
        json!({ "clientID": "someone-else", "regID": "M90312345A" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 20);
    assert_eq!(json["info"]["messageCode"], 20001);
    assert_eq!(json["info"]["message"], "GST registration not found");
}

#[tokio::test]
async fn blank_client_id_is_rejected_first() {
    let app = common::build_test_app();
    let response = post_json(app, SEARCH, json!({ "clientID": "  ", "regID": "" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 40001);
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "clientID");
    assert_eq!(json["info"]["fieldInfoList"][0]["message"], "Client ID is required");
}

#[tokio::test]
async fn blank_registration_id_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(app, SEARCH, json!({ "clientID": "client-1" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40002);
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "regID");
}

#[tokio::test]
async fn malformed_body_is_invalid_format() {
    let app = common::build_test_app();
    let response = post_raw(app, SEARCH, &[], "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 40004);
    assert_eq!(json["info"]["message"], "Invalid request format");
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "body");
}

#[tokio::test]
async fn production_requires_client_headers() {
    let app = common::build_app_with(common::production_config());
    let response = post_json(
        app,
        SEARCH,
        json!({ "clientID": "client-1", "regID": "M90312345A" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 40003);
    assert_eq!(json["info"]["message"], "Missing required headers");
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "headers");
}

#[tokio::test]
async fn production_accepts_supplied_headers() {
    let app = common::build_app_with(common::production_config());
    let response = post_json_with_headers(
        app,
        SEARCH,
        &[("X-IBM-Client-Id", "id"), ("X-IBM-Client-Secret", "secret")],
        json!({ "clientID": "client-1", "regID": "unknown" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
