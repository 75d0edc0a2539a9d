//! HTTP-level tests for the CorpPass sandbox endpoints. Message codes here
//! are strings.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_with_headers, post_json, post_raw};
use serde_json::json;

const AUTH: &str = "/iras/sb/Authentication/CorpPassAuth";
const TOKEN: &str = "/iras/sb/Authentication/CorpPassToken";

#[tokio::test]
async fn auth_url_uses_defaults() {
    let app = common::build_test_app();
    let response = get(app, AUTH).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 10);
    let url = json["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://stg-saml.corppass.gov.sg/"));
    assert!(url.contains("scope=EmpIncomeSub"));
    assert!(url.contains("state=1234"));
    assert!(url.contains("redirect_uri=https://demo.example.com/callback"));
}

#[tokio::test]
async fn tax_agent_extends_scope() {
    let app = common::build_test_app();
    let uri = format!(
        "{AUTH}?scope=EmpIncomeSub&tax_agent=true&callback_url=http://localhost:3000/callback&state=xyz"
    );
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let url = json["data"]["url"].as_str().unwrap();
    assert!(url.contains("scope=EmpIncomeSub,TaxAgent"));
    assert!(url.contains("state=xyz"));
    assert!(url.contains("redirect_uri=http://localhost:3000/callback"));
}

#[tokio::test]
async fn unregistered_callback_is_rejected() {
    let app = common::build_test_app();
    let uri = format!("{AUTH}?callback_url=https://evil.example.com/cb");
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], "850301");
    assert_eq!(json["info"]["message"], "Arguments Error");
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "callback_url");
}

#[tokio::test]
async fn missing_headers_use_string_code_in_production() {
    let app = common::build_app_with(common::production_config());
    let response = get_with_headers(app, AUTH, &[("X-IBM-Client-Id", "only-id")]).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], "40003");
}

#[tokio::test]
async fn token_is_derived_from_id() {
    let app = common::build_test_app();
    let response = post_json(app, TOKEN, json!({ "id": 7 })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 10);
    assert_eq!(json["data"]["access_token"], "corppass_access_token_7_demo_12345");
    assert_eq!(json["data"]["refresh_token"], "corppass_refresh_token_7_demo_67890");
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
}

#[tokio::test]
async fn non_positive_id_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(app, TOKEN, json!({ "id": 0 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], "40005");
    assert_eq!(json["info"]["message"], "Invalid ID");
}

#[tokio::test]
async fn malformed_token_body_uses_string_code() {
    let app = common::build_test_app();
    let response = post_raw(app, TOKEN, &[], "[").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], "40004");
}
