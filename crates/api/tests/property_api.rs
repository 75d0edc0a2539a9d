//! HTTP-level tests for the property consolidated statement and tax balance
//! lookups, including the development-only demo fallback.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_json_auth, post_json_with_headers, DEMO_TOKEN};
use serde_json::json;

const STATEMENT: &str = "/iras/sb/PropertyConsolidatedStatement/retrieve";
const TAX_BALANCE: &str = "/iras/sb/PTTaxBal/PtyTaxBalSearch";

const CLIENT_HEADERS: [(&str, &str); 2] = [
    ("X-IBM-Client-Id", "client"),
    ("X-IBM-Client-Secret", "secret"),
];

// ---------------------------------------------------------------------------
// Consolidated statement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stored_statement_is_returned_with_code_0() {
    let app = common::build_test_app();
    let statement = json!({
        "statementDate": "2025-01-15",
        "totalAmount": "1200.00",
        "propertyDetails": [],
        "paymentHistory": [],
    });
    let seeded = post_json_auth(
        app.clone(),
        "/admin/property-statements",
        DEMO_TOKEN,
        json!({
            "ref_no": "REF-1",
            "property_tax_ref": "PT-1",
            "statement_date": "2025-01-15",
            "total_amount": "1200.00",
            "consolidated_data": statement.to_string(),
        }),
    )
    .await;
    assert_eq!(seeded.status(), StatusCode::CREATED);

    let response = post_json(
        app,
        STATEMENT,
        json!({ "refNo": "REF-1", "propertyTaxRef": "PT-1" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 0);
    assert_eq!(json["data"]["refNo"], "REF-1");
    assert_eq!(json["data"]["consolidatedStatement"]["totalAmount"], "1200.00");
}

#[tokio::test]
async fn development_miss_serves_demo_statement() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        STATEMENT,
        json!({ "refNo": "NOPE", "propertyTaxRef": "NOPE" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 0);
    assert!(json["data"]["consolidatedStatement"]["propertyDetails"].is_array());
}

#[tokio::test]
async fn production_miss_is_not_found() {
    let app = common::build_app_with(common::production_config());
    let response = post_json_with_headers(
        app,
        STATEMENT,
        &CLIENT_HEADERS,
        json!({ "refNo": "NOPE", "propertyTaxRef": "NOPE" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 20);
    assert_eq!(json["info"]["messageCode"], 20001);
}

#[tokio::test]
async fn corrupt_statement_is_an_internal_error() {
    let app = common::build_test_app();
    post_json_auth(
        app.clone(),
        "/admin/property-statements",
        DEMO_TOKEN,
        json!({
            "ref_no": "REF-X",
            "property_tax_ref": "PT-X",
            "consolidated_data": "{broken",
        }),
    )
    .await;

    let response = post_json(
        app,
        STATEMENT,
        json!({ "refNo": "REF-X", "propertyTaxRef": "PT-X" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 50);
    assert_eq!(json["info"]["messageCode"], 50002);
}

#[tokio::test]
async fn statement_requires_reference_number() {
    let app = common::build_test_app();
    let response = post_json(app, STATEMENT, json!({ "propertyTaxRef": "PT-1" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40001);
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "refNo");
}

// ---------------------------------------------------------------------------
// Tax balance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stored_tax_balance_is_found_by_reference() {
    let app = common::build_test_app();
    let seeded = post_json_auth(
        app.clone(),
        "/admin/property-tax-balances",
        DEMO_TOKEN,
        json!({
            "client_id": "client-1",
            "property_tax_ref": "PT-9",
            "owner_tax_ref": "S1234567D",
            "postal_code": "018956",
            "outstanding_balance": 1234.5,
            "giro_payment": true,
        }),
    )
    .await;
    assert_eq!(seeded.status(), StatusCode::CREATED);

    let response = post_json(
        app,
        TAX_BALANCE,
        json!({ "clientID": "client-1", "propertyTaxRef": "PT-9" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 0);
    assert_eq!(json["data"]["propertyTaxRef"], "PT-9");
    assert_eq!(json["data"]["outstandingBalance"], "1234.50");
    assert_eq!(json["data"]["giroPayment"], "Y");
}

#[tokio::test]
async fn tax_balance_needs_some_criteria() {
    let app = common::build_test_app();
    let response = post_json(app, TAX_BALANCE, json!({ "clientID": "client-1" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40002);
}

#[tokio::test]
async fn production_tax_balance_miss_is_not_found() {
    let app = common::build_app_with(common::production_config());
    let response = post_json_with_headers(
        app,
        TAX_BALANCE,
        &CLIENT_HEADERS,
        json!({ "clientID": "client-1", "postalCode": "000000" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["info"]["message"], "Property tax balance not found");
}
