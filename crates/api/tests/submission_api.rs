//! HTTP-level tests for rental submission, Form CS conversion and the AIS
//! organisation search.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, post_json, post_json_auth, post_raw, DEMO_TOKEN};
use iras_core::reference::rental_reference;
use serde_json::json;

const RENTAL: &str = "/iras/sb/rental/Submission";
const CONVERT: &str = "/iras/prod/ct/convertformcs";
const AIS: &str = "/iras/sb/ESubmission/AISOrgSearch";

fn rental_body(items: serde_json::Value) -> serde_json::Value {
    json!({
        "orgAndSubmissionInfo": {
            "assmtYear": 2024,
            "authorisedPersonEmail": "owner@example.com",
            "authorisedPersonName": "Tan Ah Kow",
            "developmentName": "Marina Residences",
        },
        "propertyDtl": items,
    })
}

// ---------------------------------------------------------------------------
// Rental submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rental_submission_is_stored_and_referenced() {
    let app = common::build_test_app();
    let response = post_json(
        app.clone(),
        RENTAL,
        rental_body(json!([
            { "recordID": 1, "propertyTaxRef": "A1", "monthlyRent": 3500 },
            { "recordID": 2, "propertyTaxRef": "A2" },
        ])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 0);
    let ref_no = json["data"]["refNo"].as_str().unwrap().to_string();
    assert!(ref_no.starts_with("RNT"));
    assert_eq!(ref_no.len(), 17);

    let stored = get_auth(
        app,
        &format!("/admin/rental-submissions/ref/{ref_no}"),
        DEMO_TOKEN,
    )
    .await;
    assert_eq!(stored.status(), StatusCode::OK);
    let stored = body_json(stored).await;
    assert_eq!(stored["data"]["total_properties"], 2);
    assert_eq!(stored["data"]["status"], "submitted");
}

#[tokio::test]
async fn same_second_rental_reference_surfaces_as_store_failure() {
    let app = common::build_test_app();

    // Occupy the references for this second and the next two.
    let now = Utc::now();
    for offset in 0..3 {
        let seeded = json!({
            "ref_no": rental_reference(now + Duration::seconds(offset)),
            "assmt_year": 2024,
            "authorised_person_email": "owner@example.com",
            "authorised_person_name": "Tan Ah Kow",
            "development_name": "Marina Residences",
        });
        let response =
            post_json_auth(app.clone(), "/admin/rental-submissions", DEMO_TOKEN, seeded).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = post_json(
        app.clone(),
        RENTAL,
        rental_body(json!([{ "recordID": 1, "propertyTaxRef": "A1" }])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 50);

    let listed = body_json(get_auth(app, "/admin/rental-submissions", DEMO_TOKEN).await).await;
    assert_eq!(listed["data"]["total"], 3);
}

#[tokio::test]
async fn rental_line_item_errors_are_collected_and_nested() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        RENTAL,
        rental_body(json!([
            { "recordID": 1, "propertyTaxRef": "A1" },
            { "recordID": 2 },
            { "recordID": 3, "propertyTaxRef": " " },
        ])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 40006);
    let items = json["info"]["fieldInfoList"]["fieldInfo"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["recordID"], "2");
    assert_eq!(items[1]["recordID"], "3");
}

#[tokio::test]
async fn rental_without_items_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(app, RENTAL, rental_body(json!([]))).await;

    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40005);
    assert_eq!(
        json["info"]["fieldInfoList"]["fieldInfo"][0]["field"],
        "propertyDtl"
    );
}

#[tokio::test]
async fn rental_bad_json_is_nested_400() {
    let app = common::build_test_app();
    let response = post_raw(app, RENTAL, &[], "{").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40004);
    assert_eq!(json["info"]["fieldInfoList"]["fieldInfo"][0]["field"], "body");
}

#[tokio::test]
async fn rental_missing_headers_is_nested_401() {
    let app = common::build_app_with(common::production_config());
    let response = post_json(app, RENTAL, rental_body(json!([]))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40003);
    assert_eq!(
        json["info"]["fieldInfoList"]["fieldInfo"][0]["field"],
        "headers"
    );
}

// ---------------------------------------------------------------------------
// Form CS conversion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conversion_is_idempotent_per_request_id() {
    let app = common::build_test_app();

    let first = body_json(post_json(app.clone(), CONVERT, json!({ "id": 42 })).await).await;
    assert_eq!(first["returnCode"], 10);
    assert_eq!(first["data"]["status"], "completed");
    assert_eq!(first["data"]["processedBy"], "IRAS_CIT_SYSTEM");
    assert_eq!(
        first["data"]["conversionResult"],
        "Form CS conversion completed for ID: 42"
    );

    let second = body_json(post_json(app.clone(), CONVERT, json!({ "id": 42 })).await).await;
    assert_eq!(second["data"]["conversionID"], first["data"]["conversionID"]);

    let listed = body_json(get_auth(app, "/admin/cit-conversions", DEMO_TOKEN).await).await;
    assert_eq!(listed["data"]["total"], 1);
}

#[tokio::test]
async fn back_to_back_conversions_get_distinct_ids() {
    let app = common::build_test_app();

    let first = post_json(app.clone(), CONVERT, json!({ "id": 101 })).await;
    let second = post_json(app.clone(), CONVERT, json!({ "id": 102 })).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    let first = body_json(first).await;
    let second = body_json(second).await;
    assert_eq!(first["returnCode"], 10);
    assert_eq!(second["returnCode"], 10);
    assert_ne!(first["data"]["conversionID"], second["data"]["conversionID"]);

    let listed = body_json(get_auth(app, "/admin/cit-conversions", DEMO_TOKEN).await).await;
    assert_eq!(listed["data"]["total"], 2);
}

#[tokio::test]
async fn conversion_rejects_non_positive_id_with_200() {
    let app = common::build_test_app();
    let response = post_json(app, CONVERT, json!({ "id": -3 })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 40001);
    assert_eq!(json["info"]["fieldInfoList"][0]["message"], "ID must be greater than 0");
}

#[tokio::test]
async fn conversion_lookup_by_request_id() {
    let app = common::build_test_app();
    post_json(app.clone(), CONVERT, json!({ "id": 9 })).await;

    let found = get_auth(app.clone(), "/admin/cit-conversions/request/9", DEMO_TOKEN).await;
    assert_eq!(found.status(), StatusCode::OK);

    let bad = get_auth(app, "/admin/cit-conversions/request/nine", DEMO_TOKEN).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    let json = body_json(bad).await;
    assert_eq!(json["message"], "Invalid request ID format");
}

// ---------------------------------------------------------------------------
// AIS organisation search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enrolled_organisation_is_reported() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        AIS,
        json!({ "clientID": "c", "organizationID": "4396029847797760", "basisYear": 2024 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Organization search completed successfully");
    assert_eq!(json["data"]["returnCode"], 10);
    assert_eq!(json["data"]["data"]["organizationInAIS"], "Y");
}

#[tokio::test]
async fn ais_validation_uses_string_codes() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        AIS,
        json!({ "clientID": "c", "organizationID": "1", "basisYear": 1800 }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["returnCode"], 40);
    assert_eq!(json["data"]["info"]["messageCode"], "40003");
    assert_eq!(json["data"]["info"]["fieldInfoList"][0]["field"], "basisYear");
}
