//! HTTP-level tests for the SingPass service authorisation flow.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, DEMO_TOKEN};
use iras_core::pagination::Page;
use iras_core::types::DbId;
use iras_db::error::RepoResult;
use iras_db::models::singpass::{
    CreateSingPassTokenRecord, SingPassTokenRecord, UpdateSingPassTokenRecord,
};
use iras_db::repositories::SingPassTokenStore;
use iras_db::{RepoError, Repositories};
use serde_json::json;

const AUTH: &str = "/iras/prod/Authentication/SingPassServiceAuth";
const TOKEN: &str = "/iras/prod/Authentication/SingPassServiceAuthToken";

fn token_request(state: &str) -> serde_json::Value {
    json!({
        "code": "auth-code",
        "state": state,
        "callback_url": "http://www.iras.gov.sg/callback",
        "scope": "GSTReturnsSub",
    })
}

#[tokio::test]
async fn get_uses_query_and_stores_pending_record() {
    let app = common::build_test_app();
    let uri = format!("{AUTH}?state=abc123&callback_url=http://localhost:8090/callback");
    let response = get(app.clone(), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 10);
    assert_eq!(json["data"]["state"], "abc123");
    let url = json["data"]["url"].as_str().unwrap();
    assert!(url.contains("redirect_uri=http://localhost:8090/callback"));
    assert!(url.contains("state=abc123"));

    let record = get_auth(app, "/admin/singpass-auth/state/abc123", DEMO_TOKEN).await;
    assert_eq!(record.status(), StatusCode::OK);
    let record = body_json(record).await;
    assert_eq!(record["data"]["status"], "pending");
    assert_eq!(record["data"]["scope"], "GSTReturnsSub+GSTTransListSub");
}

#[tokio::test]
async fn post_json_body_generates_state_when_absent() {
    let app = common::build_test_app();
    let response = post_json(app, AUTH, json!({ "scope": "GSTReturnsSub" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let state = json["data"]["state"].as_str().unwrap();
    assert_eq!(state.len(), 36);
    let url = json["data"]["url"].as_str().unwrap();
    assert!(url.contains("scope=GSTReturnsSub&redirect_uri"));
}

#[tokio::test]
async fn unregistered_callback_answers_200_with_850301() {
    let app = common::build_test_app();
    let uri = format!("{AUTH}?callback_url=https://example.com/cb");
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 850301);
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "callback_url");
}

#[tokio::test]
async fn token_exchange_completes_the_auth_record() {
    let app = common::build_test_app();
    get(app.clone(), &format!("{AUTH}?state=flow-1")).await;

    let response = post_json(app.clone(), TOKEN, token_request("flow-1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 10);
    assert!(json["data"]["access_token"].as_str().unwrap().starts_with("SP_AT_"));
    assert!(json["data"]["refresh_token"].as_str().unwrap().starts_with("SP_RT_"));
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["scope"], "GSTReturnsSub");

    let record = get_auth(app.clone(), "/admin/singpass-auth/state/flow-1", DEMO_TOKEN).await;
    let record = body_json(record).await;
    assert_eq!(record["data"]["status"], "completed");

    let token = get_auth(app, "/admin/singpass-tokens/state/flow-1", DEMO_TOKEN).await;
    assert_eq!(token.status(), StatusCode::OK);
    let token = body_json(token).await;
    assert_eq!(token["data"]["code"], "auth-code");
    assert_eq!(token["data"]["status"], "active");
}

/// Token store whose writes are always rejected.
struct RejectingTokenStore;

fn rejected<T>() -> RepoResult<T> {
    Err(RepoError::UniqueViolation(
        "uq_singpass_token_records_access_token".to_string(),
    ))
}

#[async_trait]
impl SingPassTokenStore for RejectingTokenStore {
    async fn create(&self, _: &CreateSingPassTokenRecord) -> RepoResult<SingPassTokenRecord> {
        rejected()
    }

    async fn issue(
        &self,
        _: DbId,
        _: &CreateSingPassTokenRecord,
    ) -> RepoResult<SingPassTokenRecord> {
        rejected()
    }

    async fn find_by_id(&self, _: DbId) -> RepoResult<Option<SingPassTokenRecord>> {
        Ok(None)
    }

    async fn find_by_state(&self, _: &str) -> RepoResult<Option<SingPassTokenRecord>> {
        Ok(None)
    }

    async fn list(&self, _: &Page) -> RepoResult<(Vec<SingPassTokenRecord>, i64)> {
        Ok((Vec::new(), 0))
    }

    async fn update(
        &self,
        _: DbId,
        _: &UpdateSingPassTokenRecord,
    ) -> RepoResult<Option<SingPassTokenRecord>> {
        rejected()
    }

    async fn soft_delete(&self, _: DbId) -> RepoResult<bool> {
        rejected()
    }
}

#[tokio::test]
async fn failed_token_write_leaves_the_auth_record_pending() {
    let mut repos = Repositories::in_memory();
    repos.singpass_tokens = Arc::new(RejectingTokenStore);
    let app = common::build_app_with_repos(repos.clone());
    get(app.clone(), &format!("{AUTH}?state=flow-2")).await;

    let response = post_json(app, TOKEN, token_request("flow-2")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 50);
    assert!(json.get("data").is_none());

    let record = repos.singpass_auth.find_by_state("flow-2").await.unwrap().unwrap();
    assert_eq!(record.status, "pending");
}

#[tokio::test]
async fn unknown_state_is_rejected_with_200() {
    let app = common::build_test_app();
    let response = post_json(app, TOKEN, token_request("never-issued")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["returnCode"], 40);
    assert_eq!(json["info"]["messageCode"], 40005);
    assert_eq!(json["info"]["message"], "Invalid state");
}

#[tokio::test]
async fn token_fields_are_checked_in_order() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        TOKEN,
        json!({ "code": "c", "state": "s", "callback_url": "http://www.iras.gov.sg/callback" }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["info"]["messageCode"], 40004);
    assert_eq!(json["info"]["message"], "Missing required field");
    assert_eq!(json["info"]["fieldInfoList"][0]["field"], "scope");
}
