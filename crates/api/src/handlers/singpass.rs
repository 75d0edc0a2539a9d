//! SingPass service authorisation flow and its admin CRUD.
//!
//! `SingPassServiceAuth` stores a `pending` auth record keyed by `state`;
//! `SingPassServiceAuthToken` exchanges that state for a token record and
//! marks the auth record `completed`. Service-level rejections answer 200.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use iras_core::oauth::{
    is_singpass_callback, singpass_auth_url, SINGPASS_DEFAULT_CALLBACK, SINGPASS_DEFAULT_SCOPE,
    SINGPASS_RECORD_CLIENT_ID, SINGPASS_STATUS_PENDING,
    SINGPASS_TOKEN_EXPIRES_IN, SINGPASS_TOKEN_STATUS_ACTIVE, SINGPASS_TOKEN_TYPE,
    UNREGISTERED_CALLBACK_CODE, UNREGISTERED_CALLBACK_DETAIL, UNREGISTERED_CALLBACK_MESSAGE,
};
use iras_core::reference::{singpass_access_token, singpass_refresh_token};
use iras_core::validation::{is_blank, return_code, FieldError, Rejection, INVALID_FORMAT_CODE};
use iras_db::models::singpass::{
    CreateSingPassAuthRecord, CreateSingPassTokenRecord, SingPassAuthRecord,
    SingPassTokenRecord, UpdateSingPassAuthRecord, UpdateSingPassTokenRecord,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{deleted, found, found_by_key, iras_store_failure};
use crate::error::AppResult;
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_headers::ClientCredentials;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, IrasResponse, Paginated};
use crate::state::AppState;

const AUTH_RECORD: &str = "SingPass auth record";
const TOKEN_RECORD: &str = "SingPass token record";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ServiceAuthParams {
    pub scope: Option<String>,
    pub callback_url: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceAuthData {
    pub url: String,
    pub state: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceAuthTokenRequest {
    pub code: String,
    pub state: String,
    pub callback_url: String,
    pub scope: String,
}

impl ServiceAuthTokenRequest {
    /// Required fields in order, then the callback registry.
    pub fn validate(&self) -> Result<(), Rejection> {
        let required = [
            (40001, "code", &self.code, "Code is required"),
            (40002, "state", &self.state, "State is required"),
            (40003, "callback_url", &self.callback_url, "Callback URL is required"),
            (40004, "scope", &self.scope, "Scope is required"),
        ];
        if let Some((code, field, _, message)) =
            required.into_iter().find(|(_, _, value, _)| is_blank(value))
        {
            return Err(Rejection::single(code, "Missing required field", field, message));
        }
        if !is_singpass_callback(self.callback_url.trim()) {
            return Err(unregistered_callback());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceAuthTokenData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i32,
    pub refresh_token: String,
    pub scope: String,
}

fn unregistered_callback() -> Rejection {
    Rejection::single(
        UNREGISTERED_CALLBACK_CODE,
        UNREGISTERED_CALLBACK_MESSAGE,
        "callback_url",
        UNREGISTERED_CALLBACK_DETAIL,
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn bad_parameters(field: &str, message: &str, detail: &str) -> Response {
    IrasResponse::<()>::failure(
        return_code::VALIDATION,
        INVALID_FORMAT_CODE,
        message,
        vec![FieldError::new(field, detail)],
    )
    .with_status(StatusCode::BAD_REQUEST)
}

/// Pick the parameter source: a JSON body on `POST application/json`,
/// falling back to the query string when the body does not parse.
fn auth_params(
    method: &Method,
    headers: &HeaderMap,
    query: Result<Query<ServiceAuthParams>, QueryRejection>,
    body: &Bytes,
) -> Result<ServiceAuthParams, Response> {
    if method == Method::POST && is_json(headers) {
        if let Ok(params) = serde_json::from_slice::<ServiceAuthParams>(body) {
            return Ok(params);
        }
        return query.map(|Query(params)| params).map_err(|_| {
            bad_parameters(
                "request",
                "Invalid request parameters",
                "Invalid JSON body or query parameter format",
            )
        });
    }
    query.map(|Query(params)| params).map_err(|_| {
        bad_parameters("query", "Invalid query parameters", "Invalid query parameter format")
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET|POST /iras/prod/Authentication/SingPassServiceAuth
pub async fn service_auth(
    State(state): State<AppState>,
    _credentials: ClientCredentials,
    method: Method,
    headers: HeaderMap,
    query: Result<Query<ServiceAuthParams>, QueryRejection>,
    body: Bytes,
) -> Response {
    // 1. Collect parameters.
    let params = match auth_params(&method, &headers, query, &body) {
        Ok(params) => params,
        Err(response) => return response,
    };

    // 2. A supplied callback must be registered.
    let callback_url = non_blank(params.callback_url);
    if callback_url
        .as_deref()
        .is_some_and(|url| !is_singpass_callback(url))
    {
        return IrasResponse::<()>::rejected(unregistered_callback()).with_status(StatusCode::OK);
    }

    // 3. Fill defaults and build the login URL.
    let callback_url = callback_url.unwrap_or_else(|| SINGPASS_DEFAULT_CALLBACK.to_string());
    let scope = non_blank(params.scope).unwrap_or_else(|| SINGPASS_DEFAULT_SCOPE.to_string());
    let auth_state = non_blank(params.state).unwrap_or_else(|| Uuid::new_v4().to_string());
    let url = singpass_auth_url(&scope, &callback_url, &auth_state);

    // 4. Persist the pending record.
    let record = CreateSingPassAuthRecord {
        auth_url: url.clone(),
        state: auth_state.clone(),
        scope,
        callback_url,
        client_id: SINGPASS_RECORD_CLIENT_ID.to_string(),
        status: SINGPASS_STATUS_PENDING.to_string(),
    };
    if let Err(err) = state.repos.singpass_auth.create(&record).await {
        return iras_store_failure(err, "singpass_service_auth");
    }

    tracing::info!(state = %auth_state, "SingPass authorisation started");
    IrasResponse::<_>::success(
        return_code::SUCCESS,
        ServiceAuthData {
            url,
            state: auth_state,
        },
    )
    .into_response()
}

/// POST /iras/prod/Authentication/SingPassServiceAuthToken
pub async fn service_auth_token(
    State(state): State<AppState>,
    _credentials: ClientCredentials,
    body: Result<Json<ServiceAuthTokenRequest>, JsonRejection>,
) -> Response {
    // 1. Parse and validate.
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if let Err(rejection) = request.validate() {
        return IrasResponse::<()>::rejected(rejection).with_status(StatusCode::OK);
    }

    // 2. The state must belong to an earlier authorisation.
    let auth_state = request.state.trim();
    let auth_record = match state.repos.singpass_auth.find_by_state(auth_state).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::debug!(state = auth_state, "Unknown SingPass state");
            return IrasResponse::<()>::rejected(Rejection::single(
                40005,
                "Invalid state",
                "state",
                "State not found or expired",
            ))
            .with_status(StatusCode::OK);
        }
        Err(err) => return iras_store_failure(err, "singpass_service_auth_token"),
    };

    // 3. Store the token and complete the authorisation together.
    let now = Utc::now();
    let token = CreateSingPassTokenRecord {
        code: request.code.trim().to_string(),
        state: auth_state.to_string(),
        access_token: singpass_access_token(now),
        token_type: SINGPASS_TOKEN_TYPE.to_string(),
        expires_in: SINGPASS_TOKEN_EXPIRES_IN,
        refresh_token: singpass_refresh_token(now),
        scope: request.scope.trim().to_string(),
        callback_url: request.callback_url.trim().to_string(),
        client_id: SINGPASS_RECORD_CLIENT_ID.to_string(),
        status: SINGPASS_TOKEN_STATUS_ACTIVE.to_string(),
    };
    let token = match state.repos.singpass_tokens.issue(auth_record.id, &token).await {
        Ok(token) => token,
        Err(err) => return iras_store_failure(err, "singpass_service_auth_token"),
    };

    tracing::info!(state = auth_state, token_id = token.id, "SingPass token issued");
    IrasResponse::<_>::success(
        return_code::SUCCESS,
        ServiceAuthTokenData {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            refresh_token: token.refresh_token,
            scope: token.scope,
        },
    )
    .into_response()
}

// ---------------------------------------------------------------------------
// Admin: auth records
// ---------------------------------------------------------------------------

/// POST /admin/singpass-auth
pub async fn create_auth_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreateSingPassAuthRecord>,
) -> AppResult<(StatusCode, Json<ApiResponse<SingPassAuthRecord>>)> {
    let row = state.repos.singpass_auth.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("SingPass auth record created successfully", row)),
    ))
}

/// GET /admin/singpass-auth
pub async fn list_auth_records(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<SingPassAuthRecord>>>> {
    let page = params.page();
    let (rows, total) = state.repos.singpass_auth.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "SingPass auth records retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/singpass-auth/{id}
pub async fn get_auth_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<SingPassAuthRecord>>> {
    let row = found(state.repos.singpass_auth.find_by_id(id).await?, AUTH_RECORD, id)?;
    Ok(Json(ApiResponse::ok("SingPass auth record retrieved successfully", row)))
}

/// GET /admin/singpass-auth/state/{state}
pub async fn get_auth_record_by_state(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(auth_state): Path<String>,
) -> AppResult<Json<ApiResponse<SingPassAuthRecord>>> {
    let row = found_by_key(
        state.repos.singpass_auth.find_by_state(&auth_state).await?,
        "SingPass auth record not found",
    )?;
    Ok(Json(ApiResponse::ok("SingPass auth record retrieved successfully", row)))
}

/// PUT /admin/singpass-auth/{id}
pub async fn update_auth_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateSingPassAuthRecord>,
) -> AppResult<Json<ApiResponse<SingPassAuthRecord>>> {
    let row = found(
        state.repos.singpass_auth.update(id, &input).await?,
        AUTH_RECORD,
        id,
    )?;
    Ok(Json(ApiResponse::ok("SingPass auth record updated successfully", row)))
}

/// DELETE /admin/singpass-auth/{id}
pub async fn delete_auth_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.singpass_auth.soft_delete(id).await?, AUTH_RECORD, id)?;
    Ok(Json(ApiResponse::done("SingPass auth record deleted successfully")))
}

// ---------------------------------------------------------------------------
// Admin: token records
// ---------------------------------------------------------------------------

/// POST /admin/singpass-tokens
pub async fn create_token_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreateSingPassTokenRecord>,
) -> AppResult<(StatusCode, Json<ApiResponse<SingPassTokenRecord>>)> {
    let row = state.repos.singpass_tokens.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("SingPass token record created successfully", row)),
    ))
}

/// GET /admin/singpass-tokens
pub async fn list_token_records(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<SingPassTokenRecord>>>> {
    let page = params.page();
    let (rows, total) = state.repos.singpass_tokens.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "SingPass token records retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/singpass-tokens/{id}
pub async fn get_token_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<SingPassTokenRecord>>> {
    let row = found(state.repos.singpass_tokens.find_by_id(id).await?, TOKEN_RECORD, id)?;
    Ok(Json(ApiResponse::ok("SingPass token record retrieved successfully", row)))
}

/// GET /admin/singpass-tokens/state/{state}
pub async fn get_token_record_by_state(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(auth_state): Path<String>,
) -> AppResult<Json<ApiResponse<SingPassTokenRecord>>> {
    let row = found_by_key(
        state.repos.singpass_tokens.find_by_state(&auth_state).await?,
        "SingPass token record not found",
    )?;
    Ok(Json(ApiResponse::ok("SingPass token record retrieved successfully", row)))
}

/// PUT /admin/singpass-tokens/{id}
pub async fn update_token_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateSingPassTokenRecord>,
) -> AppResult<Json<ApiResponse<SingPassTokenRecord>>> {
    let row = found(
        state.repos.singpass_tokens.update(id, &input).await?,
        TOKEN_RECORD,
        id,
    )?;
    Ok(Json(ApiResponse::ok("SingPass token record updated successfully", row)))
}

/// DELETE /admin/singpass-tokens/{id}
pub async fn delete_token_record(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.singpass_tokens.soft_delete(id).await?, TOKEN_RECORD, id)?;
    Ok(Json(ApiResponse::done("SingPass token record deleted successfully")))
}
