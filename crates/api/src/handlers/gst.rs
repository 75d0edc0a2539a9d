//! GST registration lookup and its admin CRUD.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iras_core::validation::{is_blank, return_code, Rejection, INVALID_FORMAT_CODE};
use iras_db::models::gst_registration::{
    CreateGstRegistration, GstRegistration, UpdateGstRegistration,
};
use serde::{Deserialize, Serialize};

use super::{deleted, found, iras_store_failure};
use crate::error::AppResult;
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_headers::ClientCredentials;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, IrasResponse, Paginated};
use crate::state::AppState;

const ENTITY: &str = "GST registration";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /iras/prod/GSTListing/SearchGSTRegistered`.
///
/// `clientID` comes from the body only; the header credentials never stand
/// in for an empty value here.
#[derive(Debug, Default, Deserialize)]
pub struct GstSearchRequest {
    #[serde(rename = "clientID", default)]
    pub client_id: String,
    #[serde(rename = "regID", default)]
    pub reg_id: String,
}

impl GstSearchRequest {
    pub fn validate(&self) -> Result<(), Rejection> {
        if is_blank(&self.client_id) {
            return Err(Rejection::single(
                40001,
                "Invalid client ID",
                "clientID",
                "Client ID is required",
            ));
        }
        if is_blank(&self.reg_id) {
            return Err(Rejection::single(
                40002,
                "Invalid registration ID",
                "regID",
                "Registration ID is required",
            ));
        }
        Ok(())
    }
}

/// Success payload. The capitalised keys are part of the published contract.
#[derive(Debug, Serialize)]
pub struct GstData {
    pub name: String,
    #[serde(rename = "gstRegistrationNumber")]
    pub gst_registration_number: String,
    #[serde(rename = "registrationId")]
    pub registration_id: String,
    #[serde(rename = "RegisteredFrom")]
    pub registered_from: String,
    #[serde(rename = "RegisteredTo")]
    pub registered_to: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl From<GstRegistration> for GstData {
    fn from(row: GstRegistration) -> Self {
        Self {
            name: row.name,
            gst_registration_number: row.gst_registration_number,
            registration_id: row.registration_id,
            registered_from: row.registered_from,
            registered_to: row.registered_to,
            remarks: row.remarks,
            status: row.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /iras/prod/GSTListing/SearchGSTRegistered
pub async fn search_gst_registered(
    State(state): State<AppState>,
    _credentials: ClientCredentials,
    body: Result<Json<GstSearchRequest>, JsonRejection>,
) -> Response {
    // 1. Parse and validate the body.
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if let Err(rejection) = request.validate() {
        tracing::debug!(code = rejection.code, "GST search rejected");
        return IrasResponse::<()>::rejected(rejection).into_response();
    }

    // 2. Look the registration up under the caller's client id.
    let row = match state
        .repos
        .gst_registrations
        .find_by_registration(request.reg_id.trim(), request.client_id.trim())
        .await
    {
        Ok(row) => row,
        Err(err) => return iras_store_failure(err, "gst_search"),
    };

    // 3. Answer 10 with the registration, or 20 when unknown.
    match row {
        Some(row) => IrasResponse::<_>::success(return_code::SUCCESS, GstData::from(row))
            .into_response(),
        None => IrasResponse::<()>::failure(
            return_code::NOT_FOUND,
            20001,
            "GST registration not found",
            Vec::new(),
        )
        .into_response(),
    }
}

/// POST /admin/gst-registrations
pub async fn create_gst_registration(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreateGstRegistration>,
) -> AppResult<(StatusCode, Json<ApiResponse<GstRegistration>>)> {
    let row = state.repos.gst_registrations.create(&input).await?;
    tracing::info!(id = row.id, registration_id = %row.registration_id, "GST registration created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("GST registration created successfully", row)),
    ))
}

/// GET /admin/gst-registrations
pub async fn list_gst_registrations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<GstRegistration>>>> {
    let page = params.page();
    let (rows, total) = state.repos.gst_registrations.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "GST registrations retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/gst-registrations/{id}
pub async fn get_gst_registration(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<GstRegistration>>> {
    let row = found(state.repos.gst_registrations.find_by_id(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok(
        "GST registration retrieved successfully",
        row,
    )))
}

/// PUT /admin/gst-registrations/{id}
pub async fn update_gst_registration(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateGstRegistration>,
) -> AppResult<Json<ApiResponse<GstRegistration>>> {
    let row = found(
        state.repos.gst_registrations.update(id, &input).await?,
        ENTITY,
        id,
    )?;
    Ok(Json(ApiResponse::ok("GST registration updated successfully", row)))
}

/// DELETE /admin/gst-registrations/{id}
pub async fn delete_gst_registration(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.gst_registrations.soft_delete(id).await?, ENTITY, id)?;
    tracing::info!(id, "GST registration deleted");
    Ok(Json(ApiResponse::done("GST registration deleted successfully")))
}
