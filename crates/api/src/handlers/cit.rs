//! Corporate income tax Form CS conversion and its admin CRUD.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use iras_core::reference::{cit_conversion_id, DISPLAY_TIMESTAMP_FORMAT};
use iras_core::validation::{return_code, Rejection, INVALID_FORMAT_CODE};
use iras_db::models::cit_conversion::{
    CitConversion, CreateCitConversion, UpdateCitConversion,
};
use serde::{Deserialize, Serialize};

use super::{deleted, found, found_by_key, iras_store_failure};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_headers::ClientCredentials;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, IrasResponse, Paginated};
use crate::state::AppState;

const ENTITY: &str = "CIT conversion record";
const STATUS_COMPLETED: &str = "completed";
const PROCESSED_BY: &str = "IRAS_CIT_SYSTEM";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ConvertFormCsRequest {
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionData {
    #[serde(rename = "conversionID")]
    pub conversion_id: String,
    pub status: String,
    pub conversion_date: String,
    pub processed_by: String,
    pub conversion_result: String,
}

impl From<CitConversion> for ConversionData {
    fn from(row: CitConversion) -> Self {
        Self {
            conversion_id: row.conversion_id,
            status: row.status,
            conversion_date: row.conversion_date,
            processed_by: row.processed_by,
            conversion_result: row.conversion_result,
        }
    }
}

fn new_conversion(id: i64) -> CreateCitConversion {
    let now = Utc::now();
    CreateCitConversion {
        conversion_id: cit_conversion_id(now),
        request_id: id,
        client_id: id.to_string(),
        status: STATUS_COMPLETED.to_string(),
        conversion_date: now.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        processed_by: PROCESSED_BY.to_string(),
        conversion_result: format!("Form CS conversion completed for ID: {id}"),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /iras/prod/ct/convertformcs
///
/// Idempotent per request id: a repeat call returns the stored conversion.
pub async fn convert_form_cs(
    State(state): State<AppState>,
    _credentials: ClientCredentials,
    body: Result<Json<ConvertFormCsRequest>, JsonRejection>,
) -> Response {
    // 1. Parse and validate. Rejections answer 200.
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if request.id <= 0 {
        return IrasResponse::<()>::rejected(Rejection::single(
            40001,
            "Invalid ID",
            "id",
            "ID must be greater than 0",
        ))
        .with_status(StatusCode::OK);
    }

    // 2. Return an earlier conversion for the same request id.
    // Read-then-write: two concurrent first calls can both miss here. The
    // unique index on conversion_id does not cover request_id.
    let repo = &state.repos.cit_conversions;
    let existing = match repo.find_by_request_id(request.id).await {
        Ok(existing) => existing,
        Err(err) => return iras_store_failure(err, "convert_form_cs"),
    };
    if let Some(row) = existing {
        tracing::debug!(
            request_id = request.id,
            conversion_id = %row.conversion_id,
            "Returning existing conversion"
        );
        return IrasResponse::<_>::success(return_code::SUCCESS, ConversionData::from(row))
            .into_response();
    }

    // 3. Record a new conversion.
    let row = match repo.create(&new_conversion(request.id)).await {
        Ok(row) => row,
        Err(err) => return iras_store_failure(err, "convert_form_cs"),
    };
    tracing::info!(
        request_id = request.id,
        conversion_id = %row.conversion_id,
        "Form CS converted"
    );
    IrasResponse::<_>::success(return_code::SUCCESS, ConversionData::from(row)).into_response()
}

/// POST /admin/cit-conversions
pub async fn create_cit_conversion(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreateCitConversion>,
) -> AppResult<(StatusCode, Json<ApiResponse<CitConversion>>)> {
    let row = state.repos.cit_conversions.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("CIT conversion record created successfully", row)),
    ))
}

/// GET /admin/cit-conversions
pub async fn list_cit_conversions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<CitConversion>>>> {
    let page = params.page();
    let (rows, total) = state.repos.cit_conversions.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "CIT conversion records retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/cit-conversions/{id}
pub async fn get_cit_conversion(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<CitConversion>>> {
    let row = found(state.repos.cit_conversions.find_by_id(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("CIT conversion record retrieved successfully", row)))
}

/// GET /admin/cit-conversions/conversion/{conversion_id}
pub async fn get_by_conversion_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(conversion_id): Path<String>,
) -> AppResult<Json<ApiResponse<CitConversion>>> {
    let row = found_by_key(
        state
            .repos
            .cit_conversions
            .find_by_conversion_id(&conversion_id)
            .await?,
        "CIT conversion record not found",
    )?;
    Ok(Json(ApiResponse::ok("CIT conversion record retrieved successfully", row)))
}

/// GET /admin/cit-conversions/request/{request_id}
pub async fn get_by_request_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw): Path<String>,
) -> AppResult<Json<ApiResponse<CitConversion>>> {
    let request_id: i64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid request ID format".to_string()))?;
    let row = found_by_key(
        state.repos.cit_conversions.find_by_request_id(request_id).await?,
        "CIT conversion record not found",
    )?;
    Ok(Json(ApiResponse::ok("CIT conversion record retrieved successfully", row)))
}

/// PUT /admin/cit-conversions/{id}
pub async fn update_cit_conversion(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateCitConversion>,
) -> AppResult<Json<ApiResponse<CitConversion>>> {
    let row = found(
        state.repos.cit_conversions.update(id, &input).await?,
        ENTITY,
        id,
    )?;
    Ok(Json(ApiResponse::ok("CIT conversion record updated successfully", row)))
}

/// DELETE /admin/cit-conversions/{id}
pub async fn delete_cit_conversion(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.cit_conversions.soft_delete(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::done("CIT conversion record deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversion_fields() {
        let row = new_conversion(42);
        assert!(row.conversion_id.starts_with("CIT"));
        assert_eq!(row.conversion_id.len(), 23);
        assert_eq!(row.request_id, 42);
        assert_eq!(row.client_id, "42");
        assert_eq!(row.status, "completed");
        assert_eq!(row.processed_by, "IRAS_CIT_SYSTEM");
        assert_eq!(row.conversion_result, "Form CS conversion completed for ID: 42");
        assert_eq!(row.conversion_date.len(), 19);
    }
}
