//! Rental-income submission and its admin CRUD.
//!
//! Every IRAS envelope from this endpoint nests its field list as
//! `{"fieldInfo": [...]}`, and validation failures answer HTTP 200.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use iras_core::reference::rental_reference;
use iras_core::rental::{self, RentalSubmissionRequest, STATUS_SUBMITTED};
use iras_core::validation::{return_code, INTERNAL_CODE, INVALID_FORMAT_CODE, MISSING_HEADERS_CODE};
use iras_db::models::rental_submission::{
    CreateRentalSubmission, RentalSubmission, UpdateRentalSubmission,
};
use serde::Serialize;

use super::{deleted, found, found_by_key, iras_store_failure};
use crate::error::AppResult;
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_headers::{ClientCredentials, MissingHeaders};
use crate::query::PaginationParams;
use crate::response::{ApiResponse, IrasResponse, Paginated};
use crate::state::AppState;

const ENTITY: &str = "Rental submission record";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalSubmissionData {
    pub ref_no: String,
}

/// Build the row stored for an accepted submission.
fn submission_row(
    request: &RentalSubmissionRequest,
    ref_no: String,
) -> Result<CreateRentalSubmission, serde_json::Error> {
    let info = &request.org_and_submission_info;
    Ok(CreateRentalSubmission {
        ref_no,
        assmt_year: info.assmt_year,
        authorised_person_email: info.authorised_person_email.trim().to_string(),
        authorised_person_name: info.authorised_person_name.trim().to_string(),
        development_name: info.development_name.trim().to_string(),
        submission_data: serde_json::to_string(&request.property_dtl)?,
        total_properties: i32::try_from(request.property_dtl.len()).unwrap_or(i32::MAX),
        status: STATUS_SUBMITTED.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /iras/sb/rental/Submission
pub async fn submit_rental(
    State(state): State<AppState>,
    credentials: Result<ClientCredentials, MissingHeaders>,
    body: Result<Json<RentalSubmissionRequest>, JsonRejection>,
) -> Response {
    // 1. Header gate and parse, both in the nested shape.
    if credentials.is_err() {
        return MissingHeaders::envelope(MISSING_HEADERS_CODE)
            .nested_fields()
            .with_status(StatusCode::UNAUTHORIZED);
    }
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE)
            .nested_fields()
            .with_status(StatusCode::BAD_REQUEST);
    };

    // 2. Validate. Service-level rejections still answer 200.
    if let Err(rejection) = rental::validate(&request) {
        tracing::debug!(
            code = rejection.code,
            errors = rejection.fields.len(),
            "Rental submission rejected"
        );
        return IrasResponse::<()>::rejected(rejection)
            .nested_fields()
            .with_status(StatusCode::OK);
    }

    // 3. Persist.
    let row = match submission_row(&request, rental_reference(Utc::now())) {
        Ok(row) => row,
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode rental line items");
            return IrasResponse::<()>::internal(INTERNAL_CODE).into_response();
        }
    };
    let saved = match state.repos.rental_submissions.create(&row).await {
        Ok(saved) => saved,
        Err(err) => return iras_store_failure(err, "submit_rental"),
    };

    tracing::info!(
        ref_no = %saved.ref_no,
        total_properties = saved.total_properties,
        "Rental submission stored"
    );
    IrasResponse::<_>::success(
        return_code::SUCCESS_ZERO,
        RentalSubmissionData {
            ref_no: saved.ref_no,
        },
    )
    .into_response()
}

/// POST /admin/rental-submissions
pub async fn create_rental_submission(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreateRentalSubmission>,
) -> AppResult<(StatusCode, Json<ApiResponse<RentalSubmission>>)> {
    let row = state.repos.rental_submissions.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Rental submission record created successfully",
            row,
        )),
    ))
}

/// GET /admin/rental-submissions
pub async fn list_rental_submissions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<RentalSubmission>>>> {
    let page = params.page();
    let (rows, total) = state.repos.rental_submissions.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "Rental submission records retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/rental-submissions/{id}
pub async fn get_rental_submission(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<RentalSubmission>>> {
    let row = found(state.repos.rental_submissions.find_by_id(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok(
        "Rental submission record retrieved successfully",
        row,
    )))
}

/// GET /admin/rental-submissions/ref/{ref_no}
pub async fn get_rental_submission_by_ref(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(ref_no): Path<String>,
) -> AppResult<Json<ApiResponse<RentalSubmission>>> {
    let row = found_by_key(
        state.repos.rental_submissions.find_by_ref_no(&ref_no).await?,
        "Rental submission record not found",
    )?;
    Ok(Json(ApiResponse::ok(
        "Rental submission record retrieved successfully",
        row,
    )))
}

/// PUT /admin/rental-submissions/{id}
pub async fn update_rental_submission(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateRentalSubmission>,
) -> AppResult<Json<ApiResponse<RentalSubmission>>> {
    let row = found(
        state.repos.rental_submissions.update(id, &input).await?,
        ENTITY,
        id,
    )?;
    Ok(Json(ApiResponse::ok(
        "Rental submission record updated successfully",
        row,
    )))
}

/// DELETE /admin/rental-submissions/{id}
pub async fn delete_rental_submission(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.rental_submissions.soft_delete(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::done(
        "Rental submission record deleted successfully",
    )))
}
