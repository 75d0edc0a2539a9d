//! Property tax: consolidated statements, balance search and their admin CRUD.
//!
//! A lookup miss is answered from the sandbox demo builders in development
//! and with `returnCode` 20 in production.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use iras_core::property::{
    decode_statement, demo_consolidated_statement, demo_tax_balance, yes_no,
    ConsolidatedStatement, ConsolidatedStatementRequest, TaxBalance, TaxBalanceSearchRequest,
};
use iras_core::stamp_duty::format_amount;
use iras_core::validation::{return_code, INVALID_FORMAT_CODE};
use iras_db::models::property_statement::{
    CreatePropertyStatement, PropertyStatement, UpdatePropertyStatement,
};
use iras_db::models::property_tax_balance::{
    CreatePropertyTaxBalance, PropertyTaxBalance, TaxBalanceFilter, UpdatePropertyTaxBalance,
};
use serde::Serialize;

use super::{deleted, found, iras_store_failure};
use crate::error::AppResult;
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_headers::ClientCredentials;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, IrasResponse, Paginated};
use crate::state::AppState;

const STATEMENT: &str = "Property consolidated statement record";
const BALANCE: &str = "Property tax balance record";

const NOT_FOUND_CODE: i32 = 20001;
const CORRUPT_STATEMENT_CODE: i32 = 50002;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementData {
    pub ref_no: String,
    pub property_tax_ref: String,
    pub consolidated_statement: ConsolidatedStatement,
}

fn filter_for(request: &TaxBalanceSearchRequest) -> TaxBalanceFilter {
    let key = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    TaxBalanceFilter {
        client_id: request.client_id.trim().to_string(),
        property_tax_ref: key(&request.property_tax_ref),
        owner_tax_ref: key(&request.owner_tax_ref),
        postal_code: key(&request.postal_code),
        blk_house_no: key(&request.blk_house_no),
        street_name: key(&request.street_name),
        storey_no: key(&request.storey_no),
        unit_no: key(&request.unit_no),
    }
}

fn tax_balance_from_row(row: PropertyTaxBalance) -> TaxBalance {
    let address = TaxBalanceSearchRequest {
        client_id: row.client_id,
        property_tax_ref: None,
        owner_tax_ref: None,
        postal_code: row.postal_code,
        blk_house_no: row.blk_house_no,
        street_name: row.street_name,
        storey_no: row.storey_no,
        unit_no: row.unit_no,
    }
    .address()
    .unwrap_or_default();

    TaxBalance {
        property_tax_ref: row.property_tax_ref.unwrap_or_default(),
        owner_tax_ref: row.owner_tax_ref.unwrap_or_default(),
        address,
        outstanding_balance: format_amount(row.outstanding_balance),
        giro_payment: yes_no(row.giro_payment),
    }
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /iras/sb/PropertyConsolidatedStatement/retrieve
pub async fn retrieve_consolidated_statement(
    State(state): State<AppState>,
    _credentials: ClientCredentials,
    body: Result<Json<ConsolidatedStatementRequest>, JsonRejection>,
) -> Response {
    // 1. Parse and validate.
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if let Err(rejection) = request.validate() {
        return IrasResponse::<()>::rejected(rejection).into_response();
    }
    let ref_no = request.ref_no.trim();
    let property_tax_ref = request.property_tax_ref.trim();

    // 2. Look up the stored statement.
    let row = match state
        .repos
        .property_statements
        .find_by_ref(ref_no, property_tax_ref)
        .await
    {
        Ok(row) => row,
        Err(err) => return iras_store_failure(err, "retrieve_consolidated_statement"),
    };

    // 3. Decode it, or fall back to the demo statement.
    let statement = match row {
        Some(row) => match decode_statement(&row.consolidated_data) {
            Ok(statement) => statement,
            Err(err) => {
                tracing::error!(
                    id = row.id,
                    error = %err,
                    "Stored consolidated statement is corrupt"
                );
                return IrasResponse::<()>::failure(
                    return_code::INTERNAL,
                    CORRUPT_STATEMENT_CODE,
                    "Error parsing consolidated data",
                    Vec::new(),
                )
                .into_response();
            }
        },
        None if state.config.is_development() => {
            tracing::info!(ref_no, property_tax_ref, "Serving demo consolidated statement");
            demo_consolidated_statement(Utc::now().date_naive())
        }
        None => {
            return IrasResponse::<()>::failure(
                return_code::NOT_FOUND,
                NOT_FOUND_CODE,
                "Consolidated statement not found",
                Vec::new(),
            )
            .into_response();
        }
    };

    IrasResponse::<_>::success(
        return_code::SUCCESS_ZERO,
        StatementData {
            ref_no: ref_no.to_string(),
            property_tax_ref: property_tax_ref.to_string(),
            consolidated_statement: statement,
        },
    )
    .into_response()
}

/// POST /iras/sb/PTTaxBal/PtyTaxBalSearch
pub async fn search_tax_balance(
    State(state): State<AppState>,
    _credentials: ClientCredentials,
    body: Result<Json<TaxBalanceSearchRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if let Err(rejection) = request.validate() {
        return IrasResponse::<()>::rejected(rejection).into_response();
    }

    let row = match state
        .repos
        .property_tax_balances
        .search(&filter_for(&request))
        .await
    {
        Ok(row) => row,
        Err(err) => return iras_store_failure(err, "search_tax_balance"),
    };

    let balance = match row {
        Some(row) => tax_balance_from_row(row),
        None if state.config.is_development() => {
            tracing::info!(client_id = %request.client_id, "Serving demo tax balance");
            demo_tax_balance(&request)
        }
        None => {
            return IrasResponse::<()>::failure(
                return_code::NOT_FOUND,
                NOT_FOUND_CODE,
                "Property tax balance not found",
                Vec::new(),
            )
            .into_response();
        }
    };

    IrasResponse::<_>::success(return_code::SUCCESS_ZERO, balance).into_response()
}

// ---------------------------------------------------------------------------
// Admin: consolidated statements
// ---------------------------------------------------------------------------

/// POST /admin/property-statements
pub async fn create_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreatePropertyStatement>,
) -> AppResult<(StatusCode, Json<ApiResponse<PropertyStatement>>)> {
    let row = state.repos.property_statements.create(&input).await?;
    tracing::info!(id = row.id, ref_no = %row.ref_no, "Property statement created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Property consolidated statement record created successfully",
            row,
        )),
    ))
}

/// GET /admin/property-statements
pub async fn list_statements(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<PropertyStatement>>>> {
    let page = params.page();
    let (rows, total) = state.repos.property_statements.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "Property consolidated statement records retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/property-statements/{id}
pub async fn get_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<PropertyStatement>>> {
    let row = found(state.repos.property_statements.find_by_id(id).await?, STATEMENT, id)?;
    Ok(Json(ApiResponse::ok(
        "Property consolidated statement record retrieved successfully",
        row,
    )))
}

/// PUT /admin/property-statements/{id}
pub async fn update_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdatePropertyStatement>,
) -> AppResult<Json<ApiResponse<PropertyStatement>>> {
    let row = found(
        state.repos.property_statements.update(id, &input).await?,
        STATEMENT,
        id,
    )?;
    Ok(Json(ApiResponse::ok(
        "Property consolidated statement record updated successfully",
        row,
    )))
}

/// DELETE /admin/property-statements/{id}
pub async fn delete_statement(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.property_statements.soft_delete(id).await?, STATEMENT, id)?;
    Ok(Json(ApiResponse::done(
        "Property consolidated statement record deleted successfully",
    )))
}

// ---------------------------------------------------------------------------
// Admin: tax balances
// ---------------------------------------------------------------------------

/// POST /admin/property-tax-balances
pub async fn create_tax_balance(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreatePropertyTaxBalance>,
) -> AppResult<(StatusCode, Json<ApiResponse<PropertyTaxBalance>>)> {
    let row = state.repos.property_tax_balances.create(&input).await?;
    tracing::info!(id = row.id, client_id = %row.client_id, "Property tax balance created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Property tax balance record created successfully",
            row,
        )),
    ))
}

/// GET /admin/property-tax-balances
pub async fn list_tax_balances(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<PropertyTaxBalance>>>> {
    let page = params.page();
    let (rows, total) = state.repos.property_tax_balances.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "Property tax balance records retrieved successfully",
        Paginated::new(rows, total, &page),
    )))
}

/// GET /admin/property-tax-balances/{id}
pub async fn get_tax_balance(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<PropertyTaxBalance>>> {
    let row = found(state.repos.property_tax_balances.find_by_id(id).await?, BALANCE, id)?;
    Ok(Json(ApiResponse::ok(
        "Property tax balance record retrieved successfully",
        row,
    )))
}

/// PUT /admin/property-tax-balances/{id}
pub async fn update_tax_balance(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdatePropertyTaxBalance>,
) -> AppResult<Json<ApiResponse<PropertyTaxBalance>>> {
    let row = found(
        state.repos.property_tax_balances.update(id, &input).await?,
        BALANCE,
        id,
    )?;
    Ok(Json(ApiResponse::ok(
        "Property tax balance record updated successfully",
        row,
    )))
}

/// DELETE /admin/property-tax-balances/{id}
pub async fn delete_tax_balance(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.property_tax_balances.soft_delete(id).await?, BALANCE, id)?;
    Ok(Json(ApiResponse::done(
        "Property tax balance record deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_blank_keys() {
        let request = TaxBalanceSearchRequest {
            client_id: " C1 ".into(),
            property_tax_ref: Some("P1".into()),
            postal_code: Some("   ".into()),
            ..TaxBalanceSearchRequest::default()
        };
        let filter = filter_for(&request);
        assert_eq!(filter.client_id, "C1");
        assert_eq!(filter.property_tax_ref.as_deref(), Some("P1"));
        assert!(filter.postal_code.is_none());
    }
}
