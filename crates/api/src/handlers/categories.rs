//! Admin CRUD for product categories.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use iras_core::error::CoreError;
use iras_db::models::category::{Category, CreateCategory, UpdateCategory};

use super::{deleted, found};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, Paginated};
use crate::state::AppState;

const ENTITY: &str = "Category";

/// POST /admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    let category = state.repos.categories.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Category created successfully", category)),
    ))
}

/// GET /admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Category>>>> {
    let page = params.page();
    let (categories, total) = state.repos.categories.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "Categories retrieved successfully",
        Paginated::new(categories, total, &page),
    )))
}

/// GET /admin/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = found(state.repos.categories.find_by_id(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("Category retrieved successfully", category)))
}

/// PUT /admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateCategory>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = found(state.repos.categories.update(id, &input).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("Category updated successfully", category)))
}

/// DELETE /admin/categories/{id}
///
/// Refused with 409 while live products still reference the category.
pub async fn delete_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    // 1. The category must exist.
    found(state.repos.categories.find_by_id(id).await?, ENTITY, id)?;

    // 2. It must be empty.
    if state.repos.products.count_by_category(id).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "cannot delete category with existing products".into(),
        )));
    }

    // 3. Soft-delete it.
    deleted(state.repos.categories.soft_delete(id).await?, ENTITY, id)?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(Json(ApiResponse::done("Category deleted successfully")))
}
