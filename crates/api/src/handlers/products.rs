//! Admin CRUD for products. Lists embed the category name.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use iras_db::models::product::{CreateProduct, Product, UpdateProduct};

use super::{deleted, found};
use crate::error::AppResult;
use crate::extract::{AppJson, IdPath};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, Paginated};
use crate::state::AppState;

const ENTITY: &str = "Product";

/// POST /admin/products
///
/// The owner is the authenticated user. The demo identity has no user row,
/// so its products are stored without an owner.
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(mut input): AppJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    input.user_id = (!auth.is_demo).then_some(auth.user_id);
    let product = state.repos.products.create(&input).await?;
    tracing::info!(product_id = product.id, category_id = product.category_id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Product created successfully", product)),
    ))
}

/// GET /admin/products
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Product>>>> {
    let page = params.page();
    let (products, total) = state.repos.products.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "Products retrieved successfully",
        Paginated::new(products, total, &page),
    )))
}

/// GET /admin/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = found(state.repos.products.find_by_id(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("Product retrieved successfully", product)))
}

/// PUT /admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = found(state.repos.products.update(id, &input).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("Product updated successfully", product)))
}

/// DELETE /admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    deleted(state.repos.products.soft_delete(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::done("Product deleted successfully")))
}
