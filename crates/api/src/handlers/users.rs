//! Admin-only user management.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use iras_core::error::CoreError;
use iras_core::roles::{ROLE_ADMIN, ROLE_USER};
use iras_db::models::user::{CreateUser, UpdateUser, User};
use serde::Deserialize;
use validator::Validate;

use super::auth::{ensure_available, validate};
use super::{deleted, found};
use crate::auth::password::hash_for_storage;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, IdPath};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{ApiResponse, Paginated};
use crate::state::AppState;

const ENTITY: &str = "User";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    /// Defaults to `user`.
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn check_role(role: &str) -> AppResult<()> {
    if role == ROLE_ADMIN || role == ROLE_USER {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "role must be '{ROLE_ADMIN}' or '{ROLE_USER}'"
        ))))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<User>>>> {
    let page = params.page();
    let (users, total) = state.repos.users.list(&page).await?;
    Ok(Json(ApiResponse::ok(
        "Users retrieved successfully",
        Paginated::new(users, total, &page),
    )))
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    validate(&input)?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    check_role(&role)?;
    ensure_available(
        &state,
        "User creation failed",
        Some(&input.username),
        Some(&input.email),
        None,
    )
    .await?;

    let user = state
        .repos
        .users
        .create(&CreateUser {
            name: input.name,
            username: input.username,
            email: input.email,
            password_hash: hash_for_storage(&input.password)?,
            role,
        })
        .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created successfully", user)),
    ))
}

/// GET /admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = found(state.repos.users.find_by_id(id).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("User retrieved successfully", user)))
}

/// PUT /admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    validate(&input)?;
    if let Some(role) = input.role.as_deref() {
        check_role(role)?;
    }
    ensure_available(
        &state,
        "User update failed",
        None,
        input.email.as_deref(),
        Some(id),
    )
    .await?;

    let patch = UpdateUser {
        name: input.name,
        email: input.email,
        password_hash: input.password.as_deref().map(hash_for_storage).transpose()?,
        role: input.role,
        is_active: input.is_active,
    };
    let user = found(state.repos.users.update(id, &patch).await?, ENTITY, id)?;
    Ok(Json(ApiResponse::ok("User updated successfully", user)))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "cannot delete your own account".into(),
        )));
    }
    deleted(state.repos.users.soft_delete(id).await?, ENTITY, id)?;
    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(Json(ApiResponse::done("User deleted successfully")))
}

/// PUT /admin/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> AppResult<Json<ApiResponse<User>>> {
    let patch = UpdateUser {
        is_active: Some(false),
        ..UpdateUser::default()
    };
    let user = found(state.repos.users.update(id, &patch).await?, ENTITY, id)?;
    tracing::info!(user_id = id, "User deactivated");
    Ok(Json(ApiResponse::ok("User deactivated successfully", user)))
}
