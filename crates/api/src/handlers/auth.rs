//! Handlers for the `/auth` resource (register, login, demo token, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use iras_core::roles::{ROLE_ADMIN, ROLE_USER};
use iras_core::types::DbId;
use iras_db::models::user::{CreateUser, UpdateUser, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::{check_login, hash_for_storage};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::{AuthUser, DEMO_EMAIL, DEMO_USERNAME, DEMO_USER_ID};
use crate::response::ApiResponse;
use crate::state::AppState;

const DEMO_NAME: &str = "Demo User";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Request body for `POST /auth/login`. `username` may also be an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `PUT /auth/profile`. Role and status are not editable here.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

/// Public user info returned by login, demo token and profile.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

impl UserInfo {
    fn demo() -> Self {
        Self {
            id: DEMO_USER_ID,
            name: DEMO_NAME.to_string(),
            username: DEMO_USERNAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            role: ROLE_ADMIN.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user_info: UserInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    // 1. Field rules.
    validate(&input)?;

    // 2. Username and email must be free.
    ensure_available(
        &state,
        "Registration failed",
        Some(&input.username),
        Some(&input.email),
        None,
    )
    .await?;

    // 3. Hash and insert.
    let user = state
        .repos
        .users
        .create(&CreateUser {
            name: input.name,
            username: input.username,
            email: input.email,
            password_hash: hash_for_storage(&input.password)?,
            role: ROLE_USER.to_string(),
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully", user)),
    ))
}

/// POST /auth/login
///
/// Authenticate with username (or email) and password.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    // 1. Find the account.
    let user = state
        .repos
        .users
        .find_by_login(input.username.trim())
        .await?
        .ok_or_else(|| auth_failed("invalid credentials"))?;

    // 2. Reject deactivated accounts.
    if !user.is_active {
        return Err(auth_failed("account is deactivated"));
    }

    // 3. Verify the password.
    if !check_login(&input.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login rejected");
        return Err(auth_failed("invalid credentials"));
    }

    // 4. Issue the token.
    let token = issue_token(
        &state,
        TokenSubject {
            user_id: user.id,
            username: &user.username,
            email: &user.email,
            role: &user.role,
        },
    )?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            token,
            expires_in: state.config.jwt.expires_in_secs(),
            user_info: user.into(),
        },
    )))
}

/// GET /auth/demo-token
///
/// Signed JWT for the demo identity. Development only.
pub async fn demo_token(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    if !state.config.is_development() {
        return Err(AppError::Detailed {
            status: StatusCode::FORBIDDEN,
            message: "Demo tokens only available in development",
            detail: "FORBIDDEN".to_string(),
        });
    }

    let user_info = UserInfo::demo();
    let token = issue_token(
        &state,
        TokenSubject {
            user_id: user_info.id,
            username: &user_info.username,
            email: &user_info.email,
            role: &user_info.role,
        },
    )?;

    Ok(Json(ApiResponse::ok(
        "Demo token generated",
        LoginResponse {
            token,
            expires_in: state.config.jwt.expires_in_secs(),
            user_info,
        },
    )))
}

/// GET /auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let info = if auth.is_demo {
        UserInfo::demo()
    } else {
        state
            .repos
            .users
            .find_by_id(auth.user_id)
            .await?
            .map(UserInfo::from)
            .ok_or_else(user_not_found)?
    };
    Ok(Json(ApiResponse::ok("Profile retrieved successfully", info)))
}

/// PUT /auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    validate(&input)?;
    ensure_available(
        &state,
        "Profile update failed",
        None,
        input.email.as_deref(),
        Some(auth.user_id),
    )
    .await?;

    let patch = UpdateUser {
        name: input.name,
        email: input.email,
        password_hash: input.password.as_deref().map(hash_for_storage).transpose()?,
        role: None,
        is_active: None,
    };
    let user = state
        .repos
        .users
        .update(auth.user_id, &patch)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(ApiResponse::ok("Profile updated successfully", user.into())))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_failed(detail: &str) -> AppError {
    AppError::Detailed {
        status: StatusCode::UNAUTHORIZED,
        message: "Authentication failed",
        detail: detail.to_string(),
    }
}

fn user_not_found() -> AppError {
    AppError::Detailed {
        status: StatusCode::NOT_FOUND,
        message: "User not found",
        detail: "NOT_FOUND".to_string(),
    }
}

/// Run `validator` rules, answering 400 "Validation failed" with the details.
pub(crate) fn validate<T: Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(|errors| AppError::Detailed {
        status: StatusCode::BAD_REQUEST,
        message: "Validation failed",
        detail: errors.to_string(),
    })
}

/// Fail with 409 `message` when `username` or `email` already belongs to
/// another user. `except` is the caller's own id on updates.
pub(crate) async fn ensure_available(
    state: &AppState,
    message: &'static str,
    username: Option<&str>,
    email: Option<&str>,
    except: Option<DbId>,
) -> AppResult<()> {
    let taken = |user: Option<User>| user.is_some_and(|u| Some(u.id) != except);

    if let Some(username) = username {
        if taken(state.repos.users.find_by_username(username).await?) {
            return Err(conflict(message, "username already exists"));
        }
    }
    if let Some(email) = email {
        if taken(state.repos.users.find_by_email(email).await?) {
            return Err(conflict(message, "email already exists"));
        }
    }
    Ok(())
}

fn conflict(message: &'static str, detail: &str) -> AppError {
    AppError::Detailed {
        status: StatusCode::CONFLICT,
        message,
        detail: detail.to_string(),
    }
}

fn issue_token(state: &AppState, subject: TokenSubject<'_>) -> AppResult<String> {
    generate_access_token(subject, &state.config.jwt).map_err(|e| {
        tracing::error!(error = %e, user_id = subject.user_id, "Token generation failed");
        AppError::Detailed {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to generate token",
            detail: "INTERNAL_ERROR".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rules() {
        let ok = RegisterRequest {
            name: "Tan Ah Kow".into(),
            username: "ahkow".into(),
            email: "ahkow@example.com".into(),
            password: "secret1".into(),
        };
        assert!(ok.validate().is_ok());

        let short = RegisterRequest {
            username: "ak".into(),
            password: "123".into(),
            ..ok
        };
        let errors = short.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn profile_patch_checks_only_present_fields() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let bad_email = UpdateProfileRequest {
            email: Some("not-an-email".into()),
            ..UpdateProfileRequest::default()
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn demo_info_is_admin() {
        let info = UserInfo::demo();
        assert_eq!(info.id, 999);
        assert_eq!(info.role, "admin");
        assert_eq!(info.name, "Demo User");
    }
}
