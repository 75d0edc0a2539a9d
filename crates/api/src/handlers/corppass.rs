//! CorpPass sandbox authentication. Message codes are strings here.

use axum::extract::rejection::JsonRejection;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iras_core::oauth::{
    corppass_access_token, corppass_auth_url, corppass_refresh_token, corppass_scope,
    is_corppass_callback, CORPPASS_DEFAULT_CALLBACK, CORPPASS_DEFAULT_STATE,
    CORPPASS_TOKEN_EXPIRES_IN, UNREGISTERED_CALLBACK_CODE_STR, UNREGISTERED_CALLBACK_DETAIL,
    UNREGISTERED_CALLBACK_MESSAGE,
};
use iras_core::validation::{return_code, FieldError};
use serde::{Deserialize, Serialize};

use crate::middleware::client_headers::{ClientCredentials, MissingHeaders};
use crate::response::IrasResponse;

const MISSING_HEADERS: &str = "40003";
const INVALID_FORMAT: &str = "40004";
const INVALID_ID: &str = "40005";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CorpPassAuthQuery {
    pub scope: Option<String>,
    pub callback_url: Option<String>,
    pub state: Option<String>,
    pub tax_agent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthUrlData {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CorpPassTokenRequest {
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct CorpPassTokenData {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub refresh_token: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /iras/sb/Authentication/CorpPassAuth
///
/// Builds the CorpPass staging login URL. A `callback_url` that is supplied
/// must be one of the registered URLs; an absent one falls back to the demo
/// callback.
pub async fn corppass_auth(
    credentials: Result<ClientCredentials, MissingHeaders>,
    Query(query): Query<CorpPassAuthQuery>,
) -> Response {
    if credentials.is_err() {
        return MissingHeaders::envelope(MISSING_HEADERS).with_status(StatusCode::UNAUTHORIZED);
    }

    let callback_url = non_blank(query.callback_url);
    if let Some(url) = callback_url.as_deref() {
        if !is_corppass_callback(url) {
            tracing::debug!(callback_url = url, "Unregistered CorpPass callback");
            return IrasResponse::<(), &str>::failure(
                return_code::VALIDATION,
                UNREGISTERED_CALLBACK_CODE_STR,
                UNREGISTERED_CALLBACK_MESSAGE,
                vec![FieldError::new("callback_url", UNREGISTERED_CALLBACK_DETAIL)],
            )
            .into_response();
        }
    }

    let tax_agent = query.tax_agent.as_deref() == Some("true");
    let scope = corppass_scope(query.scope.as_deref(), tax_agent);
    let callback_url = callback_url.unwrap_or_else(|| CORPPASS_DEFAULT_CALLBACK.to_string());
    let state = non_blank(query.state).unwrap_or_else(|| CORPPASS_DEFAULT_STATE.to_string());

    let url = corppass_auth_url(&scope, &callback_url, &state);
    IrasResponse::<_, &str>::success(return_code::SUCCESS, AuthUrlData { url }).into_response()
}

/// POST /iras/sb/Authentication/CorpPassToken
pub async fn corppass_token(
    credentials: Result<ClientCredentials, MissingHeaders>,
    body: Result<Json<CorpPassTokenRequest>, JsonRejection>,
) -> Response {
    if credentials.is_err() {
        return MissingHeaders::envelope(MISSING_HEADERS).with_status(StatusCode::UNAUTHORIZED);
    }
    let Ok(Json(request)) = body else {
        return IrasResponse::<(), &str>::invalid_format(INVALID_FORMAT).into_response();
    };

    if request.id <= 0 {
        return IrasResponse::<(), &str>::failure(
            return_code::VALIDATION,
            INVALID_ID,
            "Invalid ID",
            vec![FieldError::new("id", "ID must be a positive number")],
        )
        .into_response();
    }

    tracing::info!(id = request.id, "CorpPass token issued");
    IrasResponse::<_, &str>::success(
        return_code::SUCCESS,
        CorpPassTokenData {
            access_token: corppass_access_token(request.id),
            token_type: "Bearer",
            expires_in: CORPPASS_TOKEN_EXPIRES_IN,
            refresh_token: corppass_refresh_token(request.id),
        },
    )
    .into_response()
}
