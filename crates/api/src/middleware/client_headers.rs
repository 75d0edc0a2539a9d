//! IBM API-gateway header gate for IRAS endpoints.
//!
//! Every IRAS endpoint requires `X-IBM-Client-Id` and `X-IBM-Client-Secret`.
//! In development, missing values are filled from the configured demo
//! credentials. Rejections answer in the IRAS envelope with HTTP 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use iras_core::validation::{return_code, FieldError, MISSING_HEADERS_CODE};

use crate::response::IrasResponse;
use crate::state::AppState;

pub const CLIENT_ID_HEADER: &str = "x-ibm-client-id";
pub const CLIENT_SECRET_HEADER: &str = "x-ibm-client-secret";
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

/// Stand-in CorpPass token accepted by eStamp in development.
pub const DEMO_ACCESS_TOKEN: &str = "demo_access_token_123456";

const ACCESS_TOKEN_CODE: i32 = 40004;

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Client credentials
// ---------------------------------------------------------------------------

/// The caller's API-gateway credentials.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Rejection for [`ClientCredentials`].
///
/// Renders with the integer message code `40003`. CorpPass, which publishes
/// string codes, takes `Result<ClientCredentials, MissingHeaders>` and
/// renders [`MissingHeaders::envelope`] itself.
#[derive(Debug)]
pub struct MissingHeaders;

impl MissingHeaders {
    pub fn envelope<C>(message_code: C) -> IrasResponse<(), C> {
        IrasResponse::failure(
            return_code::VALIDATION,
            message_code,
            "Missing required headers",
            vec![FieldError::new(
                "headers",
                "X-IBM-Client-Id and X-IBM-Client-Secret are required",
            )],
        )
    }
}

impl IntoResponse for MissingHeaders {
    fn into_response(self) -> Response {
        MissingHeaders::envelope(MISSING_HEADERS_CODE).with_status(StatusCode::UNAUTHORIZED)
    }
}

impl FromRequestParts<AppState> for ClientCredentials {
    type Rejection = MissingHeaders;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut client_id = header_value(&parts.headers, CLIENT_ID_HEADER);
        let mut client_secret = header_value(&parts.headers, CLIENT_SECRET_HEADER);

        if state.config.is_development() {
            client_id.get_or_insert_with(|| state.config.ibm_client_id.clone());
            client_secret.get_or_insert_with(|| state.config.ibm_client_secret.clone());
        }

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Ok(ClientCredentials {
                    client_id,
                    client_secret,
                })
            }
            _ => {
                tracing::debug!(uri = %parts.uri, "Missing client credential headers");
                Err(MissingHeaders)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CorpPass access token (eStamp)
// ---------------------------------------------------------------------------

/// The CorpPass `access_token` header required by eStamp endpoints.
#[derive(Debug, Clone)]
pub struct CorpPassAccessToken(pub String);

#[derive(Debug)]
pub struct MissingAccessToken;

impl IntoResponse for MissingAccessToken {
    fn into_response(self) -> Response {
        IrasResponse::<()>::failure(
            return_code::VALIDATION,
            ACCESS_TOKEN_CODE,
            "Missing access token",
            vec![FieldError::new(
                ACCESS_TOKEN_HEADER,
                "CorpPass access token is required",
            )],
        )
        .with_status(StatusCode::UNAUTHORIZED)
    }
}

impl FromRequestParts<AppState> for CorpPassAccessToken {
    type Rejection = MissingAccessToken;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match header_value(&parts.headers, ACCESS_TOKEN_HEADER) {
            Some(token) => Ok(CorpPassAccessToken(token)),
            None if state.config.is_development() => {
                Ok(CorpPassAccessToken(DEMO_ACCESS_TOKEN.to_string()))
            }
            None => Err(MissingAccessToken),
        }
    }
}
