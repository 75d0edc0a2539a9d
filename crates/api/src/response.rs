//! Response envelopes.
//!
//! Two families coexist:
//!
//! - [`IrasResponse`] mirrors the tax-authority contract:
//!   `{returnCode, data?, info?: {message, messageCode, fieldInfoList?}}`.
//!   The message code is an integer for most endpoints and a string for
//!   CorpPass and AIS, so the envelope is generic over it.
//! - [`ApiResponse`] is the internal `{success, message, data?, error?}`
//!   envelope used by auth and admin endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iras_core::pagination::Page;
use iras_core::validation::{http_status_for, return_code, FieldError, Rejection};
use serde::Serialize;

// ---------------------------------------------------------------------------
// IRAS envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrasResponse<T, C = i32> {
    pub return_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<IrasInfo<C>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrasInfo<C> {
    pub message: String,
    pub message_code: C,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_info_list: Option<FieldInfoList>,
}

/// Field errors are a flat list everywhere except rental submission, which
/// nests them as `{"fieldInfo": [...]}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FieldInfoList {
    Flat(Vec<FieldError>),
    Nested {
        #[serde(rename = "fieldInfo")]
        field_info: Vec<FieldError>,
    },
}

impl<T, C> IrasResponse<T, C> {
    pub fn success(return_code: i32, data: T) -> Self {
        Self {
            return_code,
            data: Some(data),
            info: None,
        }
    }

    pub fn failure(
        return_code: i32,
        message_code: C,
        message: impl Into<String>,
        fields: Vec<FieldError>,
    ) -> Self {
        let field_info_list = if fields.is_empty() {
            None
        } else {
            Some(FieldInfoList::Flat(fields))
        };
        Self {
            return_code,
            data: None,
            info: Some(IrasInfo {
                message: message.into(),
                message_code,
                field_info_list,
            }),
        }
    }

    /// A failed validation check (`returnCode` 40).
    pub fn rejected(rejection: Rejection<C>) -> Self {
        Self::failure(
            return_code::VALIDATION,
            rejection.code,
            rejection.message,
            rejection.fields,
        )
    }

    /// An unparsable request body (`returnCode` 40, field `body`).
    pub fn invalid_format(message_code: C) -> Self {
        Self::failure(
            return_code::VALIDATION,
            message_code,
            "Invalid request format",
            vec![FieldError::new("body", "Invalid JSON format")],
        )
    }

    /// A store or serialization failure (`returnCode` 50, no field list).
    pub fn internal(message_code: C) -> Self {
        Self::failure(
            return_code::INTERNAL,
            message_code,
            "Internal server error",
            Vec::new(),
        )
    }

    /// Switch the field list to the nested `{fieldInfo: [...]}` shape.
    pub fn nested_fields(mut self) -> Self {
        if let Some(info) = self.info.as_mut() {
            if let Some(FieldInfoList::Flat(fields)) = info.field_info_list.take() {
                info.field_info_list = Some(FieldInfoList::Nested { field_info: fields });
            }
        }
        self
    }
}

impl<T: Serialize, C: Serialize> IrasResponse<T, C> {
    /// Render with an explicit HTTP status instead of the one derived from
    /// `returnCode`.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// The HTTP status follows the `returnCode`: success 200, not found 404,
/// validation 400, anything else 500.
impl<T: Serialize, C: Serialize> IntoResponse for IrasResponse<T, C> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(http_status_for(self.return_code))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.with_status(status)
    }
}

// ---------------------------------------------------------------------------
// Internal envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with nothing but a message.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

/// One page of a list endpoint, carried inside [`ApiResponse::data`].
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: &Page) -> Self {
        Self {
            data,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages(total),
        }
    }
}
