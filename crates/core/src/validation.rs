//! Field-level validation primitives shared by every IRAS endpoint.
//!
//! A failed check yields a [`Rejection`]: the message shown in `info.message`,
//! a per-reason message code, and one or more [`FieldError`]s. Most endpoints
//! stop at the first failing check; rental submission collects one error per
//! bad line item (see [`crate::rental`]).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `returnCode` values used across the IRAS envelope family.
///
/// Success codes differ per endpoint family and are kept as-is.
pub mod return_code {
    /// Success for GST, CorpPass, eStamp, SD calculators, AIS, CIT and SingPass.
    pub const SUCCESS: i32 = 10;
    /// Success for property statement, property tax balance and rental.
    pub const SUCCESS_ZERO: i32 = 0;
    /// Success for stamp-certificate authenticity.
    pub const SUCCESS_CERTIFICATE: i32 = 200;
    pub const NOT_FOUND: i32 = 20;
    pub const VALIDATION: i32 = 40;
    pub const INTERNAL: i32 = 50;
}

/// Message code for the missing client-header rejection.
pub const MISSING_HEADERS_CODE: i32 = 40003;
/// Message code for an unparsable JSON body.
pub const INVALID_FORMAT_CODE: i32 = 40004;
/// Message code for a repository failure.
pub const INTERNAL_CODE: i32 = 50001;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// One entry of an envelope's `fieldInfoList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Only set for rental line-item errors.
    #[serde(rename = "recordID", skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            record_id: None,
        }
    }

    pub fn for_record(
        field: impl Into<String>,
        message: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            record_id: Some(record_id.into()),
        }
    }
}

/// A failed validation check.
///
/// `C` is the message-code type: `i32` for most endpoints, `&'static str`
/// for CorpPass and AIS which publish string codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection<C = i32> {
    pub code: C,
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl<C> Rejection<C> {
    /// A rejection carrying a single field error.
    pub fn single(
        code: C,
        message: impl Into<String>,
        field: impl Into<String>,
        field_message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            fields: vec![FieldError::new(field, field_message)],
        }
    }

    /// A rejection with several field errors reported together.
    pub fn many(code: C, message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            code,
            message: message.into(),
            fields,
        }
    }
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Same as [`is_blank`] for optional inputs.
pub fn is_blank_opt(value: Option<&str>) -> bool {
    value.is_none_or(is_blank)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Map an IRAS `returnCode` to the HTTP status code used by endpoints that
/// derive status from it (GST lookup, property lookups).
pub fn http_status_for(return_code: i32) -> u16 {
    match return_code {
        return_code::SUCCESS | return_code::SUCCESS_ZERO | return_code::SUCCESS_CERTIFICATE => 200,
        return_code::NOT_FOUND => 404,
        return_code::VALIDATION => 400,
        _ => 500,
    }
}
