//! CIT Form CS conversion model and DTOs.

use iras_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cit_conversions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CitConversion {
    pub id: DbId,
    pub conversion_id: String,
    /// Caller-supplied id; a repeat request with the same value returns this row.
    pub request_id: i64,
    pub client_id: String,
    pub status: String,
    pub conversion_date: String,
    pub processed_by: String,
    pub conversion_result: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCitConversion {
    pub conversion_id: String,
    pub request_id: i64,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub conversion_date: String,
    #[serde(default)]
    pub processed_by: String,
    #[serde(default)]
    pub conversion_result: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCitConversion {
    pub client_id: Option<String>,
    pub status: Option<String>,
    pub conversion_date: Option<String>,
    pub processed_by: Option<String>,
    pub conversion_result: Option<String>,
}
