//! Property consolidated statement model and DTOs.

use iras_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `property_statements` table.
///
/// `consolidated_data` holds the statement document as JSON text; see
/// [`iras_core::property::decode_statement`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyStatement {
    pub id: DbId,
    pub ref_no: String,
    pub property_tax_ref: String,
    pub statement_date: String,
    pub total_amount: String,
    pub consolidated_data: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertyStatement {
    pub ref_no: String,
    pub property_tax_ref: String,
    #[serde(default)]
    pub statement_date: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub consolidated_data: String,
}

/// The lookup key is immutable; only the statement content can change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePropertyStatement {
    pub statement_date: Option<String>,
    pub total_amount: Option<String>,
    pub consolidated_data: Option<String>,
}
