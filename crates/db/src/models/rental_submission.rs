//! Rental submission model and DTOs.

use iras_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rental_submissions` table.
///
/// `submission_data` is the JSON-encoded list of line items as received.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RentalSubmission {
    pub id: DbId,
    pub ref_no: String,
    pub assmt_year: i32,
    pub authorised_person_email: String,
    pub authorised_person_name: String,
    pub development_name: String,
    pub submission_data: String,
    pub total_properties: i32,
    pub status: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRentalSubmission {
    pub ref_no: String,
    pub assmt_year: i32,
    pub authorised_person_email: String,
    pub authorised_person_name: String,
    pub development_name: String,
    #[serde(default)]
    pub submission_data: String,
    #[serde(default)]
    pub total_properties: i32,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRentalSubmission {
    pub assmt_year: Option<i32>,
    pub authorised_person_email: Option<String>,
    pub authorised_person_name: Option<String>,
    pub development_name: Option<String>,
    pub submission_data: Option<String>,
    pub total_properties: Option<i32>,
    pub status: Option<String>,
}
