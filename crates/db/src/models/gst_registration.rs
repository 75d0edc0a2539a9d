//! GST registration model and DTOs.

use iras_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `gst_registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GstRegistration {
    pub id: DbId,
    pub client_id: String,
    pub registration_id: String,
    pub gst_registration_number: String,
    pub name: String,
    pub registered_from: String,
    pub registered_to: String,
    pub status: String,
    pub remarks: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for seeding a registration through the admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGstRegistration {
    pub client_id: String,
    pub registration_id: String,
    #[serde(default)]
    pub gst_registration_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub registered_from: String,
    #[serde(default)]
    pub registered_to: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub remarks: String,
}

/// DTO for updating a registration. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGstRegistration {
    pub client_id: Option<String>,
    pub gst_registration_number: Option<String>,
    pub name: Option<String>,
    pub registered_from: Option<String>,
    pub registered_to: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}
