//! SingPass authorization and token records.
//!
//! An auth record is created `pending` by the authorization step and moves
//! to `completed` once its token record has been stored.

use iras_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Auth records
// ---------------------------------------------------------------------------

/// A row from the `singpass_auth_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SingPassAuthRecord {
    pub id: DbId,
    pub auth_url: String,
    pub state: String,
    pub scope: String,
    pub callback_url: String,
    pub client_id: String,
    pub status: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSingPassAuthRecord {
    pub auth_url: String,
    pub state: String,
    pub scope: String,
    pub callback_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSingPassAuthRecord {
    pub auth_url: Option<String>,
    pub scope: Option<String>,
    pub callback_url: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Token records
// ---------------------------------------------------------------------------

/// A row from the `singpass_token_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SingPassTokenRecord {
    pub id: DbId,
    pub code: String,
    pub state: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i32,
    pub refresh_token: String,
    pub scope: String,
    pub callback_url: String,
    pub client_id: String,
    pub status: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSingPassTokenRecord {
    pub code: String,
    pub state: String,
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i32,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSingPassTokenRecord {
    pub token_type: Option<String>,
    pub expires_in: Option<i32>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub callback_url: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<String>,
}
