//! Auto-Inclusion Scheme (AIS) organisation search.

use serde::Deserialize;

use crate::validation::{is_blank, Rejection};

/// Organisations the sandbox reports as enrolled in AIS.
pub const KNOWN_AIS_ORGANIZATIONS: [&str; 2] = ["4396029847797760", "1234567890123456"];

pub const MIN_BASIS_YEAR: i32 = 1900;
pub const MAX_BASIS_YEAR: i32 = 2100;

/// Body of `POST /iras/sb/ESubmission/AISOrgSearch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AisSearchRequest {
    #[serde(rename = "clientID", default)]
    pub client_id: String,
    #[serde(rename = "organizationID", default)]
    pub organization_id: String,
    #[serde(default)]
    pub basis_year: i32,
}

/// Checks run in order; the first failure wins. Message codes are strings.
pub fn validate(request: &AisSearchRequest) -> Result<(), Rejection<&'static str>> {
    if is_blank(&request.client_id) {
        return Err(Rejection::single(
            "40001",
            "Invalid client ID",
            "clientID",
            "Client ID is required and cannot be empty",
        ));
    }
    if is_blank(&request.organization_id) {
        return Err(Rejection::single(
            "40002",
            "Invalid organization ID",
            "organizationID",
            "Organization ID is required and cannot be empty",
        ));
    }
    if !(MIN_BASIS_YEAR..=MAX_BASIS_YEAR).contains(&request.basis_year) {
        return Err(Rejection::single(
            "40003",
            "Invalid basis year",
            "basisYear",
            "Basis year must be between 1900 and 2100",
        ));
    }
    Ok(())
}

/// `"Y"` when the organisation is enrolled, `"N"` otherwise.
pub fn organization_in_ais(organization_id: &str) -> &'static str {
    if KNOWN_AIS_ORGANIZATIONS.contains(&organization_id.trim()) {
        "Y"
    } else {
        "N"
    }
}
