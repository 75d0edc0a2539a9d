//! Rental-income submission: request shape and validation.
//!
//! Unlike the other IRAS endpoints, line-item problems are not reported one
//! at a time. Every line item with a missing property tax reference gets its
//! own field error and they are returned together.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{is_blank, FieldError, Rejection};

/// Status stored on every accepted submission.
pub const STATUS_SUBMITTED: &str = "submitted";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgAndSubmissionInfo {
    #[serde(default)]
    pub assmt_year: i32,
    #[serde(default)]
    pub authorised_person_email: String,
    #[serde(default)]
    pub authorised_person_name: String,
    #[serde(default)]
    pub development_name: String,
    /// Any other submitter fields are kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rented unit.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    #[serde(rename = "recordID", default)]
    pub record_id: f64,
    #[serde(default)]
    pub property_tax_ref: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /iras/sb/rental/Submission`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalSubmissionRequest {
    #[serde(default)]
    pub org_and_submission_info: OrgAndSubmissionInfo,
    #[serde(default)]
    pub property_dtl: Vec<PropertyDetail>,
}

pub fn validate(request: &RentalSubmissionRequest) -> Result<(), Rejection> {
    let info = &request.org_and_submission_info;

    if info.assmt_year <= 0 {
        return Err(Rejection::single(
            40001,
            "Invalid assessment year",
            "assmtYear",
            "Assessment year must be greater than 0",
        ));
    }
    if is_blank(&info.authorised_person_email) {
        return Err(Rejection::single(
            40002,
            "Invalid authorised person email",
            "authorisedPersonEmail",
            "Authorised person email is required",
        ));
    }
    if is_blank(&info.authorised_person_name) {
        return Err(Rejection::single(
            40003,
            "Invalid authorised person name",
            "authorisedPersonName",
            "Authorised person name is required",
        ));
    }
    if is_blank(&info.development_name) {
        return Err(Rejection::single(
            40004,
            "Invalid development name",
            "developmentName",
            "Development name is required",
        ));
    }
    if request.property_dtl.is_empty() {
        return Err(Rejection::single(
            40005,
            "No property details provided",
            "propertyDtl",
            "At least one property detail is required",
        ));
    }

    let errors: Vec<FieldError> = request
        .property_dtl
        .iter()
        .filter(|item| is_blank(&item.property_tax_ref))
        .map(|item| {
            FieldError::for_record(
                "propertyTaxRef",
                "Property tax reference is required",
                format!("{:.0}", item.record_id),
            )
        })
        .collect();

    if !errors.is_empty() {
        return Err(Rejection::many(
            40006,
            "Validation errors in property details",
            errors,
        ));
    }

    Ok(())
}
