//! eStamp sandbox: stamp-duty assessment for five instrument types.
//!
//! Every endpoint runs the same pipeline: header gate, access-token gate,
//! body parse, required-field check, duty calculation. Only the required
//! fields and the formula differ per [`DocumentKind`].

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Days, Utc};
use iras_core::reference::{document_reference, mock_pdf_base64, DocumentKind};
use iras_core::stamp_duty::{
    buyer_duty, format_amount, mortgage_duty, seller_duty, share_transfer_duty, tenancy_duty,
};
use iras_core::validation::{is_blank, return_code, FieldError};
use serde::{Deserialize, Serialize};

use crate::middleware::client_headers::{ClientCredentials, CorpPassAccessToken};
use crate::response::IrasResponse;

const INVALID_FORMAT_CODE: i32 = 40005;
const MISSING_FIELDS_CODE: i32 = 40006;
const PAYMENT_DUE_DAYS: u64 = 30;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRental {
    #[serde(default)]
    pub total_gross_rent_amount: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCompany {
    #[serde(default)]
    pub total_market_price: f64,
}

/// Union of the fields the five eStamp bodies carry. Fields an instrument
/// does not use are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StampRequest {
    pub assign_id: String,
    pub document_description: String,
    pub assessment_rental: Vec<AssessmentRental>,
    pub consideration_amount: f64,
    pub target_company: TargetCompany,
    pub amount_of_loan: f64,
    pub purchase_price: f64,
    pub selling_price: f64,
    /// `1` declares an intent to claim an ABSD refund.
    pub intent_to_claim_absd_refund: i32,
}

#[derive(Debug, Serialize)]
pub struct StampData {
    #[serde(rename = "docRefNo")]
    pub doc_ref_no: String,
    #[serde(rename = "SDAmount")]
    pub sd_amount: String,
    #[serde(rename = "SDPenalty")]
    pub sd_penalty: String,
    #[serde(rename = "TotalAmtPayable")]
    pub total_amt_payable: String,
    #[serde(rename = "PaymentDueDate")]
    pub payment_due_date: String,
    #[serde(rename = "PDFBase64")]
    pub pdf_base64: String,
}

impl StampRequest {
    /// The required-field check for `kind`, as `(field list, message)`.
    fn missing_fields(&self, kind: DocumentKind) -> Option<(&'static str, &'static str)> {
        let base_missing = is_blank(&self.assign_id) || is_blank(&self.document_description);
        match kind {
            DocumentKind::Mortgage if base_missing || self.amount_of_loan <= 0.0 => Some((
                "assignId,documentDescription,amountOfLoan",
                "AssignID, DocumentDescription, and AmountOfLoan are required",
            )),
            DocumentKind::SalePurchaseBuyers if base_missing || self.purchase_price <= 0.0 => {
                Some((
                    "assignId,documentDescription,purchasePrice",
                    "AssignID, DocumentDescription, and PurchasePrice are required",
                ))
            }
            _ if base_missing => Some((
                "assignId,documentDescription",
                "AssignID and DocumentDescription are required",
            )),
            _ => None,
        }
    }

    fn duty(&self, kind: DocumentKind) -> f64 {
        let absd = self.intent_to_claim_absd_refund == 1;
        match kind {
            DocumentKind::TenancyAgreement => tenancy_duty(
                self.assessment_rental
                    .iter()
                    .map(|r| r.total_gross_rent_amount),
            ),
            DocumentKind::ShareTransfer => share_transfer_duty(
                self.consideration_amount,
                self.target_company.total_market_price,
            ),
            DocumentKind::Mortgage => mortgage_duty(self.amount_of_loan),
            DocumentKind::SalePurchaseBuyers => {
                buyer_duty(self.purchase_price, self.consideration_amount, absd)
            }
            DocumentKind::SalePurchaseSellers => seller_duty(
                self.selling_price,
                self.purchase_price,
                self.consideration_amount,
                absd,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /iras/sb/eStamp/StampTenancyAgreement
pub async fn stamp_tenancy_agreement(
    _credentials: ClientCredentials,
    _token: CorpPassAccessToken,
    body: Result<Json<StampRequest>, JsonRejection>,
) -> Response {
    stamp(DocumentKind::TenancyAgreement, body)
}

/// POST /iras/sb/eStamp/ShareTransfer
pub async fn share_transfer(
    _credentials: ClientCredentials,
    _token: CorpPassAccessToken,
    body: Result<Json<StampRequest>, JsonRejection>,
) -> Response {
    stamp(DocumentKind::ShareTransfer, body)
}

/// POST /iras/sb/eStamp/StampMortgage
pub async fn stamp_mortgage(
    _credentials: ClientCredentials,
    _token: CorpPassAccessToken,
    body: Result<Json<StampRequest>, JsonRejection>,
) -> Response {
    stamp(DocumentKind::Mortgage, body)
}

/// POST /iras/sb/eStamp/SalePurchaseBuyers
pub async fn sale_purchase_buyers(
    _credentials: ClientCredentials,
    _token: CorpPassAccessToken,
    body: Result<Json<StampRequest>, JsonRejection>,
) -> Response {
    stamp(DocumentKind::SalePurchaseBuyers, body)
}

/// POST /iras/sb/eStamp/SalePurchaseSellers
pub async fn sale_purchase_sellers(
    _credentials: ClientCredentials,
    _token: CorpPassAccessToken,
    body: Result<Json<StampRequest>, JsonRejection>,
) -> Response {
    stamp(DocumentKind::SalePurchaseSellers, body)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stamp(kind: DocumentKind, body: Result<Json<StampRequest>, JsonRejection>) -> Response {
    // 1. Parse.
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, document = kind.title(), "eStamp body rejected");
            return IrasResponse::<()>::failure(
                return_code::VALIDATION,
                INVALID_FORMAT_CODE,
                "Invalid request format",
                vec![FieldError::new(
                    "body",
                    "Invalid JSON format or missing required fields",
                )],
            )
            .with_status(StatusCode::BAD_REQUEST);
        }
    };

    // 2. Required fields.
    if let Some((field, message)) = request.missing_fields(kind) {
        return IrasResponse::<()>::failure(
            return_code::VALIDATION,
            MISSING_FIELDS_CODE,
            "Missing required fields",
            vec![FieldError::new(field, message)],
        )
        .into_response();
    }

    // 3. Assess.
    let now = Utc::now();
    let duty = format_amount(request.duty(kind));
    let doc_ref_no = document_reference(kind, now);
    let payment_due_date = (now.date_naive() + Days::new(PAYMENT_DUE_DAYS))
        .format("%Y-%m-%d")
        .to_string();

    tracing::info!(
        document = kind.title(),
        doc_ref_no = %doc_ref_no,
        assign_id = %request.assign_id,
        sd_amount = %duty,
        "Stamp duty assessed"
    );

    let data = StampData {
        pdf_base64: mock_pdf_base64(kind, &doc_ref_no, now),
        doc_ref_no,
        sd_amount: duty.clone(),
        sd_penalty: format_amount(0.0),
        total_amt_payable: duty,
        payment_due_date,
    };
    IrasResponse::<_>::success(return_code::SUCCESS, data).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(assign_id: &str, description: &str) -> StampRequest {
        StampRequest {
            assign_id: assign_id.to_string(),
            document_description: description.to_string(),
            ..StampRequest::default()
        }
    }

    #[test]
    fn base_fields_required_for_all_kinds() {
        let blank = request(" ", "Lease");
        for kind in DocumentKind::ALL {
            assert!(blank.missing_fields(kind).is_some(), "{kind:?}");
        }
    }

    #[test]
    fn mortgage_requires_positive_loan() {
        let mut req = request("A1", "Mortgage deed");
        let (field, _) = req.missing_fields(DocumentKind::Mortgage).unwrap();
        assert_eq!(field, "assignId,documentDescription,amountOfLoan");

        req.amount_of_loan = 10_000.0;
        assert!(req.missing_fields(DocumentKind::Mortgage).is_none());
        assert_eq!(format_amount(req.duty(DocumentKind::Mortgage)), "40.00");
    }

    #[test]
    fn buyers_require_purchase_price() {
        let req = request("A1", "HDB flat");
        let (field, _) = req.missing_fields(DocumentKind::SalePurchaseBuyers).unwrap();
        assert_eq!(field, "assignId,documentDescription,purchasePrice");
        assert!(req.missing_fields(DocumentKind::SalePurchaseSellers).is_none());
    }

    #[test]
    fn absd_flag_only_counts_when_one() {
        let mut req = request("A1", "Condo");
        req.purchase_price = 1_000_000.0;
        req.intent_to_claim_absd_refund = 2;
        assert_eq!(
            format_amount(req.duty(DocumentKind::SalePurchaseBuyers)),
            "30000.00"
        );
        req.intent_to_claim_absd_refund = 1;
        assert_eq!(
            format_amount(req.duty(DocumentKind::SalePurchaseBuyers)),
            "230000.00"
        );
    }

    #[test]
    fn parses_camel_case_body() {
        let req: StampRequest = serde_json::from_value(serde_json::json!({
            "assignId": "A1",
            "documentDescription": "Lease",
            "assessmentRental": [{"totalGrossRentAmount": 12000.0}, {"totalGrossRentAmount": 18000.0}],
            "targetCompany": {"totalMarketPrice": 5.0}
        }))
        .unwrap();
        assert_eq!(format_amount(req.duty(DocumentKind::TenancyAgreement)), "120.00");
    }
}
