//! Stamp-duty utilities: certificate authenticity and two calculators.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use iras_core::reference::is_document_reference;
use iras_core::stamp_duty::{format_amount, industrial_ssd, listed_shares_duty};
use iras_core::validation::{is_blank, return_code, Rejection, INVALID_FORMAT_CODE};
use serde::{Deserialize, Serialize};

use crate::middleware::client_headers::ClientCredentials;
use crate::response::IrasResponse;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthenticityRequest {
    pub stamp_certificate_no: String,
    pub doc_ref_no: String,
}

impl AuthenticityRequest {
    pub fn validate(&self) -> Result<(), Rejection> {
        if is_blank(&self.stamp_certificate_no) {
            return Err(Rejection::single(
                40001,
                "Invalid stamp certificate number",
                "stampCertificateNo",
                "Stamp certificate number is required",
            ));
        }
        if is_blank(&self.doc_ref_no) {
            return Err(Rejection::single(
                40002,
                "Invalid document reference number",
                "docRefNo",
                "Document reference number is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticityData {
    pub stamp_certificate_no: String,
    pub doc_ref_no: String,
    pub is_authentic: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListedSharesRequest {
    pub consideration: f64,
    pub number_of_shares: f64,
    pub value_per_share: f64,
}

impl ListedSharesRequest {
    pub fn validate(&self) -> Result<(), Rejection> {
        let negative = [
            ("consideration", self.consideration),
            ("numberOfShares", self.number_of_shares),
            ("valuePerShare", self.value_per_share),
        ]
        .into_iter()
        .find(|(_, value)| *value < 0.0);

        match negative {
            Some((field, _)) => Err(Rejection::single(
                40001,
                "Invalid amount",
                field,
                "Amount cannot be negative",
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListedSharesData {
    #[serde(rename = "dutiableValue")]
    pub dutiable_value: String,
    #[serde(rename = "SDAmount")]
    pub sd_amount: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustrialSsdRequest {
    pub date_of_acquisition: String,
    pub date_of_disposal: Option<String>,
    pub declared_value: f64,
}

impl IndustrialSsdRequest {
    /// Parse and check the dates, defaulting disposal to `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), Rejection> {
        let acquired = NaiveDate::parse_from_str(self.date_of_acquisition.trim(), DATE_FORMAT)
            .map_err(|_| {
                Rejection::single(
                    40001,
                    "Invalid acquisition date",
                    "dateOfAcquisition",
                    "Date of acquisition must be in YYYY-MM-DD format",
                )
            })?;

        let disposed = match self.date_of_disposal.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                Rejection::single(
                    40002,
                    "Invalid disposal date",
                    "dateOfDisposal",
                    "Date of disposal must be in YYYY-MM-DD format",
                )
            })?,
        };
        if disposed < acquired {
            return Err(Rejection::single(
                40002,
                "Invalid disposal date",
                "dateOfDisposal",
                "Date of disposal cannot be before date of acquisition",
            ));
        }

        if self.declared_value < 0.0 {
            return Err(Rejection::single(
                40003,
                "Invalid declared value",
                "declaredValue",
                "Declared value cannot be negative",
            ));
        }
        Ok((acquired, disposed))
    }
}

#[derive(Debug, Serialize)]
pub struct IndustrialSsdData {
    #[serde(rename = "holdingPeriodYears")]
    pub holding_period_years: i64,
    #[serde(rename = "SSDRate")]
    pub ssd_rate: String,
    #[serde(rename = "SSDAmount")]
    pub ssd_amount: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /iras/prod/SD/SCAuthenticity
///
/// Answers with `returnCode` 200 on success, unlike the other calculators.
pub async fn sc_authenticity(
    _credentials: ClientCredentials,
    body: Result<Json<AuthenticityRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if let Err(rejection) = request.validate() {
        return IrasResponse::<()>::rejected(rejection).into_response();
    }

    let certificate = request.stamp_certificate_no.trim().to_string();
    let is_authentic = if is_document_reference(&certificate) {
        "Y"
    } else {
        "N"
    };
    tracing::debug!(certificate = %certificate, is_authentic, "Stamp certificate checked");

    IrasResponse::<_>::success(
        return_code::SUCCESS_CERTIFICATE,
        AuthenticityData {
            stamp_certificate_no: certificate,
            doc_ref_no: request.doc_ref_no.trim().to_string(),
            is_authentic,
        },
    )
    .into_response()
}

/// POST /iras/prod/SD/CalPubListedCompanyShares
pub async fn cal_pub_listed_company_shares(
    _credentials: ClientCredentials,
    body: Result<Json<ListedSharesRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    if let Err(rejection) = request.validate() {
        return IrasResponse::<()>::rejected(rejection).into_response();
    }

    let duty = listed_shares_duty(
        request.consideration,
        request.number_of_shares,
        request.value_per_share,
    );
    IrasResponse::<_>::success(
        return_code::SUCCESS,
        ListedSharesData {
            dutiable_value: format_amount(duty.dutiable_value),
            sd_amount: format_amount(duty.duty),
        },
    )
    .into_response()
}

/// POST /iras/prod/SD/CalIndustrialSSD
pub async fn cal_industrial_ssd(
    _credentials: ClientCredentials,
    body: Result<Json<IndustrialSsdRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return IrasResponse::<()>::invalid_format(INVALID_FORMAT_CODE).into_response();
    };
    let (acquired, disposed) = match request.validate(Utc::now().date_naive()) {
        Ok(dates) => dates,
        Err(rejection) => return IrasResponse::<()>::rejected(rejection).into_response(),
    };

    let ssd = industrial_ssd(acquired, disposed, request.declared_value);
    IrasResponse::<_>::success(
        return_code::SUCCESS,
        IndustrialSsdData {
            holding_period_years: ssd.holding_years,
            ssd_rate: format_amount(ssd.rate * 100.0),
            ssd_amount: format_amount(ssd.amount),
        },
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn authenticity_checks_run_in_order() {
        let both_blank = AuthenticityRequest::default();
        assert_eq!(both_blank.validate().unwrap_err().code, 40001);

        let missing_ref = AuthenticityRequest {
            stamp_certificate_no: "TA123".into(),
            doc_ref_no: "  ".into(),
        };
        assert_eq!(missing_ref.validate().unwrap_err().code, 40002);
    }

    #[test]
    fn negative_share_inputs_are_rejected() {
        let req = ListedSharesRequest {
            consideration: 10.0,
            number_of_shares: -1.0,
            value_per_share: 1.0,
        };
        let rejection = req.validate().unwrap_err();
        assert_eq!(rejection.code, 40001);
        assert_eq!(rejection.fields[0].field, "numberOfShares");
    }

    #[test]
    fn disposal_defaults_to_today() {
        let req = IndustrialSsdRequest {
            date_of_acquisition: "2024-01-01".into(),
            date_of_disposal: None,
            declared_value: 1.0,
        };
        let (_, disposed) = req.validate(date("2025-06-30")).unwrap();
        assert_eq!(disposed, date("2025-06-30"));
    }

    #[test]
    fn disposal_before_acquisition_is_rejected() {
        let req = IndustrialSsdRequest {
            date_of_acquisition: "2024-01-01".into(),
            date_of_disposal: Some("2023-12-31".into()),
            declared_value: 1.0,
        };
        assert_eq!(req.validate(date("2025-01-01")).unwrap_err().code, 40002);
    }

    #[test]
    fn bad_acquisition_and_negative_value() {
        let bad_date = IndustrialSsdRequest {
            date_of_acquisition: "01/01/2024".into(),
            ..IndustrialSsdRequest::default()
        };
        assert_eq!(bad_date.validate(date("2025-01-01")).unwrap_err().code, 40001);

        let negative = IndustrialSsdRequest {
            date_of_acquisition: "2024-01-01".into(),
            declared_value: -5.0,
            ..IndustrialSsdRequest::default()
        };
        assert_eq!(negative.validate(date("2025-01-01")).unwrap_err().code, 40003);
    }
}
