//! Property tax statements and balance search.
//!
//! Lookups that miss the database may be answered from the demo builders
//! below. Callers decide whether that fallback is allowed; this module only
//! builds the data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{is_blank, is_blank_opt, Rejection};

// ---------------------------------------------------------------------------
// Consolidated statement
// ---------------------------------------------------------------------------

/// Body of `POST /iras/sb/PropertyConsolidatedStatement/retrieve`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedStatementRequest {
    #[serde(default)]
    pub ref_no: String,
    #[serde(default)]
    pub property_tax_ref: String,
}

impl ConsolidatedStatementRequest {
    pub fn validate(&self) -> Result<(), Rejection> {
        if is_blank(&self.ref_no) {
            return Err(Rejection::single(
                40001,
                "Missing reference number",
                "refNo",
                "Reference number is required",
            ));
        }
        if is_blank(&self.property_tax_ref) {
            return Err(Rejection::single(
                40002,
                "Missing property tax reference",
                "propertyTaxRef",
                "Property tax reference is required",
            ));
        }
        Ok(())
    }
}

/// The statement document stored (as JSON text) in `consolidated_data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedStatement {
    #[serde(default)]
    pub statement_date: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub property_details: Vec<StatementProperty>,
    #[serde(default)]
    pub payment_history: Vec<PaymentHistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementProperty {
    pub property_id: String,
    pub address: String,
    pub property_type: String,
    pub tax_amount: String,
    pub due_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryItem {
    pub payment_date: String,
    pub amount: String,
    pub payment_method: String,
    pub transaction_ref: String,
}

/// Decode a stored statement. An empty blob decodes to an empty statement.
pub fn decode_statement(blob: &str) -> Result<ConsolidatedStatement, serde_json::Error> {
    if blob.trim().is_empty() {
        return Ok(ConsolidatedStatement::default());
    }
    serde_json::from_str(blob)
}

/// Fixed sandbox statement dated `today`.
pub fn demo_consolidated_statement(today: NaiveDate) -> ConsolidatedStatement {
    let property = |id: &str, address: &str, kind: &str, amount: &str| StatementProperty {
        property_id: id.to_string(),
        address: address.to_string(),
        property_type: kind.to_string(),
        tax_amount: amount.to_string(),
        due_date: "2025-03-31".to_string(),
        status: "Outstanding".to_string(),
    };
    let payment = |date: &str, amount: &str, method: &str, txn: &str| PaymentHistoryItem {
        payment_date: date.to_string(),
        amount: amount.to_string(),
        payment_method: method.to_string(),
        transaction_ref: txn.to_string(),
    };

    ConsolidatedStatement {
        statement_date: today.format("%Y-%m-%d").to_string(),
        total_amount: "2,500.00".to_string(),
        property_details: vec![
            property(
                "PROP001",
                "123 Orchard Road, Singapore 238858",
                "Residential",
                "1,200.00",
            ),
            property(
                "PROP002",
                "456 Marina Bay, Singapore 018956",
                "Commercial",
                "1,300.00",
            ),
        ],
        payment_history: vec![
            payment("2024-12-15", "2,400.00", "Online Banking", "TXN202412150001"),
            payment("2024-06-15", "2,350.00", "Credit Card", "TXN202406150001"),
        ],
    }
}

// ---------------------------------------------------------------------------
// Tax balance search
// ---------------------------------------------------------------------------

/// Body of `POST /iras/sb/PTTaxBal/PtyTaxBalSearch`.
///
/// Only `clientID` is mandatory, but at least one search key must be given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBalanceSearchRequest {
    #[serde(rename = "clientID", default)]
    pub client_id: String,
    pub property_tax_ref: Option<String>,
    pub owner_tax_ref: Option<String>,
    pub postal_code: Option<String>,
    pub blk_house_no: Option<String>,
    pub street_name: Option<String>,
    pub storey_no: Option<String>,
    pub unit_no: Option<String>,
}

impl TaxBalanceSearchRequest {
    fn criteria(&self) -> [Option<&str>; 7] {
        [
            self.property_tax_ref.as_deref(),
            self.owner_tax_ref.as_deref(),
            self.postal_code.as_deref(),
            self.blk_house_no.as_deref(),
            self.street_name.as_deref(),
            self.storey_no.as_deref(),
            self.unit_no.as_deref(),
        ]
    }

    pub fn validate(&self) -> Result<(), Rejection> {
        if is_blank(&self.client_id) {
            return Err(Rejection::single(
                40001,
                "Missing client ID",
                "clientID",
                "Client ID is required",
            ));
        }
        if self.criteria().iter().all(|c| is_blank_opt(*c)) {
            return Err(Rejection::single(
                40002,
                "Missing search criteria",
                "propertyTaxRef",
                "At least one of propertyTaxRef, ownerTaxRef or an address field is required",
            ));
        }
        Ok(())
    }

    /// Single-line address assembled from whichever parts were supplied.
    pub fn address(&self) -> Option<String> {
        let unit = match (self.storey_no.as_deref(), self.unit_no.as_deref()) {
            (Some(s), Some(u)) if !is_blank(s) && !is_blank(u) => Some(format!("#{s}-{u}")),
            _ => None,
        };
        let parts: Vec<String> = [
            self.blk_house_no.clone(),
            self.street_name.clone(),
            unit,
            self.postal_code.as_ref().map(|p| format!("Singapore {p}")),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !is_blank(p))
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Response data for a tax balance search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBalance {
    pub property_tax_ref: String,
    pub owner_tax_ref: String,
    pub address: String,
    pub outstanding_balance: String,
    pub giro_payment: &'static str,
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Y"
    } else {
        "N"
    }
}

/// Fixed sandbox balance echoing the caller's search keys.
pub fn demo_tax_balance(request: &TaxBalanceSearchRequest) -> TaxBalance {
    let or_default = |value: &Option<String>, default: &str| {
        value
            .as_deref()
            .filter(|v| !is_blank(v))
            .unwrap_or(default)
            .to_string()
    };
    TaxBalance {
        property_tax_ref: or_default(&request.property_tax_ref, "P0000000001A"),
        owner_tax_ref: or_default(&request.owner_tax_ref, "S1234567D"),
        address: request
            .address()
            .unwrap_or_else(|| "123 Orchard Road, Singapore 238858".to_string()),
        outstanding_balance: "1,200.00".to_string(),
        giro_payment: yes_no(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_request_validation_order() {
        let request = ConsolidatedStatementRequest::default();
        assert_eq!(request.validate().unwrap_err().code, 40001);

        let request = ConsolidatedStatementRequest {
            ref_no: "R1".into(),
            property_tax_ref: " ".into(),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.code, 40002);
        assert_eq!(err.fields[0].field, "propertyTaxRef");
    }

    #[test]
    fn demo_statement_is_stable_apart_from_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let statement = demo_consolidated_statement(today);
        assert_eq!(statement.statement_date, "2025-01-02");
        assert_eq!(statement.total_amount, "2,500.00");
        assert_eq!(statement.property_details.len(), 2);
        assert_eq!(statement.property_details[1].property_id, "PROP002");
        assert_eq!(statement.payment_history[0].transaction_ref, "TXN202412150001");
    }

    #[test]
    fn statement_blob_round_trips_through_camel_case() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let blob = serde_json::to_string(&demo_consolidated_statement(today)).unwrap();
        assert!(blob.contains("\"paymentHistory\""));
        assert_eq!(decode_statement(&blob).unwrap(), demo_consolidated_statement(today));
        assert_eq!(decode_statement("").unwrap(), ConsolidatedStatement::default());
        assert!(decode_statement("{not json").is_err());
    }

    #[test]
    fn balance_search_needs_criteria() {
        let mut request = TaxBalanceSearchRequest {
            client_id: "C1".into(),
            ..Default::default()
        };
        assert_eq!(request.validate().unwrap_err().code, 40002);

        request.postal_code = Some("238858".into());
        assert!(request.validate().is_ok());

        request.client_id.clear();
        assert_eq!(request.validate().unwrap_err().code, 40001);
    }

    #[test]
    fn address_joins_supplied_parts() {
        let request = TaxBalanceSearchRequest {
            client_id: "C1".into(),
            blk_house_no: Some("10".into()),
            street_name: Some("Anson Road".into()),
            storey_no: Some("05".into()),
            unit_no: Some("12".into()),
            postal_code: Some("079903".into()),
            ..Default::default()
        };
        assert_eq!(
            request.address().as_deref(),
            Some("10 Anson Road #05-12 Singapore 079903")
        );
        assert_eq!(TaxBalanceSearchRequest::default().address(), None);
    }
}
