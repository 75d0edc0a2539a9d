//! Property tax balance model and DTOs.

use iras_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `property_tax_balances` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyTaxBalance {
    pub id: DbId,
    pub client_id: String,
    pub property_tax_ref: Option<String>,
    pub owner_tax_ref: Option<String>,
    pub postal_code: Option<String>,
    pub blk_house_no: Option<String>,
    pub street_name: Option<String>,
    pub storey_no: Option<String>,
    pub unit_no: Option<String>,
    pub outstanding_balance: f64,
    pub giro_payment: bool,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertyTaxBalance {
    pub client_id: String,
    pub property_tax_ref: Option<String>,
    pub owner_tax_ref: Option<String>,
    pub postal_code: Option<String>,
    pub blk_house_no: Option<String>,
    pub street_name: Option<String>,
    pub storey_no: Option<String>,
    pub unit_no: Option<String>,
    #[serde(default)]
    pub outstanding_balance: f64,
    #[serde(default)]
    pub giro_payment: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePropertyTaxBalance {
    pub client_id: Option<String>,
    pub property_tax_ref: Option<String>,
    pub owner_tax_ref: Option<String>,
    pub postal_code: Option<String>,
    pub blk_house_no: Option<String>,
    pub street_name: Option<String>,
    pub storey_no: Option<String>,
    pub unit_no: Option<String>,
    pub outstanding_balance: Option<f64>,
    pub giro_payment: Option<bool>,
}

/// Search keys for the public balance lookup. `None` keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct TaxBalanceFilter {
    pub client_id: String,
    pub property_tax_ref: Option<String>,
    pub owner_tax_ref: Option<String>,
    pub postal_code: Option<String>,
    pub blk_house_no: Option<String>,
    pub street_name: Option<String>,
    pub storey_no: Option<String>,
    pub unit_no: Option<String>,
}

impl TaxBalanceFilter {
    /// True when every supplied key matches the row.
    pub fn matches(&self, row: &PropertyTaxBalance) -> bool {
        fn eq(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                Some(w) => have.as_deref() == Some(w.as_str()),
                None => true,
            }
        }
        row.client_id == self.client_id
            && eq(&self.property_tax_ref, &row.property_tax_ref)
            && eq(&self.owner_tax_ref, &row.owner_tax_ref)
            && eq(&self.postal_code, &row.postal_code)
            && eq(&self.blk_house_no, &row.blk_house_no)
            && eq(&self.street_name, &row.street_name)
            && eq(&self.storey_no, &row.storey_no)
            && eq(&self.unit_no, &row.unit_no)
    }
}
