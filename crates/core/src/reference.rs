//! Business-key and document-reference generators.
//!
//! References are built from the clock, mostly with a random suffix. They
//! carry no cryptographic guarantee and the unique constraints in the
//! database are the last line of defence. Rental references have no suffix
//! (`RNT` plus exactly 14 digits), so two submissions in the same second
//! collide on `uq_rental_submissions_ref_no`.

use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Timestamp layout embedded in rental and CIT keys (14 digits).
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Human-readable timestamp used in CIT records and mock PDFs.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The five eStamp document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    TenancyAgreement,
    ShareTransfer,
    Mortgage,
    SalePurchaseBuyers,
    SalePurchaseSellers,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::TenancyAgreement,
        DocumentKind::ShareTransfer,
        DocumentKind::Mortgage,
        DocumentKind::SalePurchaseBuyers,
        DocumentKind::SalePurchaseSellers,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::TenancyAgreement => "TA",
            DocumentKind::ShareTransfer => "ST",
            DocumentKind::Mortgage => "MG",
            DocumentKind::SalePurchaseBuyers => "SP",
            DocumentKind::SalePurchaseSellers => "SPS",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::TenancyAgreement => "Tenancy Agreement",
            DocumentKind::ShareTransfer => "Share Transfer",
            DocumentKind::Mortgage => "Mortgage",
            DocumentKind::SalePurchaseBuyers => "Sale Purchase Buyers",
            DocumentKind::SalePurchaseSellers => "Sale Purchase Sellers",
        }
    }
}

/// `{prefix}{unix seconds}{0..1000}`, e.g. `TA1717171717042`.
pub fn document_reference(kind: DocumentKind, now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random_range(0..1000);
    format!("{}{}{}", kind.prefix(), now.timestamp(), suffix)
}

/// `RNT` followed by a 14-digit timestamp.
pub fn rental_reference(now: DateTime<Utc>) -> String {
    format!("RNT{}", now.format(KEY_TIMESTAMP_FORMAT))
}

/// Width of the zero-padded random suffix on CIT conversion ids.
const CIT_SUFFIX_DIGITS: usize = 6;

/// `CIT`, a 14-digit timestamp and a 6-digit random suffix.
pub fn cit_conversion_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!(
        "CIT{}{:0width$}",
        now.format(KEY_TIMESTAMP_FORMAT),
        suffix,
        width = CIT_SUFFIX_DIGITS
    )
}

fn short_uuid() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// SingPass access token: `SP_AT_{unix seconds}_{8 hex}`.
pub fn singpass_access_token(now: DateTime<Utc>) -> String {
    format!("SP_AT_{}_{}", now.timestamp(), short_uuid())
}

/// SingPass refresh token: `SP_RT_{unix seconds}_{8 hex}`.
pub fn singpass_refresh_token(now: DateTime<Utc>) -> String {
    format!("SP_RT_{}_{}", now.timestamp(), short_uuid())
}

/// Base64 of the placeholder PDF returned with every eStamp document.
pub fn mock_pdf_base64(kind: DocumentKind, reference: &str, now: DateTime<Utc>) -> String {
    let content = format!(
        "PDF-1.4 Mock {} Document - Ref: {} - Generated: {}",
        kind.title(),
        reference,
        now.format(DISPLAY_TIMESTAMP_FORMAT)
    );
    general_purpose::STANDARD.encode(content)
}

/// True when `value` looks like a reference this service issued for one of
/// the eStamp document types: a known prefix followed only by digits.
pub fn is_document_reference(value: &str) -> bool {
    DocumentKind::ALL.iter().any(|kind| {
        value
            .strip_prefix(kind.prefix())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 7, 9, 30, 15).unwrap()
    }

    #[test]
    fn document_reference_has_prefix_and_timestamp() {
        let now = fixed_now();
        let reference = document_reference(DocumentKind::Mortgage, now);
        let prefix = format!("MG{}", now.timestamp());
        assert!(reference.starts_with(&prefix), "got {reference}");
        let suffix: u32 = reference[prefix.len()..].parse().unwrap();
        assert!(suffix < 1000);
    }

    #[test]
    fn rental_reference_is_fourteen_digits() {
        assert_eq!(rental_reference(fixed_now()), "RNT20250707093015");
    }

    #[test]
    fn cit_id_carries_a_random_suffix() {
        let id = cit_conversion_id(fixed_now());
        assert!(id.starts_with("CIT20250707093015"), "got {id}");
        assert_eq!(id.len(), 3 + 14 + CIT_SUFFIX_DIGITS);
        assert!(id[3..].bytes().all(|b| b.is_ascii_digit()));

        // Same second, many draws: the suffix keeps them apart.
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| cit_conversion_id(fixed_now())).collect();
        assert!(ids.len() > 1);
    }

    #[test]
    fn singpass_tokens_have_expected_shape() {
        let now = fixed_now();
        let at = singpass_access_token(now);
        let rt = singpass_refresh_token(now);
        assert!(at.starts_with(&format!("SP_AT_{}_", now.timestamp())));
        assert!(rt.starts_with(&format!("SP_RT_{}_", now.timestamp())));
        assert_eq!(at.rsplit('_').next().unwrap().len(), 8);
    }

    #[test]
    fn mock_pdf_decodes_to_descriptive_text() {
        let encoded = mock_pdf_base64(DocumentKind::ShareTransfer, "ST123", fixed_now());
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "PDF-1.4 Mock Share Transfer Document - Ref: ST123 - Generated: 2025-07-07 09:30:15"
        );
    }

    #[test]
    fn recognizes_issued_references() {
        assert!(is_document_reference("TA1751880615042"));
        assert!(is_document_reference("SPS1751880615"));
        assert!(is_document_reference("SP17518806150"));
        assert!(!is_document_reference("XX1751880615"));
        assert!(!is_document_reference("TA"));
        assert!(!is_document_reference("TA17518x"));
    }
}
