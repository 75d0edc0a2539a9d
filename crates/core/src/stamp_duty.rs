//! Stamp-duty formulas for the eStamp and SD endpoints.
//!
//! All functions are pure. Amounts are plain `f64` dollars and are only
//! rounded for display via [`format_amount`].

use chrono::NaiveDate;

pub const TENANCY_RATE: f64 = 0.004;
pub const TENANCY_FLOOR: f64 = 1.0;

pub const SHARE_TRANSFER_RATE: f64 = 0.002;
pub const SHARE_TRANSFER_FLOOR: f64 = 1.0;

pub const MORTGAGE_RATE: f64 = 0.004;
pub const MORTGAGE_FLOOR: f64 = 5.0;

pub const SALE_PURCHASE_RATE: f64 = 0.03;
pub const SALE_PURCHASE_FLOOR: f64 = 5.0;

/// Additional duty charged on the dutiable base when the caller intends to
/// claim an ABSD refund.
pub const ABSD_REFUND_RATE: f64 = 0.20;

pub const LISTED_SHARES_RATE: f64 = 0.002;
pub const LISTED_SHARES_FLOOR: f64 = 1.0;

fn with_floor(amount: f64, floor: f64) -> f64 {
    if amount < floor {
        floor
    } else {
        amount
    }
}

/// Two-decimal display form used in every duty response.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// 0.4% of the summed gross rent, never below 1.00.
pub fn tenancy_duty<I>(gross_rents: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total: f64 = gross_rents.into_iter().sum();
    with_floor(total * TENANCY_RATE, TENANCY_FLOOR)
}

/// 0.2% of the consideration, or of the target company's market price when
/// no consideration was declared. Never below 1.00.
pub fn share_transfer_duty(consideration: f64, total_market_price: f64) -> f64 {
    let base = if consideration == 0.0 {
        total_market_price
    } else {
        consideration
    };
    with_floor(base * SHARE_TRANSFER_RATE, SHARE_TRANSFER_FLOOR)
}

/// 0.4% of the loan, never below 5.00.
pub fn mortgage_duty(amount_of_loan: f64) -> f64 {
    with_floor(amount_of_loan * MORTGAGE_RATE, MORTGAGE_FLOOR)
}

fn sale_purchase_duty(base: f64, claims_absd_refund: bool) -> f64 {
    let duty = with_floor(base * SALE_PURCHASE_RATE, SALE_PURCHASE_FLOOR);
    if claims_absd_refund {
        duty + base * ABSD_REFUND_RATE
    } else {
        duty
    }
}

/// Buyer's duty on the higher of purchase price and consideration.
///
/// A zero consideration is treated as equal to the purchase price.
pub fn buyer_duty(purchase_price: f64, consideration: f64, claims_absd_refund: bool) -> f64 {
    let consideration = if consideration == 0.0 {
        purchase_price
    } else {
        consideration
    };
    sale_purchase_duty(purchase_price.max(consideration), claims_absd_refund)
}

/// The dutiable base for a seller: selling price wins when it beats both
/// other amounts, then consideration when it beats the purchase price,
/// otherwise the purchase price.
pub fn seller_base(selling_price: f64, purchase_price: f64, consideration: f64) -> f64 {
    if selling_price > 0.0 && selling_price > purchase_price && selling_price > consideration {
        selling_price
    } else if consideration > 0.0 && consideration > purchase_price {
        consideration
    } else {
        purchase_price
    }
}

pub fn seller_duty(
    selling_price: f64,
    purchase_price: f64,
    consideration: f64,
    claims_absd_refund: bool,
) -> f64 {
    sale_purchase_duty(
        seller_base(selling_price, purchase_price, consideration),
        claims_absd_refund,
    )
}

/// Duty on a transfer of shares in a publicly listed company.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListedSharesDuty {
    pub dutiable_value: f64,
    pub duty: f64,
}

pub fn listed_shares_duty(
    consideration: f64,
    number_of_shares: f64,
    value_per_share: f64,
) -> ListedSharesDuty {
    let dutiable_value = consideration.max(number_of_shares * value_per_share);
    ListedSharesDuty {
        dutiable_value,
        duty: with_floor(dutiable_value * LISTED_SHARES_RATE, LISTED_SHARES_FLOOR),
    }
}

/// Seller's stamp duty on industrial property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndustrialSsd {
    /// Whole years held: days held divided by 365, truncated.
    pub holding_years: i64,
    pub rate: f64,
    pub amount: f64,
}

/// Rate band by whole years held.
pub fn industrial_ssd_rate(holding_years: i64) -> f64 {
    match holding_years {
        i64::MIN..=0 => 0.15,
        1 => 0.10,
        2 => 0.05,
        _ => 0.0,
    }
}

pub fn industrial_ssd(
    acquired: NaiveDate,
    disposed: NaiveDate,
    declared_value: f64,
) -> IndustrialSsd {
    let holding_years = (disposed - acquired).num_days() / 365;
    let rate = industrial_ssd_rate(holding_years);
    IndustrialSsd {
        holding_years,
        rate,
        amount: declared_value * rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // -- tenancy ------------------------------------------------------------

    #[test]
    fn tenancy_sums_rentals() {
        let duty = tenancy_duty([12_000.0, 18_000.0]);
        assert_eq!(format_amount(duty), "120.00");
    }

    #[test]
    fn tenancy_is_deterministic() {
        let rents = vec![2_400.0, 3_600.0];
        assert_eq!(tenancy_duty(rents.clone()), tenancy_duty(rents));
    }

    #[test]
    fn tenancy_floor() {
        assert_eq!(tenancy_duty([100.0]), 1.0);
        assert_eq!(tenancy_duty(std::iter::empty()), 1.0);
    }

    // -- share transfer -----------------------------------------------------

    #[test]
    fn share_transfer_uses_market_price_without_consideration() {
        assert_eq!(format_amount(share_transfer_duty(0.0, 500_000.0)), "1000.00");
        assert_eq!(format_amount(share_transfer_duty(100_000.0, 500_000.0)), "200.00");
        assert_eq!(share_transfer_duty(10.0, 0.0), 1.0);
    }

    // -- mortgage -----------------------------------------------------------

    #[test]
    fn mortgage_floor_boundary() {
        assert_eq!(format_amount(mortgage_duty(100.0)), "5.00");
        assert_eq!(format_amount(mortgage_duty(10_000.0)), "40.00");
    }

    // -- sale and purchase --------------------------------------------------

    #[test]
    fn buyer_takes_higher_of_price_and_consideration() {
        assert_eq!(format_amount(buyer_duty(1_000_000.0, 0.0, false)), "30000.00");
        assert_eq!(
            format_amount(buyer_duty(1_000_000.0, 1_200_000.0, false)),
            "36000.00"
        );
    }

    #[test]
    fn buyer_absd_refund_adds_twenty_percent_of_base() {
        assert_eq!(
            format_amount(buyer_duty(1_000_000.0, 0.0, true)),
            "230000.00"
        );
    }

    #[test]
    fn buyer_floor() {
        assert_eq!(buyer_duty(50.0, 0.0, false), 5.0);
    }

    #[test]
    fn seller_base_preference() {
        assert_eq!(seller_base(900.0, 500.0, 700.0), 900.0);
        assert_eq!(seller_base(0.0, 500.0, 700.0), 700.0);
        assert_eq!(seller_base(600.0, 500.0, 700.0), 700.0);
        assert_eq!(seller_base(0.0, 500.0, 0.0), 500.0);
        assert_eq!(seller_base(400.0, 500.0, 300.0), 500.0);
    }

    #[test]
    fn seller_duty_uses_base() {
        assert_eq!(
            format_amount(seller_duty(2_000_000.0, 1_500_000.0, 0.0, false)),
            "60000.00"
        );
    }

    // -- listed shares ------------------------------------------------------

    #[test]
    fn listed_shares_takes_higher_value() {
        let duty = listed_shares_duty(10_000.0, 1_000.0, 20.0);
        assert_eq!(duty.dutiable_value, 20_000.0);
        assert_eq!(format_amount(duty.duty), "40.00");

        let floor = listed_shares_duty(10.0, 1.0, 1.0);
        assert_eq!(floor.duty, 1.0);
    }

    // -- industrial SSD -----------------------------------------------------

    #[test]
    fn industrial_ssd_bands() {
        let acquired = date("2020-01-01");
        assert_eq!(industrial_ssd(acquired, date("2020-06-01"), 1000.0).rate, 0.15);
        assert_eq!(industrial_ssd(acquired, date("2021-06-01"), 1000.0).rate, 0.10);
        assert_eq!(industrial_ssd(acquired, date("2022-06-01"), 1000.0).rate, 0.05);
        assert_eq!(industrial_ssd(acquired, date("2023-06-01"), 1000.0).rate, 0.0);
    }

    #[test]
    fn industrial_ssd_uses_whole_days_over_365() {
        // 2020 is a leap year: 365 days after 2020-01-01 is 2020-12-31.
        let result = industrial_ssd(date("2020-01-01"), date("2020-12-31"), 100_000.0);
        assert_eq!(result.holding_years, 1);
        assert_eq!(format_amount(result.amount), "10000.00");

        let result = industrial_ssd(date("2020-01-01"), date("2020-12-30"), 100_000.0);
        assert_eq!(result.holding_years, 0);
        assert_eq!(format_amount(result.amount), "15000.00");
    }
}
