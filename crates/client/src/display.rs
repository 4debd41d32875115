//! Display formatting for dashboard amounts.
//!
//! Maps the wire currency onto the engine formatter and applies the
//! sign conventions the dashboard uses.

use engine::{Currency, Money};

/// Engine currency for a wire currency.
#[must_use]
pub fn currency_of(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Inr => Currency::Inr,
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Eur => Currency::Eur,
    }
}

/// Full form with an explicit `+` on positive amounts.
///
/// Used where the sign carries meaning (net savings, lending balances).
#[must_use]
pub fn signed_amount(amount_minor: i64, currency: api_types::Currency) -> String {
    let formatted = Money::new(amount_minor).format(currency_of(currency));
    if amount_minor > 0 {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Full form without a `+`; context already makes the sign clear.
#[must_use]
pub fn plain_amount(amount_minor: i64, currency: api_types::Currency) -> String {
    Money::new(amount_minor.abs()).format(currency_of(currency))
}

/// Compact form for stat tiles (`₹ 1.3Cr`, `$12.5K`).
#[must_use]
pub fn compact_amount(amount_minor: i64, currency: api_types::Currency) -> String {
    Money::new(amount_minor).format_compact(currency_of(currency))
}

/// Percentage with one decimal and a directional sign, e.g. `+2.3%`.
#[must_use]
pub fn signed_percent(fraction: f64) -> String {
    let percent = fraction * 100.0;
    let sign = if percent >= 0.0 { "+" } else { "" };
    format!("{sign}{percent:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amount_prefixes_positive_values() {
        assert_eq!(signed_amount(50_000, api_types::Currency::Inr), "+₹ 500.00");
        assert_eq!(signed_amount(-50_000, api_types::Currency::Inr), "-₹ 500.00");
        assert_eq!(signed_amount(0, api_types::Currency::Usd), "$0.00");
    }

    #[test]
    fn compact_amount_matches_dashboard_tiles() {
        assert_eq!(
            compact_amount(12_500_000_00, api_types::Currency::Inr),
            "₹ 1.3Cr"
        );
        assert_eq!(compact_amount(12_500_00, api_types::Currency::Usd), "$12.5K");
    }

    #[test]
    fn signed_percent_formats_one_decimal() {
        assert_eq!(signed_percent(0.0234), "+2.3%");
        assert_eq!(signed_percent(-0.015), "-1.5%");
    }
}
