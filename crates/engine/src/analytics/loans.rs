//! Amortized loan math.
//!
//! Amounts are integer minor units; intermediate math runs in `f64` and
//! rounds half away from zero at the edge, which is adequate for display
//! and progress tracking, not for ledger reconciliation.

/// Fixed monthly installment for a principal at a nominal yearly rate.
///
/// `EMI = P·r·(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate. A
/// zero-rate loan is a straight division of the principal.
#[must_use]
pub fn monthly_emi(principal_minor: i64, annual_rate_pct: f64, tenure_months: u32) -> i64 {
    if tenure_months == 0 {
        return 0;
    }
    if annual_rate_pct == 0.0 {
        return (principal_minor as f64 / tenure_months as f64).round() as i64;
    }

    let principal = principal_minor as f64;
    let rate = annual_rate_pct / 12.0 / 100.0;
    let factor = (1.0 + rate).powi(tenure_months as i32);
    (principal * rate * factor / (factor - 1.0)).round() as i64
}

/// Total amount repaid over the full tenure.
#[must_use]
pub fn total_payable(monthly_emi_minor: i64, tenure_months: u32) -> i64 {
    monthly_emi_minor * tenure_months as i64
}

/// Interest component of the full repayment.
#[must_use]
pub fn total_interest(principal_minor: i64, monthly_emi_minor: i64, tenure_months: u32) -> i64 {
    total_payable(monthly_emi_minor, tenure_months) - principal_minor
}

/// Principal still owed after `payments_made` installments.
///
/// Amortized balance: `P·(1+r)^k − EMI·((1+r)^k − 1)/r`, clamped at 0.
/// Counts installments, not amounts: partial payments advance nothing
/// until they complete an EMI.
#[must_use]
pub fn outstanding_principal(
    principal_minor: i64,
    annual_rate_pct: f64,
    monthly_emi_minor: i64,
    payments_made: u32,
) -> i64 {
    if payments_made == 0 {
        return principal_minor;
    }
    if annual_rate_pct == 0.0 {
        return (principal_minor - monthly_emi_minor * payments_made as i64).max(0);
    }

    let principal = principal_minor as f64;
    let emi = monthly_emi_minor as f64;
    let rate = annual_rate_pct / 12.0 / 100.0;
    let factor = (1.0 + rate).powi(payments_made as i32);
    let balance = principal * factor - emi * (factor - 1.0) / rate;
    balance.round().max(0.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emi_matches_standard_amortization() {
        // 1,00,000.00 at 12% for 12 months: 8,884.88 per month.
        assert_eq!(monthly_emi(100_000_00, 12.0, 12), 8_884_88);
        // 5,00,000.00 at 9.5% for 60 months: ~10,501 per month.
        let emi = monthly_emi(500_000_00, 9.5, 60);
        assert!((10_500_00..=10_502_00).contains(&emi), "emi = {emi}");
    }

    #[test]
    fn zero_rate_is_straight_division() {
        assert_eq!(monthly_emi(120_000_00, 0.0, 12), 10_000_00);
        assert_eq!(outstanding_principal(120_000_00, 0.0, 10_000_00, 3), 90_000_00);
    }

    #[test]
    fn zero_tenure_yields_zero_emi() {
        assert_eq!(monthly_emi(100_000_00, 10.0, 0), 0);
    }

    #[test]
    fn interest_is_payable_minus_principal() {
        let emi = monthly_emi(100_000_00, 12.0, 12);
        let interest = total_interest(100_000_00, emi, 12);
        assert_eq!(interest, total_payable(emi, 12) - 100_000_00);
        assert!(interest > 0);
    }

    #[test]
    fn outstanding_decreases_and_reaches_zero() {
        let emi = monthly_emi(100_000_00, 12.0, 12);
        let mut previous = outstanding_principal(100_000_00, 12.0, emi, 0);
        for k in 1..=12 {
            let current = outstanding_principal(100_000_00, 12.0, emi, k);
            assert!(current < previous);
            previous = current;
        }
        // Rounding leaves at most a few paise after the final installment.
        assert!(previous <= 5);
    }
}
