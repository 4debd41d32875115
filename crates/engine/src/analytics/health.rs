//! Weighted-sum financial health heuristic.
//!
//! The weights and caps are tuning policy, not law; they live in one place
//! so changing the policy is a one-line edit per knob.

use serde::{Deserialize, Serialize};

use super::Totals;

const SAVINGS_CAP: f64 = 0.5;
const SAVINGS_WEIGHT: f64 = 80.0;
const DEBT_WEIGHT: f64 = 25.0;
const INVESTMENT_CAP: f64 = 0.3;
const INVESTMENT_WEIGHT: f64 = 50.0;
const DISCIPLINE_WEIGHT: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLabel {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl HealthLabel {
    /// Band boundaries are inclusive on the lower bound.
    #[must_use]
    pub fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Warning,
            _ => Self::Critical,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// In `[0, 100]`.
    pub score: u8,
    pub label: HealthLabel,
}

/// Raw weighted sum, before clamping.
///
/// Monotone non-decreasing in `savings_rate` and `investment_ratio`,
/// non-increasing in `debt_ratio`.
fn weighted_sum(
    savings_rate: f64,
    debt_ratio: f64,
    investment_ratio: f64,
    budget_discipline: f64,
) -> f64 {
    savings_rate.min(SAVINGS_CAP) * SAVINGS_WEIGHT
        + (1.0 - debt_ratio.min(1.0)) * DEBT_WEIGHT
        + investment_ratio.min(INVESTMENT_CAP) * INVESTMENT_WEIGHT
        + budget_discipline * DISCIPLINE_WEIGHT
}

/// Scores a window's totals.
///
/// Ratios derive from income: `debt_ratio = (emi + borrowed)/income`,
/// `investment_ratio = investment/income`, `budget_discipline = 1` when
/// expenses fit inside income, else `income/expenses`. A window without
/// income scores 0 (guards every division).
#[must_use]
pub fn score_from_totals(totals: &Totals) -> HealthScore {
    if totals.income_minor == 0 {
        return HealthScore {
            score: 0,
            label: HealthLabel::for_score(0),
        };
    }

    let income = totals.income_minor as f64;
    let expenses = totals.expenses_minor as f64;

    let savings_rate = totals.savings_rate();
    let debt_ratio = (totals.emi_minor + totals.borrowed_minor) as f64 / income;
    let investment_ratio = totals.investment_minor as f64 / income;
    let budget_discipline = if expenses <= income { 1.0 } else { income / expenses };

    let raw = weighted_sum(savings_rate, debt_ratio, investment_ratio, budget_discipline);
    let score = raw.clamp(0.0, 100.0).round() as u8;
    HealthScore {
        score,
        label: HealthLabel::for_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(income: i64, expenses: i64, investment: i64, emi: i64, borrowed: i64) -> Totals {
        Totals {
            income_minor: income,
            expenses_minor: expenses,
            investment_minor: investment,
            emi_minor: emi,
            lent_minor: 0,
            borrowed_minor: borrowed,
        }
    }

    #[test]
    fn zero_income_scores_zero() {
        let health = score_from_totals(&totals(0, 5_000_00, 0, 0, 0));
        assert_eq!(health.score, 0);
        assert_eq!(health.label, HealthLabel::Critical);
    }

    #[test]
    fn score_stays_within_bounds() {
        // Best case: savings and investment caps hit, no debt, disciplined.
        let best = score_from_totals(&totals(100_00, 0, 50_00, 0, 0));
        assert!(best.score <= 100);
        // Worst case with income: everything spent and deep in debt.
        let worst = score_from_totals(&totals(100_00, 1_000_00, 0, 500_00, 500_00));
        assert!(worst.score <= 100);
    }

    #[test]
    fn monotone_in_savings_rate() {
        let lower = score_from_totals(&totals(100_000_00, 80_000_00, 0, 10_000_00, 0));
        let higher = score_from_totals(&totals(100_000_00, 50_000_00, 0, 10_000_00, 0));
        assert!(higher.score >= lower.score);
    }

    #[test]
    fn monotone_in_debt_ratio() {
        let light_debt = score_from_totals(&totals(100_000_00, 50_000_00, 0, 5_000_00, 0));
        let heavy_debt = score_from_totals(&totals(100_000_00, 50_000_00, 0, 40_000_00, 20_000_00));
        assert!(light_debt.score >= heavy_debt.score);
    }

    #[test]
    fn monotone_in_investment_ratio() {
        let none = score_from_totals(&totals(100_000_00, 50_000_00, 0, 0, 0));
        let some = score_from_totals(&totals(100_000_00, 50_000_00, 20_000_00, 0, 0));
        assert!(some.score >= none.score);
    }

    #[test]
    fn label_bands_are_inclusive_on_lower_bound() {
        assert_eq!(HealthLabel::for_score(80), HealthLabel::Excellent);
        assert_eq!(HealthLabel::for_score(79), HealthLabel::Good);
        assert_eq!(HealthLabel::for_score(60), HealthLabel::Good);
        assert_eq!(HealthLabel::for_score(40), HealthLabel::Warning);
        assert_eq!(HealthLabel::for_score(39), HealthLabel::Critical);
    }

    #[test]
    fn healthy_profile_scores_excellent() {
        // 50% savings, no debt, 30% invested, disciplined:
        // 0.5·80 + 1·25 + 0.3·50 + 1·20 = 100.
        let health = score_from_totals(&totals(100_000_00, 50_000_00, 30_000_00, 0, 0));
        assert_eq!(health.score, 100);
        assert_eq!(health.label, HealthLabel::Excellent);
    }
}
