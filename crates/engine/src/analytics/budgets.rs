//! Per-category budget utilization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Budget, Transaction, TransactionKind, categories};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    OnTrack,
    Warning,
    Exceeded,
}

impl BudgetHealth {
    /// Classification is by strict inequality: `> 90` exceeded, `> 70`
    /// warning. Exactly 90.0% is still a warning, not exceeded.
    #[must_use]
    pub fn for_percent(percent: f64) -> Self {
        if percent > 90.0 {
            Self::Exceeded
        } else if percent > 70.0 {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit_minor: i64,
    pub spent_minor: i64,
    /// `spent / limit · 100`; `0` when the limit is 0.
    pub percent_used: f64,
    /// May be negative when over budget.
    pub remaining_minor: i64,
    pub status: BudgetHealth,
}

/// Utilization of a single budget line.
#[must_use]
pub fn utilization(category: &str, limit_minor: i64, spent_minor: i64) -> BudgetStatus {
    let percent_used = if limit_minor == 0 {
        0.0
    } else {
        spent_minor as f64 / limit_minor as f64 * 100.0
    };
    BudgetStatus {
        category: category.to_string(),
        limit_minor,
        spent_minor,
        percent_used,
        remaining_minor: limit_minor - spent_minor,
        status: BudgetHealth::for_percent(percent_used),
    }
}

/// Statuses for every budgeted category against the window's expenses.
///
/// Spending is matched on the canonical category key; categories without
/// a budget line are not reported.
#[must_use]
pub fn budget_statuses(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetStatus> {
    let mut spent_by_key: HashMap<String, i64> = HashMap::new();
    for tx in transactions {
        if tx.kind != TransactionKind::Expense {
            continue;
        }
        *spent_by_key
            .entry(categories::canonical_key(&tx.category))
            .or_default() += tx.amount_minor;
    }

    let mut statuses: Vec<BudgetStatus> = budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_key
                .get(&categories::canonical_key(&budget.category))
                .copied()
                .unwrap_or(0);
            utilization(&budget.category, budget.monthly_limit_minor, spent)
        })
        .collect();
    statuses.sort_by(|a, b| {
        b.percent_used
            .total_cmp(&a.percent_used)
            .then_with(|| a.category.cmp(&b.category))
    });
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_thresholds_are_strict() {
        assert_eq!(utilization("Food", 1_000_00, 950_00).status, BudgetHealth::Exceeded);
        assert_eq!(utilization("Food", 1_000_00, 750_00).status, BudgetHealth::Warning);
        assert_eq!(utilization("Food", 1_000_00, 500_00).status, BudgetHealth::OnTrack);
        // Exactly at the boundaries.
        assert_eq!(utilization("Food", 1_000_00, 900_00).status, BudgetHealth::Warning);
        assert_eq!(utilization("Food", 1_000_00, 700_00).status, BudgetHealth::OnTrack);
    }

    #[test]
    fn percent_and_remaining_are_reported() {
        let status = utilization("Food", 1_000_00, 950_00);
        assert!((status.percent_used - 95.0).abs() < 1e-9);
        assert_eq!(status.remaining_minor, 50_00);
    }

    #[test]
    fn zero_limit_reports_zero_percent() {
        let status = utilization("Misc", 0, 123_00);
        assert_eq!(status.percent_used, 0.0);
        assert_eq!(status.status, BudgetHealth::OnTrack);
        assert_eq!(status.remaining_minor, -123_00);
    }

    #[test]
    fn overspending_goes_negative() {
        let status = utilization("Food", 1_000_00, 1_200_00);
        assert_eq!(status.remaining_minor, -200_00);
        assert_eq!(status.status, BudgetHealth::Exceeded);
    }
}
