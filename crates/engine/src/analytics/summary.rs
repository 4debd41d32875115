//! Aggregation of raw transactions into summary statistics.

use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{Currency, Transaction, TransactionKind, categories};

/// Sums per transaction kind over a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income_minor: i64,
    pub expenses_minor: i64,
    pub investment_minor: i64,
    pub emi_minor: i64,
    pub lent_minor: i64,
    pub borrowed_minor: i64,
}

impl Totals {
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut totals = Totals::default();
        for tx in transactions {
            match tx.kind {
                TransactionKind::Income => totals.income_minor += tx.amount_minor,
                TransactionKind::Expense => totals.expenses_minor += tx.amount_minor,
                TransactionKind::Investment => totals.investment_minor += tx.amount_minor,
                TransactionKind::Emi => totals.emi_minor += tx.amount_minor,
                TransactionKind::Lend => totals.lent_minor += tx.amount_minor,
                TransactionKind::Borrow => totals.borrowed_minor += tx.amount_minor,
            }
        }
        totals
    }

    #[must_use]
    pub fn net_savings_minor(&self) -> i64 {
        self.income_minor - self.expenses_minor
    }

    /// `net_savings / income`; `0` when there is no income.
    #[must_use]
    pub fn savings_rate(&self) -> f64 {
        if self.income_minor == 0 {
            return 0.0;
        }
        self.net_savings_minor() as f64 / self.income_minor as f64
    }
}

/// One category's slice of the expense total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount_minor: i64,
    /// Fraction of the grand total in `[0, 1]`; `0` when the total is 0.
    pub share: f64,
}

/// Groups expenses by canonical category key.
///
/// The display name is the first one seen for a key; ordering is by
/// descending amount, then category name, so insertion order never
/// matters. A zero grand total yields `share == 0` for every group.
#[must_use]
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let mut groups: HashMap<String, (String, i64)> = HashMap::new();
    for tx in transactions {
        if tx.kind != TransactionKind::Expense {
            continue;
        }
        let key = categories::canonical_key(&tx.category);
        let entry = groups.entry(key).or_insert_with(|| (tx.category.clone(), 0));
        entry.1 += tx.amount_minor;
    }

    let grand_total: i64 = groups.values().map(|(_, amount)| amount).sum();

    let mut shares: Vec<CategoryShare> = groups
        .into_values()
        .map(|(category, amount_minor)| CategoryShare {
            category,
            amount_minor,
            share: if grand_total == 0 {
                0.0
            } else {
                amount_minor as f64 / grand_total as f64
            },
        })
        .collect();

    shares.sort_by(|a, b| {
        b.amount_minor
            .cmp(&a.amount_minor)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

/// Income/expense/net per calendar month (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub year: i32,
    pub month: u32,
    pub income_minor: i64,
    pub expenses_minor: i64,
}

impl MonthlyFlow {
    #[must_use]
    pub fn net_minor(&self) -> i64 {
        self.income_minor - self.expenses_minor
    }
}

/// Buckets income and expenses per calendar month, oldest first.
#[must_use]
pub fn monthly_flow(transactions: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut buckets: HashMap<(i32, u32), (i64, i64)> = HashMap::new();
    for tx in transactions {
        let key = (tx.occurred_at.year(), tx.occurred_at.month());
        let bucket = buckets.entry(key).or_default();
        match tx.kind {
            TransactionKind::Income => bucket.0 += tx.amount_minor,
            TransactionKind::Expense => bucket.1 += tx.amount_minor,
            _ => {}
        }
    }

    let mut months: Vec<MonthlyFlow> = buckets
        .into_iter()
        .map(|((year, month), (income_minor, expenses_minor))| MonthlyFlow {
            year,
            month,
            income_minor,
            expenses_minor,
        })
        .collect();
    months.sort_by_key(|m| (m.year, m.month));
    months
}

/// The full aggregate the dashboard renders for one window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub currency: Currency,
    pub totals: Totals,
    pub net_savings_minor: i64,
    pub savings_rate: f64,
    pub categories: Vec<CategoryShare>,
    pub monthly: Vec<MonthlyFlow>,
}

impl FinancialSummary {
    #[must_use]
    pub fn compute(currency: Currency, transactions: &[Transaction]) -> Self {
        let totals = Totals::from_transactions(transactions);
        FinancialSummary {
            currency,
            totals,
            net_savings_minor: totals.net_savings_minor(),
            savings_rate: totals.savings_rate(),
            categories: expense_breakdown(transactions),
            monthly: monthly_flow(transactions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn tx(kind: TransactionKind, amount_minor: i64, category: &str, month: u32) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind,
            amount_minor,
            currency: Currency::Inr,
            category: category.to_string(),
            occurred_at: Utc.with_ymd_and_hms(2026, month, 10, 12, 0, 0).unwrap(),
            note: None,
            status: crate::TransactionStatus::Completed,
        }
    }

    #[test]
    fn savings_rate_is_net_over_income() {
        let txs = vec![
            tx(TransactionKind::Income, 100_000_00, "Salary", 7),
            tx(TransactionKind::Expense, 40_000_00, "Food", 7),
        ];
        let totals = Totals::from_transactions(&txs);
        assert_eq!(totals.net_savings_minor(), 60_000_00);
        assert!((totals.savings_rate() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn savings_rate_is_zero_without_income() {
        let txs = vec![tx(TransactionKind::Expense, 500_00, "Food", 7)];
        assert_eq!(Totals::from_transactions(&txs).savings_rate(), 0.0);
    }

    #[test]
    fn breakdown_groups_case_insensitively_and_orders_by_amount() {
        let txs = vec![
            tx(TransactionKind::Expense, 300_00, "food", 7),
            tx(TransactionKind::Expense, 700_00, "Food", 7),
            tx(TransactionKind::Expense, 1_500_00, "Travel", 7),
            tx(TransactionKind::Income, 9_000_00, "Salary", 7),
        ];
        let shares = expense_breakdown(&txs);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, "Travel");
        assert_eq!(shares[1].amount_minor, 1_000_00);
        assert!((shares[0].share - 0.6).abs() < 1e-9);
    }

    #[test]
    fn breakdown_of_zero_total_has_zero_shares() {
        let txs = vec![tx(TransactionKind::Income, 9_000_00, "Salary", 7)];
        assert!(expense_breakdown(&txs).is_empty());

        // A lone zero-amount group must not divide by zero.
        let txs = vec![tx(TransactionKind::Expense, 0, "Food", 7)];
        let shares = expense_breakdown(&txs);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].share, 0.0);
    }

    #[test]
    fn monthly_flow_buckets_by_calendar_month() {
        let txs = vec![
            tx(TransactionKind::Income, 1_000_00, "Salary", 6),
            tx(TransactionKind::Expense, 400_00, "Food", 6),
            tx(TransactionKind::Income, 1_000_00, "Salary", 7),
            tx(TransactionKind::Investment, 9_999_00, "Stocks", 7),
        ];
        let months = monthly_flow(&txs);
        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].month), (2026, 6));
        assert_eq!(months[0].net_minor(), 600_00);
        // Investments do not count as expenses in the trend.
        assert_eq!(months[1].expenses_minor, 0);
    }
}
