//! Derived financial metrics.
//!
//! Everything in this module is a pure function over already-fetched
//! records: totals and savings rate, category breakdown, monthly cash-flow
//! trend, the health-score heuristic, budget utilization and loan/EMI
//! math. No I/O, no hidden state; the DB-backed ops layer feeds it.

mod budgets;
mod health;
mod loans;
mod summary;

pub use budgets::{BudgetHealth, BudgetStatus, budget_statuses, utilization};
pub use health::{HealthLabel, HealthScore, score_from_totals};
pub use loans::{monthly_emi, outstanding_principal, total_interest, total_payable};
pub use summary::{CategoryShare, FinancialSummary, MonthlyFlow, Totals};
