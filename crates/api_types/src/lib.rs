use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Expense,
        Income,
        Lend,
        Borrow,
        Investment,
        Emi,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        #[default]
        Completed,
        Pending,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        /// Must be > 0. The kind defines how the amount is aggregated.
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        pub status: Option<TransactionStatus>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    /// Filter payload for listing transactions.
    ///
    /// `from` is inclusive and `to` is exclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub from: Option<DateTime<FixedOffset>>,
        pub to: Option<DateTime<FixedOffset>>,
        /// If present, acts as an allow-list of kinds to return.
        pub kinds: Option<Vec<TransactionKind>>,
        pub category: Option<String>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        pub amount_minor: i64,
        pub currency: Currency,
        pub category: String,
        pub note: Option<String>,
        pub status: TransactionStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    /// Replace-on-edit update. Absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        pub category: Option<String>,
        pub note: Option<String>,
        pub status: Option<TransactionStatus>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }
}

pub mod budget {
    use super::*;

    /// Creates or replaces the budget for a category (one per category).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpsert {
        pub category: String,
        pub monthly_limit_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub monthly_limit_minor: i64,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod loan {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanNew {
        pub name: String,
        pub principal_minor: i64,
        /// Nominal yearly rate in percent, e.g. `9.5`.
        pub interest_rate_pct: f64,
        pub tenure_months: u32,
        pub start_date: NaiveDate,
        /// If absent, the server derives the EMI from principal/rate/tenure.
        pub monthly_emi_minor: Option<i64>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LoanStatus {
        Active,
        Closed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanView {
        pub id: Uuid,
        pub name: String,
        pub principal_minor: i64,
        pub interest_rate_pct: f64,
        pub tenure_months: u32,
        pub monthly_emi_minor: i64,
        pub start_date: NaiveDate,
        pub status: LoanStatus,
        /// Sum of recorded payments.
        pub paid_minor: i64,
        /// Amortized principal still owed after the recorded payments.
        pub outstanding_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanListResponse {
        pub loans: Vec<LoanView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LoanUpdate {
        pub name: Option<String>,
        pub status: Option<LoanStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanPaymentNew {
        pub amount_minor: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub paid_at: DateTime<FixedOffset>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanPaymentView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub paid_at: DateTime<FixedOffset>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanPaymentListResponse {
        pub payments: Vec<LoanPaymentView>,
    }
}

pub mod lending {
    use super::*;

    /// Direction of money relative to the user's own accounts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LendingKind {
        Lent,
        Borrowed,
        RepaidByThem,
        RepaidByMe,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LendingStatus {
        #[default]
        Pending,
        Settled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LendingNew {
        pub kind: LendingKind,
        pub person: String,
        pub amount_minor: i64,
        pub occurred_at: DateTime<FixedOffset>,
        pub status: Option<LendingStatus>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LendingList {
        pub from: Option<DateTime<FixedOffset>>,
        pub to: Option<DateTime<FixedOffset>>,
        pub person: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LendingView {
        pub id: Uuid,
        pub kind: LendingKind,
        pub person: String,
        pub amount_minor: i64,
        pub occurred_at: DateTime<FixedOffset>,
        pub status: LendingStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LendingListResponse {
        pub entries: Vec<LendingView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LendingUpdate {
        pub amount_minor: Option<i64>,
        pub status: Option<LendingStatus>,
    }

    /// Net position towards one counterparty.
    ///
    /// Positive `net_minor` means they owe the user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonBalance {
        pub person: String,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LendingBalancesResponse {
        pub balances: Vec<PersonBalance>,
    }
}

pub mod recurring {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Weekly,
        Monthly,
        Quarterly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub frequency: Frequency,
        pub next_due_date: NaiveDate,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub frequency: Frequency,
        pub next_due_date: NaiveDate,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringListResponse {
        pub payments: Vec<RecurringView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecurringUpdate {
        pub title: Option<String>,
        pub amount_minor: Option<i64>,
        pub category: Option<String>,
        pub frequency: Option<Frequency>,
        pub next_due_date: Option<NaiveDate>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DueSoonRequest {
        pub within_days: u32,
    }

    /// An occurrence of an active recurring payment inside the window.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DueOccurrence {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub due_on: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DueSoonResponse {
        pub occurrences: Vec<DueOccurrence>,
    }
}

pub mod settings {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettingsView {
        pub currency: Currency,
        /// IANA timezone name, e.g. `Asia/Kolkata`.
        pub timezone: String,
        pub spreadsheet_url: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SettingsUpdate {
        pub currency: Option<Currency>,
        pub timezone: Option<String>,
        pub spreadsheet_url: Option<String>,
    }
}

pub mod subscription {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Plan {
        #[default]
        Free,
        Premium,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SubscriptionStatus {
        Active,
        Cancelled,
        Expired,
        Trial,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionView {
        pub plan: Plan,
        pub status: SubscriptionStatus,
        pub period_start: DateTime<FixedOffset>,
        pub period_end: DateTime<FixedOffset>,
        pub trial_ends_at: Option<DateTime<FixedOffset>>,
        /// Whether the premium gate is currently open for this user.
        pub premium: bool,
    }
}

pub mod stats {
    use super::*;

    /// Date window for the aggregates. `from` inclusive, `to` exclusive.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsRequest {
        pub from: DateTime<FixedOffset>,
        pub to: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub category: String,
        pub amount_minor: i64,
        /// Fraction of the grand total in `[0, 1]`; `0` when the total is 0.
        pub share: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyFlow {
        pub year: i32,
        pub month: u32,
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum HealthLabel {
        Excellent,
        Good,
        Warning,
        Critical,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthView {
        /// Score in `[0, 100]`.
        pub score: u8,
        pub label: HealthLabel,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub currency: Currency,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub total_investment_minor: i64,
        pub total_emi_minor: i64,
        pub money_lent_minor: i64,
        pub money_borrowed_minor: i64,
        pub net_savings_minor: i64,
        /// `net_savings / income`; `0` when income is 0.
        pub savings_rate: f64,
        pub categories: Vec<CategoryShare>,
        pub monthly: Vec<MonthlyFlow>,
        pub health: HealthView,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetHealth {
        OnTrack,
        Warning,
        Exceeded,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub category: String,
        pub limit_minor: i64,
        pub spent_minor: i64,
        /// `spent / limit · 100`; `0` when the limit is 0.
        pub percent_used: f64,
        /// May be negative when over budget.
        pub remaining_minor: i64,
        pub status: BudgetHealth,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusResponse {
        pub statuses: Vec<BudgetStatusView>,
    }
}

pub mod report {
    use super::*;

    /// Requests the monthly report document for the given calendar month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportRequest {
        pub year: i32,
        pub month: u32,
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderNew {
        pub amount_minor: i64,
        pub currency: Currency,
    }

    /// Checkout handoff data for the client-side payment widget.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderCreated {
        pub order_id: String,
        pub amount_minor: i64,
        pub currency: Currency,
        pub publishable_key: String,
    }
}

pub mod sync {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SyncAction {
        Authenticate,
        Sync,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncRequest {
        pub action: SyncAction,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum SyncResponse {
        /// Authorization redirect for the spreadsheet provider.
        Redirect { url: String },
        /// Import outcome; reported as one unit for the whole sync.
        Report {
            imported: u64,
            duplicates: u64,
            total: u64,
            message: String,
        },
    }
}
