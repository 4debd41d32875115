//! Fintrack domain engine.
//!
//! Holds the typed record collections (transactions, budgets, loans,
//! lending, recurring payments, settings, subscriptions), the pure
//! analytics over them (summary, health score, budget utilization, loan
//! math), money/currency formatting and the monthly report renderer.
//! Persistence goes through sea-orm; the [`Engine`] ops are the only
//! write path.

pub use budgets::Budget;
pub use currency::Currency;
pub use error::EngineError;
pub use lending::{LendingEntry, LendingKind, LendingStatus};
pub use loan_payments::LoanPayment;
pub use loans::{Loan, LoanStatus};
pub use money::Money;
pub use ops::{
    DueOccurrence, Engine, EngineBuilder, ImportOutcome, ImportRow, LendingListFilter,
    LoanProgress, NewLending, NewLoan, NewRecurring, NewTransaction, PersonBalance,
    RecurringPatch, SettingsPatch, TransactionListFilter, TransactionPatch,
};
pub use recurring::{Frequency, RecurringPayment};
pub use subscriptions::{Plan, Subscription, SubscriptionStatus};
pub use transactions::{Transaction, TransactionKind, TransactionStatus};
pub use user_settings::UserSettings;

pub mod analytics;
pub mod budgets;
pub mod categories;
mod currency;
mod error;
pub mod lending;
pub mod loan_payments;
pub mod loans;
mod money;
mod ops;
pub mod recurring;
pub mod report;
pub mod subscriptions;
pub mod transactions;
pub mod user_settings;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
