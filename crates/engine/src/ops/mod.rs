use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod budgets;
mod import;
mod lending;
mod loans;
mod recurring;
mod settings;
mod subscriptions;
mod summary;
mod transactions;

pub use import::{ImportOutcome, ImportRow};
pub use lending::{LendingListFilter, NewLending, PersonBalance};
pub use loans::{LoanProgress, NewLoan};
pub use recurring::{DueOccurrence, NewRecurring, RecurringPatch};
pub use settings::SettingsPatch;
pub use transactions::{NewTransaction, TransactionListFilter, TransactionPatch};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// DB-backed operations over the user's collections.
///
/// Every method is scoped by the caller's username; rows belonging to
/// other users are invisible, not forbidden.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.database
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
}

impl EngineBuilder {
    #[must_use]
    pub fn database(mut self, database: DatabaseConnection) -> Self {
        self.database = Some(database);
        self
    }

    /// Builds the engine, verifying the connection is usable.
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self
            .database
            .ok_or_else(|| EngineError::InvalidInput("database is required".to_string()))?;
        database.ping().await?;
        Ok(Engine { database })
    }
}

/// Validates a user-supplied amount for a create/update path.
pub(crate) fn require_positive_amount(amount_minor: i64) -> ResultEngine<i64> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(amount_minor)
}

/// Validates a required human-readable name (loan name, person, title).
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
