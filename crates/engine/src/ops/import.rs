use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ResultEngine, TransactionKind, TransactionStatus, categories, transactions,
};

use super::{Engine, require_positive_amount, with_tx};

/// One spreadsheet row, already parsed and validated by the caller.
#[derive(Clone, Debug)]
pub struct ImportRow {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Outcome of a whole import, reported as one unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: u64,
    pub duplicates: u64,
    pub total: u64,
}

impl Engine {
    /// Imports external rows, skipping ones that already exist.
    ///
    /// A row is a duplicate when a stored transaction matches on
    /// (occurred_at, kind, amount, canonical category). The whole batch
    /// runs in one DB transaction: either every new row lands or none
    /// does.
    pub async fn import_transactions(
        &self,
        username: &str,
        rows: Vec<ImportRow>,
    ) -> ResultEngine<ImportOutcome> {
        for row in &rows {
            require_positive_amount(row.amount_minor)?;
            categories::normalize_display(&row.category)?;
        }
        let currency = self.user_settings(username).await?.currency;

        with_tx!(self, |tx| {
            let mut outcome = ImportOutcome {
                total: rows.len() as u64,
                ..Default::default()
            };

            for row in rows {
                let category = categories::normalize_display(&row.category)?;
                let category_norm = categories::canonical_key(&category);

                let existing = transactions::Entity::find()
                    .filter(transactions::Column::Username.eq(username))
                    .filter(transactions::Column::OccurredAt.eq(row.occurred_at))
                    .filter(transactions::Column::Kind.eq(row.kind.as_str()))
                    .filter(transactions::Column::AmountMinor.eq(row.amount_minor))
                    .filter(transactions::Column::CategoryNorm.eq(category_norm.as_str()))
                    .one(&tx)
                    .await?;
                if existing.is_some() {
                    outcome.duplicates += 1;
                    continue;
                }

                let active: transactions::ActiveModel = transactions::Model {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    kind: row.kind.as_str().to_string(),
                    amount_minor: row.amount_minor,
                    currency: currency.code().to_string(),
                    category,
                    category_norm,
                    occurred_at: row.occurred_at,
                    note: row.note,
                    status: TransactionStatus::Completed.as_str().to_string(),
                }
                .into();
                transactions::Entity::insert(active).exec(&tx).await?;
                outcome.imported += 1;
            }

            Ok(outcome)
        })
    }
}
