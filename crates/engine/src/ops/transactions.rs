use base64::Engine as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, TransactionStatus, categories,
    transactions,
};

use super::{Engine, require_positive_amount, with_tx};

#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    /// Must be > 0.
    pub amount_minor: i64,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub status: TransactionStatus,
}

/// Replace-on-edit field patch; absent fields keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub amount_minor: Option<i64>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub status: Option<TransactionStatus>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, acts as an allow-list of kinds to return.
    pub kinds: Option<Vec<TransactionKind>>,
    /// If present, matches on the canonical category key.
    pub category: Option<String>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidInput(
            "invalid range: from must be < to".to_string(),
        ));
    }
    if filter.kinds.as_ref().is_some_and(|k| k.is_empty()) {
        return Err(EngineError::InvalidInput(
            "kinds must not be empty".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lt(to));
        }
        if let Some(kinds) = &filter.kinds {
            let kinds: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();
            self = self.filter(transactions::Column::Kind.is_in(kinds));
        }
        if let Some(category) = &filter.category {
            self = self.filter(
                transactions::Column::CategoryNorm.eq(categories::canonical_key(category)),
            );
        }
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    occurred_at: DateTime<Utc>,
    transaction_id: Uuid,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

impl Engine {
    /// Records a new transaction, stamped with the user's display currency.
    pub async fn create_transaction(
        &self,
        username: &str,
        new: NewTransaction,
    ) -> ResultEngine<Transaction> {
        require_positive_amount(new.amount_minor)?;
        let category = categories::normalize_display(&new.category)?;
        let currency = self.user_settings(username).await?.currency;

        let model = transactions::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            kind: new.kind.as_str().to_string(),
            amount_minor: new.amount_minor,
            currency: currency.code().to_string(),
            category_norm: categories::canonical_key(&category),
            category,
            occurred_at: new.occurred_at,
            note: new.note,
            status: new.status.as_str().to_string(),
        };

        let active: transactions::ActiveModel = model.into();
        let inserted = transactions::Entity::insert(active)
            .exec_with_returning(self.db())
            .await?;
        Transaction::try_from(inserted)
    }

    /// Lists transactions newest → older, with cursor-based pagination.
    ///
    /// Returns at most `limit` items plus an opaque cursor when older
    /// items remain.
    pub async fn list_transactions_page(
        &self,
        username: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        validate_list_filter(filter)?;
        let limit = limit.clamp(1, 500);

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::Username.eq(username))
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit + 1);

        if let Some(cursor) = cursor {
            let cursor = TransactionsCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::OccurredAt.lt(cursor.occurred_at))
                    .add(
                        Condition::all()
                            .add(transactions::Column::OccurredAt.eq(cursor.occurred_at))
                            .add(transactions::Column::Id.lt(cursor.transaction_id)),
                    ),
            );
        }

        let mut models = query.all(self.db()).await?;
        let next_cursor = if models.len() as u64 > limit {
            models.truncate(limit as usize);
            models.last().map(|last| TransactionsCursor {
                occurred_at: last.occurred_at,
                transaction_id: last.id,
            })
        } else {
            None
        };

        let next_cursor = match next_cursor {
            Some(cursor) => Some(cursor.encode()?),
            None => None,
        };

        let transactions = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((transactions, next_cursor))
    }

    /// Lists every transaction in `[from, to)`, oldest first, for the
    /// aggregation paths.
    pub(crate) async fn transactions_in_window(
        &self,
        username: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<Vec<Transaction>> {
        let filter = TransactionListFilter {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        };
        validate_list_filter(&filter)?;

        let models = transactions::Entity::find()
            .filter(transactions::Column::Username.eq(username))
            .apply_tx_filters(&filter)
            .order_by_asc(transactions::Column::OccurredAt)
            .all(self.db())
            .await?;

        models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }

    /// Applies a field patch to one transaction.
    pub async fn update_transaction(
        &self,
        username: &str,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = patch.amount_minor {
            require_positive_amount(amount_minor)?;
        }
        let category = match &patch.category {
            Some(category) => Some(categories::normalize_display(category)?),
            None => None,
        };

        let updated: transactions::Model = with_tx!(self, |tx| {
            let model = transactions::Entity::find_by_id(id)
                .filter(transactions::Column::Username.eq(username))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction".to_string()))?;

            let mut active: transactions::ActiveModel = model.into();
            if let Some(amount_minor) = patch.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(category) = category {
                active.category_norm = ActiveValue::Set(categories::canonical_key(&category));
                active.category = ActiveValue::Set(category);
            }
            if let Some(note) = patch.note {
                active.note = ActiveValue::Set(Some(note));
            }
            if let Some(status) = patch.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(occurred_at) = patch.occurred_at {
                active.occurred_at = ActiveValue::Set(occurred_at);
            }
            active.update(&tx).await.map_err(EngineError::from)
        })?;

        Transaction::try_from(updated)
    }

    /// Deletes one transaction. Missing ids report `KeyNotFound`.
    pub async fn delete_transaction(&self, username: &str, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Username.eq(username))
            .exec(self.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("transaction".to_string()));
        }
        Ok(())
    }
}
