use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, LendingEntry, LendingKind, LendingStatus, ResultEngine, lending,
};

use super::{Engine, normalize_required_name, require_positive_amount, with_tx};

#[derive(Clone, Debug)]
pub struct NewLending {
    pub kind: LendingKind,
    pub person: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub status: LendingStatus,
}

/// Filters for listing lending entries; `[from, to)` in UTC.
#[derive(Clone, Debug, Default)]
pub struct LendingListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub person: Option<String>,
}

/// Net position towards one counterparty; positive means they owe the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonBalance {
    pub person: String,
    pub net_minor: i64,
}

impl Engine {
    pub async fn create_lending(
        &self,
        username: &str,
        new: NewLending,
    ) -> ResultEngine<LendingEntry> {
        require_positive_amount(new.amount_minor)?;
        let person = normalize_required_name(&new.person, "person")?;

        let model = lending::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            kind: new.kind.as_str().to_string(),
            person,
            amount_minor: new.amount_minor,
            occurred_at: new.occurred_at,
            status: new.status.as_str().to_string(),
        };

        let active: lending::ActiveModel = model.into();
        let inserted = lending::Entity::insert(active)
            .exec_with_returning(self.db())
            .await?;
        LendingEntry::try_from(inserted)
    }

    /// Lists lending entries newest first.
    pub async fn lending_entries(
        &self,
        username: &str,
        filter: &LendingListFilter,
    ) -> ResultEngine<Vec<LendingEntry>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from >= to
        {
            return Err(EngineError::InvalidInput(
                "invalid range: from must be < to".to_string(),
            ));
        }

        let mut query = lending::Entity::find()
            .filter(lending::Column::Username.eq(username))
            .order_by_desc(lending::Column::OccurredAt);
        if let Some(from) = filter.from {
            query = query.filter(lending::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(lending::Column::OccurredAt.lt(to));
        }
        if let Some(person) = &filter.person {
            query = query.filter(lending::Column::Person.eq(person.trim()));
        }

        let models = query.all(self.db()).await?;
        models
            .into_iter()
            .map(LendingEntry::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }

    pub async fn update_lending(
        &self,
        username: &str,
        id: Uuid,
        amount_minor: Option<i64>,
        status: Option<LendingStatus>,
    ) -> ResultEngine<LendingEntry> {
        if let Some(amount_minor) = amount_minor {
            require_positive_amount(amount_minor)?;
        }

        let updated: lending::Model = with_tx!(self, |tx| {
            let model = lending::Entity::find_by_id(id)
                .filter(lending::Column::Username.eq(username))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("lending entry".to_string()))?;

            let mut active: lending::ActiveModel = model.into();
            if let Some(amount_minor) = amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(status) = status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            active.update(&tx).await.map_err(EngineError::from)
        })?;

        LendingEntry::try_from(updated)
    }

    pub async fn delete_lending(&self, username: &str, id: Uuid) -> ResultEngine<()> {
        let result = lending::Entity::delete_many()
            .filter(lending::Column::Id.eq(id))
            .filter(lending::Column::Username.eq(username))
            .exec(self.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("lending entry".to_string()));
        }
        Ok(())
    }

    /// Net balance per counterparty over all lending entries.
    ///
    /// `Lent` and `RepaidByMe` raise what they owe the user; `Borrowed`
    /// and `RepaidByThem` lower it. People with a settled zero balance
    /// are still reported.
    pub async fn lending_balances(&self, username: &str) -> ResultEngine<Vec<PersonBalance>> {
        let entries = self
            .lending_entries(username, &LendingListFilter::default())
            .await?;

        let mut by_person: HashMap<String, i64> = HashMap::new();
        for entry in entries {
            let delta = match entry.kind {
                LendingKind::Lent | LendingKind::RepaidByMe => entry.amount_minor,
                LendingKind::Borrowed | LendingKind::RepaidByThem => -entry.amount_minor,
            };
            *by_person.entry(entry.person).or_default() += delta;
        }

        let mut balances: Vec<PersonBalance> = by_person
            .into_iter()
            .map(|(person, net_minor)| PersonBalance { person, net_minor })
            .collect();
        balances.sort_by(|a, b| a.person.cmp(&b.person));
        Ok(balances)
    }
}
