use chrono::{Days, NaiveDate};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Frequency, RecurringPayment, ResultEngine, categories, recurring,
};

use super::{Engine, normalize_required_name, require_positive_amount, with_tx};

#[derive(Clone, Debug)]
pub struct NewRecurring {
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RecurringPatch {
    pub title: Option<String>,
    pub amount_minor: Option<i64>,
    pub category: Option<String>,
    pub frequency: Option<Frequency>,
    pub next_due_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// A due date of one recurring payment inside a lookahead window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueOccurrence {
    pub id: Uuid,
    pub title: String,
    pub amount_minor: i64,
    pub due_on: NaiveDate,
}

impl Engine {
    pub async fn create_recurring(
        &self,
        username: &str,
        new: NewRecurring,
    ) -> ResultEngine<RecurringPayment> {
        let title = normalize_required_name(&new.title, "title")?;
        require_positive_amount(new.amount_minor)?;
        let category = categories::normalize_display(&new.category)?;

        let model = recurring::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            title,
            amount_minor: new.amount_minor,
            category,
            frequency: new.frequency.as_str().to_string(),
            next_due_date: new.next_due_date,
            is_active: new.is_active,
        };

        let active: recurring::ActiveModel = model.into();
        let inserted = recurring::Entity::insert(active)
            .exec_with_returning(self.db())
            .await?;
        RecurringPayment::try_from(inserted)
    }

    /// Lists recurring payments by next due date.
    pub async fn recurring_payments(&self, username: &str) -> ResultEngine<Vec<RecurringPayment>> {
        let models = recurring::Entity::find()
            .filter(recurring::Column::Username.eq(username))
            .order_by_asc(recurring::Column::NextDueDate)
            .all(self.db())
            .await?;

        models
            .into_iter()
            .map(RecurringPayment::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }

    pub async fn update_recurring(
        &self,
        username: &str,
        id: Uuid,
        patch: RecurringPatch,
    ) -> ResultEngine<RecurringPayment> {
        let title = match &patch.title {
            Some(title) => Some(normalize_required_name(title, "title")?),
            None => None,
        };
        if let Some(amount_minor) = patch.amount_minor {
            require_positive_amount(amount_minor)?;
        }
        let category = match &patch.category {
            Some(category) => Some(categories::normalize_display(category)?),
            None => None,
        };

        let updated: recurring::Model = with_tx!(self, |tx| {
            let model = recurring::Entity::find_by_id(id)
                .filter(recurring::Column::Username.eq(username))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("recurring payment".to_string()))?;

            let mut active: recurring::ActiveModel = model.into();
            if let Some(title) = title {
                active.title = ActiveValue::Set(title);
            }
            if let Some(amount_minor) = patch.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(category) = category {
                active.category = ActiveValue::Set(category);
            }
            if let Some(frequency) = patch.frequency {
                active.frequency = ActiveValue::Set(frequency.as_str().to_string());
            }
            if let Some(next_due_date) = patch.next_due_date {
                active.next_due_date = ActiveValue::Set(next_due_date);
            }
            if let Some(is_active) = patch.is_active {
                active.is_active = ActiveValue::Set(is_active);
            }
            active.update(&tx).await.map_err(EngineError::from)
        })?;

        RecurringPayment::try_from(updated)
    }

    pub async fn delete_recurring(&self, username: &str, id: Uuid) -> ResultEngine<()> {
        let result = recurring::Entity::delete_many()
            .filter(recurring::Column::Id.eq(id))
            .filter(recurring::Column::Username.eq(username))
            .exec(self.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("recurring payment".to_string()));
        }
        Ok(())
    }

    /// Upcoming due dates of active recurring payments within
    /// `within_days` of `today`, soonest first. Records are not mutated.
    pub async fn recurring_due_within(
        &self,
        username: &str,
        today: NaiveDate,
        within_days: u32,
    ) -> ResultEngine<Vec<DueOccurrence>> {
        let end = today + Days::new(within_days as u64);
        let payments = self.recurring_payments(username).await?;

        let mut occurrences = Vec::new();
        for payment in payments {
            for due_on in payment.occurrences_between(today, end) {
                occurrences.push(DueOccurrence {
                    id: payment.id,
                    title: payment.title.clone(),
                    amount_minor: payment.amount_minor,
                    due_on,
                });
            }
        }
        occurrences.sort_by(|a, b| a.due_on.cmp(&b.due_on).then_with(|| a.title.cmp(&b.title)));
        Ok(occurrences)
    }
}
