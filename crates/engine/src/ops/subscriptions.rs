use chrono::{DateTime, Days, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Plan, ResultEngine, Subscription, SubscriptionStatus, subscriptions,
};

use super::{Engine, with_tx};

/// Default trial length granted on first activation.
const TRIAL_DAYS: u64 = 14;

impl Engine {
    /// The user's most recent subscription, if any ever existed.
    pub async fn subscription(&self, username: &str) -> ResultEngine<Option<Subscription>> {
        let model = subscriptions::Entity::find()
            .filter(subscriptions::Column::Username.eq(username))
            .order_by_desc(subscriptions::Column::PeriodStart)
            .one(self.db())
            .await?;

        model.map(Subscription::try_from).transpose()
    }

    /// Whether the premium gate is open for the user at `now`.
    pub async fn is_premium(&self, username: &str, now: DateTime<Utc>) -> ResultEngine<bool> {
        Ok(self
            .subscription(username)
            .await?
            .map(|sub| sub.premium_at(now))
            .unwrap_or(false))
    }

    /// Starts a trial for a user who never had one.
    pub async fn start_trial(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Subscription> {
        let inserted: subscriptions::Model = with_tx!(self, |tx| {
            let existing = subscriptions::Entity::find()
                .filter(subscriptions::Column::Username.eq(username))
                .one(&tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey("subscription".to_string()));
            }

            let trial_end = now + Days::new(TRIAL_DAYS);
            let active: subscriptions::ActiveModel = subscriptions::Model {
                id: Uuid::new_v4(),
                username: username.to_string(),
                plan: Plan::Premium.as_str().to_string(),
                status: SubscriptionStatus::Trial.as_str().to_string(),
                period_start: now,
                period_end: trial_end,
                trial_ends_at: Some(trial_end),
            }
            .into();
            subscriptions::Entity::insert(active)
                .exec_with_returning(&tx)
                .await
                .map_err(EngineError::from)
        })?;

        Subscription::try_from(inserted)
    }

    /// Activates a paid period, superseding whatever came before.
    ///
    /// Earlier rows stay for history; the newest `period_start` wins when
    /// reading back.
    pub async fn activate_subscription(
        &self,
        username: &str,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> ResultEngine<Subscription> {
        if period_start >= period_end {
            return Err(EngineError::InvalidInput(
                "period start must precede period end".to_string(),
            ));
        }

        let model = subscriptions::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            plan: Plan::Premium.as_str().to_string(),
            status: SubscriptionStatus::Active.as_str().to_string(),
            period_start,
            period_end,
            trial_ends_at: None,
        };

        let active: subscriptions::ActiveModel = model.into();
        let inserted = subscriptions::Entity::insert(active)
            .exec_with_returning(self.db())
            .await?;
        Subscription::try_from(inserted)
    }

    /// Marks the user's current subscription as cancelled.
    pub async fn cancel_subscription(&self, username: &str) -> ResultEngine<Subscription> {
        let updated: subscriptions::Model = with_tx!(self, |tx| {
            let model = subscriptions::Entity::find()
                .filter(subscriptions::Column::Username.eq(username))
                .order_by_desc(subscriptions::Column::PeriodStart)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("subscription".to_string()))?;

            let mut active: subscriptions::ActiveModel = model.into();
            active.status = ActiveValue::Set(SubscriptionStatus::Cancelled.as_str().to_string());
            active.update(&tx).await.map_err(EngineError::from)
        })?;

        Subscription::try_from(updated)
    }
}
