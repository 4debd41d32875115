//! Premium subscription state and the feature gate derived from it.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub plan: String,
    pub status: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Username",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Premium,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl TryFrom<&str> for Plan {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            other => Err(EngineError::InvalidInput(format!("invalid plan: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
    Trial,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Trial => "trial",
        }
    }
}

impl TryFrom<&str> for SubscriptionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            "trial" => Ok(Self::Trial),
            other => Err(EngineError::InvalidInput(format!(
                "invalid subscription status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Whether the premium gate is open at `now`.
    ///
    /// Open for an `Active` subscription inside its period and for a
    /// `Trial` whose trial end lies in the future. Cancelled and expired
    /// subscriptions never open the gate.
    #[must_use]
    pub fn premium_at(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            SubscriptionStatus::Active => now < self.period_end,
            SubscriptionStatus::Trial => self.trial_ends_at.is_some_and(|end| now < end),
            SubscriptionStatus::Cancelled | SubscriptionStatus::Expired => false,
        }
    }
}

impl TryFrom<Model> for Subscription {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: model.id,
            plan: Plan::try_from(model.plan.as_str())?,
            status: SubscriptionStatus::try_from(model.status.as_str())?,
            period_start: model.period_start,
            period_end: model.period_end,
            trial_ends_at: model.trial_ends_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn subscription(status: SubscriptionStatus, trial_ends_at: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            plan: Plan::Premium,
            status,
            period_start: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            period_end: Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
            trial_ends_at,
        }
    }

    #[test]
    fn active_subscription_opens_gate_inside_period() {
        let sub = subscription(SubscriptionStatus::Active, None);
        let inside = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        assert!(sub.premium_at(inside));
        assert!(!sub.premium_at(after));
    }

    #[test]
    fn expired_trial_closes_gate() {
        let end = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let sub = subscription(SubscriptionStatus::Trial, Some(end));
        assert!(sub.premium_at(Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap()));
        assert!(!sub.premium_at(Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn cancelled_never_opens_gate() {
        let sub = subscription(SubscriptionStatus::Cancelled, None);
        assert!(!sub.premium_at(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()));
    }
}
