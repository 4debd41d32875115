//! Recurring payments (rent, subscriptions, insurance premiums).

use chrono::{Datelike, Days, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub frequency: String,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
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

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Next due date after `date` for this cadence.
    ///
    /// Month-based cadences clamp to the last day of shorter months
    /// (Jan 31 + 1 month = Feb 28/29).
    #[must_use]
    pub fn advance(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Weekly => date + Days::new(7),
            Self::Monthly => add_months(date, 1),
            Self::Quarterly => add_months(date, 3),
            Self::Yearly => add_months(date, 12),
        }
    }
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    let day = date.day();

    (0..4)
        .filter_map(|back| NaiveDate::from_ymd_opt(year, month, day.saturating_sub(back).max(1)))
        .next()
        .unwrap_or(date)
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidInput(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecurringPayment {
    pub id: Uuid,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
}

impl RecurringPayment {
    /// Occurrences of this payment with a due date in `[start, end]`.
    ///
    /// Walks forward from `next_due_date` without mutating the record;
    /// inactive payments yield nothing.
    #[must_use]
    pub fn occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        if !self.is_active || end < start {
            return Vec::new();
        }

        let mut due = self.next_due_date;
        let mut occurrences = Vec::new();
        while due <= end {
            if due >= start {
                occurrences.push(due);
            }
            let next = self.frequency.advance(due);
            if next <= due {
                break;
            }
            due = next;
        }
        occurrences
    }
}

impl TryFrom<Model> for RecurringPayment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(RecurringPayment {
            id: model.id,
            title: model.title,
            amount_minor: model.amount_minor,
            category: model.category,
            frequency: Frequency::try_from(model.frequency.as_str())?,
            next_due_date: model.next_due_date,
            is_active: model.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_advance_clamps_to_month_end() {
        assert_eq!(Frequency::Monthly.advance(date(2026, 1, 31)), date(2026, 2, 28));
        assert_eq!(Frequency::Monthly.advance(date(2026, 3, 15)), date(2026, 4, 15));
        assert_eq!(Frequency::Yearly.advance(date(2026, 12, 31)), date(2027, 12, 31));
    }

    #[test]
    fn occurrences_walk_the_window_without_mutation() {
        let rent = RecurringPayment {
            id: Uuid::new_v4(),
            title: "Rent".to_string(),
            amount_minor: 15_000_00,
            category: "Housing".to_string(),
            frequency: Frequency::Monthly,
            next_due_date: date(2026, 8, 1),
            is_active: true,
        };

        let hits = rent.occurrences_between(date(2026, 8, 1), date(2026, 10, 15));
        assert_eq!(hits, vec![date(2026, 8, 1), date(2026, 9, 1), date(2026, 10, 1)]);
        assert_eq!(rent.next_due_date, date(2026, 8, 1));
    }

    #[test]
    fn inactive_payments_yield_no_occurrences() {
        let paused = RecurringPayment {
            id: Uuid::new_v4(),
            title: "Gym".to_string(),
            amount_minor: 1_000_00,
            category: "Health".to_string(),
            frequency: Frequency::Weekly,
            next_due_date: date(2026, 8, 3),
            is_active: false,
        };
        assert!(paused.occurrences_between(date(2026, 8, 1), date(2026, 9, 1)).is_empty());
    }
}
