//! Loans repaid in fixed monthly installments (EMIs).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub principal_minor: i64,
    /// Nominal yearly rate in percent.
    pub interest_rate_pct: f64,
    pub tenure_months: i32,
    pub monthly_emi_minor: i64,
    pub start_date: NaiveDate,
    pub status: String,
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
    #[sea_orm(has_many = "super::loan_payments::Entity")]
    Payments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::loan_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Closed,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for LoanStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            other => Err(EngineError::InvalidInput(format!(
                "invalid loan status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Uuid,
    pub name: String,
    pub principal_minor: i64,
    pub interest_rate_pct: f64,
    pub tenure_months: u32,
    pub monthly_emi_minor: i64,
    pub start_date: NaiveDate,
    pub status: LoanStatus,
}

impl TryFrom<Model> for Loan {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if model.tenure_months <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "invalid loan tenure: {}",
                model.tenure_months
            )));
        }
        Ok(Loan {
            id: model.id,
            name: model.name,
            principal_minor: model.principal_minor,
            interest_rate_pct: model.interest_rate_pct,
            tenure_months: model.tenure_months as u32,
            monthly_emi_minor: model.monthly_emi_minor,
            start_date: model.start_date,
            status: LoanStatus::try_from(model.status.as_str())?,
        })
    }
}
