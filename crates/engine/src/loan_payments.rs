//! Recorded repayments against a loan.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loan_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub loan_id: Uuid,
    pub username: String,
    pub amount_minor: i64,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loans::Entity",
        from = "Column::LoanId",
        to = "super::loans::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Loans,
}

impl Related<super::loans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub amount_minor: i64,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl From<Model> for LoanPayment {
    fn from(model: Model) -> Self {
        LoanPayment {
            id: model.id,
            loan_id: model.loan_id,
            amount_minor: model.amount_minor,
            paid_at: model.paid_at,
            note: model.note,
        }
    }
}
