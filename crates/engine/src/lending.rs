//! Money lent to or borrowed from named counterparties.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lending_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub kind: String,
    pub person: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Direction of a lending event relative to the user.
///
/// `Lent`/`RepaidByMe` move money away from the user, `Borrowed`/
/// `RepaidByThem` move it towards the user. The per-person net balance
/// counts `Lent − RepaidByThem − (Borrowed − RepaidByMe)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LendingKind {
    Lent,
    Borrowed,
    RepaidByThem,
    RepaidByMe,
}

impl LendingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lent => "lent",
            Self::Borrowed => "borrowed",
            Self::RepaidByThem => "repaid_by_them",
            Self::RepaidByMe => "repaid_by_me",
        }
    }
}

impl TryFrom<&str> for LendingKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "lent" => Ok(Self::Lent),
            "borrowed" => Ok(Self::Borrowed),
            "repaid_by_them" => Ok(Self::RepaidByThem),
            "repaid_by_me" => Ok(Self::RepaidByMe),
            other => Err(EngineError::InvalidInput(format!(
                "invalid lending kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LendingStatus {
    #[default]
    Pending,
    Settled,
}

impl LendingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Settled => "settled",
        }
    }
}

impl TryFrom<&str> for LendingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "settled" => Ok(Self::Settled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid lending status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LendingEntry {
    pub id: Uuid,
    pub kind: LendingKind,
    pub person: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub status: LendingStatus,
}

impl TryFrom<Model> for LendingEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(LendingEntry {
            id: model.id,
            kind: LendingKind::try_from(model.kind.as_str())?,
            person: model.person,
            amount_minor: model.amount_minor,
            occurred_at: model.occurred_at,
            status: LendingStatus::try_from(model.status.as_str())?,
        })
    }
}
