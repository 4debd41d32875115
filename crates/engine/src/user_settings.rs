//! Per-user settings (display currency, timezone, spreadsheet link).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub currency: String,
    /// IANA timezone name, e.g. `Asia/Kolkata`.
    pub timezone: String,
    pub spreadsheet_url: Option<String>,
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

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub currency: Currency,
    pub timezone: String,
    pub spreadsheet_url: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            timezone: "Asia/Kolkata".to_string(),
            spreadsheet_url: None,
        }
    }
}

impl TryFrom<Model> for UserSettings {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(UserSettings {
            currency: Currency::try_from(model.currency.as_str())?,
            timezone: model.timezone,
            spreadsheet_url: model.spreadsheet_url,
        })
    }
}
