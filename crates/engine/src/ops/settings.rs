use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{Currency, EngineError, ResultEngine, UserSettings, user_settings};

use super::{Engine, with_tx};

/// Field patch for the user settings row; absent fields keep their value.
#[derive(Clone, Debug, Default)]
pub struct SettingsPatch {
    pub currency: Option<Currency>,
    pub timezone: Option<String>,
    /// `Some(None)` clears the stored link.
    pub spreadsheet_url: Option<Option<String>>,
}

impl Engine {
    /// The user's settings, falling back to defaults when none are stored.
    pub async fn user_settings(&self, username: &str) -> ResultEngine<UserSettings> {
        let model = user_settings::Entity::find_by_id(username)
            .one(self.db())
            .await?;

        match model {
            Some(model) => UserSettings::try_from(model),
            None => Ok(UserSettings::default()),
        }
    }

    /// Applies a settings patch, creating the row on first write.
    pub async fn update_settings(
        &self,
        username: &str,
        patch: SettingsPatch,
    ) -> ResultEngine<UserSettings> {
        if let Some(timezone) = &patch.timezone
            && timezone.trim().is_empty()
        {
            return Err(EngineError::InvalidInput(
                "timezone must not be empty".to_string(),
            ));
        }

        let updated: user_settings::Model = with_tx!(self, |tx| {
            let existing = user_settings::Entity::find_by_id(username).one(&tx).await?;

            match existing {
                Some(existing) => {
                    let mut active: user_settings::ActiveModel = existing.into();
                    if let Some(currency) = patch.currency {
                        active.currency = ActiveValue::Set(currency.code().to_string());
                    }
                    if let Some(timezone) = patch.timezone {
                        active.timezone = ActiveValue::Set(timezone.trim().to_string());
                    }
                    if let Some(spreadsheet_url) = patch.spreadsheet_url {
                        active.spreadsheet_url = ActiveValue::Set(spreadsheet_url);
                    }
                    active.update(&tx).await.map_err(EngineError::from)
                }
                None => {
                    let defaults = UserSettings::default();
                    let active: user_settings::ActiveModel = user_settings::Model {
                        username: username.to_string(),
                        currency: patch
                            .currency
                            .unwrap_or(defaults.currency)
                            .code()
                            .to_string(),
                        timezone: patch
                            .timezone
                            .map(|tz| tz.trim().to_string())
                            .unwrap_or(defaults.timezone),
                        spreadsheet_url: patch.spreadsheet_url.flatten(),
                    }
                    .into();
                    user_settings::Entity::insert(active)
                        .exec_with_returning(&tx)
                        .await
                        .map_err(EngineError::from)
                }
            }
        })?;

        UserSettings::try_from(updated)
    }
}
