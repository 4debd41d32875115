//! User settings API endpoints

use api_types::settings::{SettingsUpdate, SettingsView};
use axum::{Extension, Json, extract::State};
use engine::users;

use crate::{ServerError, currency_from_api, map_currency, server::ServerState};

fn view(settings: engine::UserSettings) -> SettingsView {
    SettingsView {
        currency: map_currency(settings.currency),
        timezone: settings.timezone,
        spreadsheet_url: settings.spreadsheet_url,
    }
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SettingsView>, ServerError> {
    let settings = state.engine.user_settings(&user.username).await?;
    Ok(Json(view(settings)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, ServerError> {
    let patch = engine::SettingsPatch {
        currency: payload.currency.map(currency_from_api),
        timezone: payload.timezone,
        spreadsheet_url: payload.spreadsheet_url.map(Some),
    };
    let settings = state.engine.update_settings(&user.username, patch).await?;
    Ok(Json(view(settings)))
}
