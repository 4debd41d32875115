use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/client.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    /// IANA timezone used to resolve date-range presets.
    pub timezone: String,
    /// Where UI preferences are persisted.
    pub state_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            timezone: "Asia/Kolkata".to_string(),
            state_path: crate::preferences::default_state_path().to_string(),
        }
    }
}

/// Loads the client configuration from `config/client.toml` (optional)
/// with `FINTRACK_` environment overrides on top.
pub fn load() -> Result<AppConfig> {
    load_from(DEFAULT_CONFIG_PATH)
}

pub fn load_from(path: &str) -> Result<AppConfig> {
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINTRACK"));
    let settings: AppConfig = builder.build()?.try_deserialize()?;
    Ok(settings)
}
