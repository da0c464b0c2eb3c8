use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::reminder::ReminderZone;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub api_base_url: Url,
    pub advice_url: Url,
    pub debug: bool,
    pub notifications_enabled: bool,
    pub timezone: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP"))
            .set_default("api_base_url", "http://localhost:3000")?
            .set_default("advice_url", "https://api.adviceslip.com/advice")?
            .set_default("debug", false)?
            .set_default("notifications_enabled", true)?
            .build()?;

        config.try_deserialize()
    }

    pub fn reminder_zone(&self) -> Result<ReminderZone, ConfigError> {
        ReminderZone::from_name(self.timezone.as_deref()).map_err(ConfigError::Message)
    }
}
