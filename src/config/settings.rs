//! Application settings loaded from the environment.

use std::path::PathBuf;

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token (obtain from `@BotFather`).
    pub bot_token: String,

    /// OpenWeatherMap API key.
    pub weather_api_key: String,

    /// Path to the profile store JSON file.
    pub users_path: PathBuf,
}

fn default_users_path() -> PathBuf {
    PathBuf::from("users.json")
}

impl BotConfig {
    /// Creates configuration from environment variables.
    ///
    /// Expects `BOT_TOKEN` and `WEATHER_API_KEY` to be set;
    /// `USERS_PATH` is optional and defaults to `users.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            std::env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        let weather_api_key = std::env::var("WEATHER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("WEATHER_API_KEY"))?;

        let users_path =
            std::env::var("USERS_PATH").map_or_else(|_| default_users_path(), PathBuf::from);

        Ok(Self {
            bot_token,
            weather_api_key,
            users_path,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
}
