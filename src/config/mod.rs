//! Configuration module for the weather bot.
//!
//! Loads the bot token, weather API key, and the profile store path
//! from the environment.

mod settings;

pub use settings::{BotConfig, ConfigError};
