//! Weather Profile Bot - Main Entry Point
//!
//! A Telegram bot that answers city weather queries and maintains
//! per-user profiles with a pinned home city and query history.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::Bot;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use weather_profile_bot::config::BotConfig;
use weather_profile_bot::dialogue::DialogueHandler;
use weather_profile_bot::storage::UserStore;
use weather_profile_bot::telegram;
use weather_profile_bot::weather::OpenWeatherClient;

/// Telegram bot for city weather lookups with per-user profiles.
#[derive(Parser, Debug)]
#[command(name = "weather_bot")]
#[command(about = "Answer city weather queries and keep per-user profiles")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let config =
        BotConfig::from_env().context("Failed to load bot configuration from environment")?;

    info!("Profile store: {}", config.users_path.display());

    let weather = OpenWeatherClient::new(config.weather_api_key.clone());
    let store = UserStore::new(config.users_path.clone());
    let dialogue = Arc::new(DialogueHandler::new(store, weather));

    info!("Starting weather bot...");

    let bot = Bot::new(config.bot_token.clone());
    telegram::run(bot, dialogue)
        .await
        .context("Bot dispatch loop failed")
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
