use chrono::Duration;
use eyre::{eyre, Result};
use highlight_core::models::highlight::{
    DEFAULT_MAX_TERM_LENGTH, DEFAULT_MAX_TERMS, SubscriptionLimits,
};
use highlight_core::scanner::{DEFAULT_ACTIVE_WINDOW_MINUTES, ScannerConfig};
use std::env;
use tracing::Level;

/// Configuration for the Discord bot.
///
/// This struct contains everything the bot needs to connect to Discord
/// and the database, plus the tunables of the highlight feature.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Database connection URL (required)
    pub database_url: String,
    /// Guild to register the `/hl` command in; registered globally when unset
    pub guild_id: Option<u64>,
    /// Minutes of recent channel activity that suppress a notification
    pub active_window_minutes: i64,
    /// Maximum number of terms per user
    pub max_terms: usize,
    /// Maximum length of a single term, in characters
    pub max_term_length: usize,
    /// Log level for the application
    pub log_level: Level,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .ok_or_else(|| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable not set"))?;

        let guild_id = lookup("DISCORD_GUILD_ID")
            .map(|id| {
                id.parse::<u64>()
                    .map_err(|_| eyre!("DISCORD_GUILD_ID must be a valid u64"))
            })
            .transpose()?;

        let active_window_minutes = parse_or(
            &lookup,
            "HIGHLIGHT_ACTIVE_WINDOW_MINUTES",
            DEFAULT_ACTIVE_WINDOW_MINUTES,
        )?;
        if active_window_minutes < 0 {
            return Err(eyre!("HIGHLIGHT_ACTIVE_WINDOW_MINUTES must not be negative"));
        }

        let max_terms = parse_or(&lookup, "HIGHLIGHT_MAX_TERMS", DEFAULT_MAX_TERMS)?;
        let max_term_length = parse_or(
            &lookup,
            "HIGHLIGHT_MAX_TERM_LENGTH",
            DEFAULT_MAX_TERM_LENGTH,
        )?;

        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            token,
            database_url,
            guild_id,
            active_window_minutes,
            max_terms,
            max_term_length,
            log_level,
        })
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            active_window: Duration::minutes(self.active_window_minutes),
            ..ScannerConfig::default()
        }
    }

    pub fn subscription_limits(&self) -> SubscriptionLimits {
        SubscriptionLimits {
            max_terms: self.max_terms,
            max_term_length: self.max_term_length,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| eyre!("{} has an invalid value: {:?}", key, value)),
        None => Ok(default),
    }
}
