//! Application configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub leaderboard: LeaderboardConfig,
    pub connection: ConnectionConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Leaderboard truncation defaults
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_max_entries")]
    pub max_top_entries: usize,
    #[serde(default = "default_max_entries")]
    pub max_streak_entries: usize,
}

/// Connection handshake configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// How long an issued connection token stays redeemable
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

impl ConnectionConfig {
    #[must_use]
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "mintup".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_entries() -> usize {
    10
}

fn default_token_ttl_secs() -> i64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but unparseable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            leaderboard: LeaderboardConfig {
                max_top_entries: parse_var("LEADERBOARD_MAX_TOP_ENTRIES")?
                    .unwrap_or_else(default_max_entries),
                max_streak_entries: parse_var("LEADERBOARD_MAX_STREAK_ENTRIES")?
                    .unwrap_or_else(default_max_entries),
            },
            connection: ConnectionConfig {
                token_ttl_secs: parse_var("CONNECTION_TOKEN_TTL_SECS")?
                    .unwrap_or_else(default_token_ttl_secs),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var("WORKER_ID")?.unwrap_or(0),
            },
        })
    }
}

/// Parse an optional environment variable, failing on malformed values
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
