use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub economy: EconomySettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub messaging: MessagingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8001 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout_secs() -> u64 { 5 }
fn default_idle_timeout_secs() -> u64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

/// External compatibility oracle
#[derive(Debug, Clone, Deserialize)]
pub struct OracleSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    #[serde(default = "default_oracle_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_oracle_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_oracle_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_oracle_endpoint(),
            api_key: None,
            model: default_oracle_model(),
            timeout_ms: default_oracle_timeout_ms(),
            cache_size: default_oracle_cache_size(),
            cache_ttl_secs: default_oracle_cache_ttl_secs(),
        }
    }
}

fn default_oracle_endpoint() -> String { "https://api.openai.com/v1".to_string() }
fn default_oracle_model() -> String { "gpt-4".to_string() }
fn default_oracle_timeout_ms() -> u64 { 2000 }
fn default_oracle_cache_size() -> u64 { 10_000 }
fn default_oracle_cache_ttl_secs() -> u64 { 3600 }

/// Coin prices and swipe quotas
#[derive(Debug, Clone, Deserialize)]
pub struct EconomySettings {
    #[serde(default = "default_undo_cost")]
    pub undo_cost: i64,
    #[serde(default = "default_welcome_bonus")]
    pub welcome_bonus: i64,
    #[serde(default = "default_daily_super_likes")]
    pub daily_super_likes: u32,
    /// Offset of the server day boundary from UTC, in minutes
    #[serde(default)]
    pub day_offset_minutes: i32,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            undo_cost: default_undo_cost(),
            welcome_bonus: default_welcome_bonus(),
            daily_super_likes: default_daily_super_likes(),
            day_offset_minutes: 0,
        }
    }
}

fn default_undo_cost() -> i64 { 50 }
fn default_welcome_bonus() -> i64 { 100 }
fn default_daily_super_likes() -> u32 { 1 }

/// How discovery candidates are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Premium candidates above non-premium, then by compatibility
    PremiumFirst,
    /// Compatibility only
    ScoreOnly,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        RankingPolicy::PremiumFirst
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_limit")]
    pub default_limit: usize,
    #[serde(default = "default_feed_max_limit")]
    pub max_limit: usize,
    #[serde(default)]
    pub ranking: RankingPolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            default_limit: default_feed_limit(),
            max_limit: default_feed_max_limit(),
            ranking: RankingPolicy::default(),
        }
    }
}

fn default_feed_limit() -> usize { 10 }
fn default_feed_max_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct MessagingSettings {
    #[serde(default = "default_media_ttl_days")]
    pub media_ttl_days: i64,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_fetch_limit")]
    pub default_fetch_limit: usize,
    #[serde(default = "default_max_fetch_limit")]
    pub max_fetch_limit: usize,
}

impl Default for MessagingSettings {
    fn default() -> Self {
        Self {
            media_ttl_days: default_media_ttl_days(),
            preview_chars: default_preview_chars(),
            default_fetch_limit: default_fetch_limit(),
            max_fetch_limit: default_max_fetch_limit(),
        }
    }
}

fn default_media_ttl_days() -> i64 { 7 }
fn default_preview_chars() -> usize { 50 }
fn default_fetch_limit() -> usize { 50 }
fn default_max_fetch_limit() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SPHERE__)
    /// 5. `DATABASE_URL` and `JWT_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SPHERE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SPHERE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        with_env_shortcuts(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SPHERE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional `DATABASE_URL` and `JWT_SECRET` variables
fn with_env_shortcuts(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}
