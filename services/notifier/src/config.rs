//! services/notifier/src/config.rs
//!
//! Defines the notifier's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use trivia_core::cache::DEFAULT_CACHE_CAPACITY;
use trivia_core::dedup::DEFAULT_DEDUP_CAPACITY;

pub const DEFAULT_TRIVIA_API_URL: &str = "https://opentdb.com/api.php?amount=1&type=multiple";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which notification backend to drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayKind {
    Console,
    Desktop,
}

/// Delays that work around asynchronous registration races in notification
/// subsystems. They carry no business meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Wait before showing a question, so its actions are registered first.
    pub send_delay: Duration,
    /// Wait before showing an answer result.
    pub result_delay: Duration,
    /// How long new questions stay suppressed after an answer.
    pub result_cooldown: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            send_delay: Duration::from_millis(1000),
            result_delay: Duration::from_millis(500),
            result_cooldown: Duration::from_millis(2000),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub trivia_api_url: String,
    pub log_level: Level,
    pub settings_path: PathBuf,
    pub http_timeout: Duration,
    pub timings: Timings,
    pub dedup_capacity: usize,
    pub cache_capacity: usize,
    pub gateway: GatewayKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trivia_api_url: DEFAULT_TRIVIA_API_URL.to_string(),
            log_level: Level::INFO,
            settings_path: default_settings_path(),
            http_timeout: Duration::from_secs(10),
            timings: Timings::default(),
            dedup_capacity: DEFAULT_DEDUP_CAPACITY,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            gateway: default_gateway(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let trivia_api_url = lookup("TRIVIA_API_URL").unwrap_or(defaults.trivia_api_url);
        if !trivia_api_url.starts_with("http://") && !trivia_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "TRIVIA_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", trivia_api_url),
            ));
        }

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let settings_path = lookup("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.settings_path);

        let http_timeout = match parse_var::<u64, _>(&lookup, "HTTP_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => defaults.http_timeout,
        };

        let timings = Timings {
            send_delay: parse_millis(&lookup, "NOTIFY_SEND_DELAY_MS")?
                .unwrap_or(defaults.timings.send_delay),
            result_delay: parse_millis(&lookup, "NOTIFY_RESULT_DELAY_MS")?
                .unwrap_or(defaults.timings.result_delay),
            result_cooldown: parse_millis(&lookup, "RESULT_COOLDOWN_MS")?
                .unwrap_or(defaults.timings.result_cooldown),
        };

        let dedup_capacity = parse_capacity(&lookup, "DEDUP_CAPACITY")?
            .unwrap_or(defaults.dedup_capacity);
        let cache_capacity = parse_capacity(&lookup, "CACHE_CAPACITY")?
            .unwrap_or(defaults.cache_capacity);

        let gateway = match lookup("NOTIFIER_GATEWAY") {
            None => defaults.gateway,
            Some(raw) => match raw.to_lowercase().as_str() {
                "console" => GatewayKind::Console,
                "desktop" => GatewayKind::Desktop,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "NOTIFIER_GATEWAY".to_string(),
                        format!("'{}' is not one of console, desktop", raw),
                    ))
                }
            },
        };

        Ok(Self {
            trivia_api_url,
            log_level,
            settings_path,
            http_timeout,
            timings,
            dedup_capacity,
            cache_capacity,
            gateway,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::InvalidValue(name.to_string(), format!("'{}' is not a number", raw))
        }),
    }
}

fn parse_millis<F>(lookup: &F, name: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_var::<u64, _>(lookup, name)?.map(Duration::from_millis))
}

fn parse_capacity<F>(lookup: &F, name: &str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<usize, _>(lookup, name)? {
        Some(0) => Err(ConfigError::InvalidValue(
            name.to_string(),
            "capacity must be at least 1".to_string(),
        )),
        other => Ok(other),
    }
}

fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trivia-time")
        .join("settings.json")
}

fn default_gateway() -> GatewayKind {
    if cfg!(feature = "desktop") {
        GatewayKind::Desktop
    } else {
        GatewayKind::Console
    }
}
