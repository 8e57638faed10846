//! # Configuration Module
//!
//! Startup configuration, read once from the environment into an immutable
//! [`Config`]. Required values are checked up front so a misconfigured
//! deployment fails at launch instead of on the first chat message.

use reqwest::Url;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_HTTP_PORT: u16 = 9090;
pub const DEFAULT_WEBHOOK_PORT: u16 = 3001;
pub const DEFAULT_YELP_API_URL: &str = "https://api.yelp.com";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Errors raised while loading [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {var} is not a valid port: {value:?}")]
    InvalidPort { var: &'static str, value: String },
    #[error("environment variable {var} is not a valid URL: {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Yelp Fusion API key
    pub yelp_api_key: String,
    /// Base URL of the Yelp Fusion API
    pub yelp_api_url: Url,
    /// Port of the HTTP server serving `/` and static assets
    pub http_port: u16,
    /// Port of the webhook listener, used only when `webhook_url` is set
    pub webhook_port: u16,
    /// Public URL Telegram delivers updates to; long polling when unset
    pub webhook_url: Option<Url>,
    /// Directory served as static assets
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let yelp_api_key = get("YELP_API_KEY").ok_or(ConfigError::Missing("YELP_API_KEY"))?;

        let yelp_api_url = parse_url(
            "YELP_API_URL",
            get("YELP_API_URL").as_deref().unwrap_or(DEFAULT_YELP_API_URL),
        )?;
        let webhook_url = get("WEBHOOK_URL")
            .map(|value| parse_url("WEBHOOK_URL", &value))
            .transpose()?;

        let http_port = parse_port("PORT", get("PORT"), DEFAULT_HTTP_PORT)?;
        let webhook_port = parse_port("WEBHOOK_PORT", get("WEBHOOK_PORT"), DEFAULT_WEBHOOK_PORT)?;

        let static_dir = PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()));

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            bot_token,
            yelp_api_key,
            yelp_api_url,
            http_port,
            webhook_port,
            webhook_url,
            static_dir,
            log_format,
        })
    }

    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.http_port))
    }

    pub fn webhook_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.webhook_port))
    }
}

fn parse_port(var: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { var, value }),
    }
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
    })
}
