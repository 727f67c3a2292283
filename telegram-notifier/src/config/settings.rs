//! Top-level notifier config: credentials plus timeout, retry policy and optional API root.

use std::env;

use notify_core::{NotifyError, Result};
use serde::{Deserialize, Serialize};

use super::credentials::TelegramConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_delay() -> f64 {
    DEFAULT_RETRY_DELAY_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    /// Per-request timeout in seconds (1..=300).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Retries for transient failures (0..=10).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base backoff in seconds (0.1..=60.0); doubles on every retry.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: f64,
    /// Bot API root, e.g. a self-hosted telegram-bot-api server. `None` means api.telegram.org.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Config {
    /// Builds a config with default network settings and validates it.
    pub fn new(telegram: TelegramConfig) -> Result<Self> {
        let config = Self {
            telegram,
            timeout: DEFAULT_TIMEOUT_SECS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY_SECS,
            api_url: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID (both required); TELEGRAM_API_URL is optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = required_var("TELEGRAM_BOT_TOKEN")?;
        let chat_id = required_var("TELEGRAM_CHAT_ID")?;
        let api_url = env::var("TELEGRAM_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let mut config = Self::new(TelegramConfig::new(bot_token, chat_id))?;
        config.api_url = api_url;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field and reports all problems in a single config error.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        self.telegram.collect_problems(&mut problems);

        if !(1..=300).contains(&self.timeout) {
            problems.push(format!(
                "timeout must be between 1 and 300 seconds, got {}",
                self.timeout
            ));
        }
        if self.retry_attempts > 10 {
            problems.push(format!(
                "retry_attempts must be between 0 and 10, got {}",
                self.retry_attempts
            ));
        }
        if !(0.1..=60.0).contains(&self.retry_delay) {
            problems.push(format!(
                "retry_delay must be between 0.1 and 60.0 seconds, got {}",
                self.retry_delay
            ));
        }
        if let Some(ref url_str) = self.api_url {
            if reqwest::Url::parse(url_str).is_err() {
                problems.push(format!("api_url is set but not a valid URL: {}", url_str));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Config(format!(
                "Invalid configuration: {}",
                problems.join("; ")
            )))
        }
    }

    /// JSON view of the config, as written by [`Config::save_to_file`].
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| NotifyError::Config(format!("Failed to serialize configuration: {}", e)))
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(NotifyError::Config(format!(
            "{} environment variable is required",
            name
        ))),
    }
}
