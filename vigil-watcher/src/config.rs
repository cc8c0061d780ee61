//! Watcher configuration
//!
//! Credentials, endpoints and timing for the watcher. Everything is read
//! from environment variables (a local `.env` file is loaded first).

use std::fmt;
use std::time::Duration;

use anyhow::Context;
use vigil_client::DEFAULT_TELEGRAM_API_URL;
use vigil_core::domain::VerdictTable;

/// Default homework status endpoint
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Watcher configuration
#[derive(Clone)]
pub struct Config {
    /// Token for the homework status API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives status notifications
    pub telegram_chat_id: String,

    /// Homework status endpoint URL
    pub endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Time between cycles, and the width of each poll window
    pub retry_period: Duration,

    /// Timeout applied to every outgoing HTTP request
    pub request_timeout: Duration,

    /// Status codes recognized in addition to the built-in ones
    pub extra_verdicts: Vec<(String, String)>,
}

impl Config {
    /// Creates a configuration with the given credentials and defaults
    pub fn new(practicum_token: String, telegram_token: String, telegram_chat_id: String) -> Self {
        Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            retry_period: DEFAULT_RETRY_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            extra_verdicts: Vec::new(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PRACTICUM_TOKEN (required)
    /// - TELEGRAM_TOKEN (required)
    /// - TELEGRAM_CHAT_ID (required)
    /// - PRACTICUM_ENDPOINT (optional, default: the public status endpoint)
    /// - TELEGRAM_API_URL (optional, default: https://api.telegram.org)
    /// - RETRY_PERIOD (optional, seconds, default: 600)
    /// - REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - EXTRA_VERDICTS (optional, `code=text` pairs separated by `;`)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            var(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let practicum_token = required("PRACTICUM_TOKEN");
        let telegram_token = required("TELEGRAM_TOKEN");
        let telegram_chat_id = required("TELEGRAM_CHAT_ID");

        if !missing.is_empty() {
            anyhow::bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let mut config = Self::new(practicum_token, telegram_token, telegram_chat_id);

        if let Some(endpoint) = var("PRACTICUM_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Some(url) = var("TELEGRAM_API_URL") {
            config.telegram_api_url = url;
        }

        if let Some(secs) = var("RETRY_PERIOD") {
            config.retry_period = parse_secs("RETRY_PERIOD", &secs)?;
        }

        if let Some(secs) = var("REQUEST_TIMEOUT") {
            config.request_timeout = parse_secs("REQUEST_TIMEOUT", &secs)?;
        }

        if let Some(entries) = var("EXTRA_VERDICTS") {
            config.extra_verdicts = parse_verdicts(&entries)?;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.practicum_token.is_empty() {
            anyhow::bail!("practicum_token cannot be empty");
        }

        if self.telegram_token.is_empty() {
            anyhow::bail!("telegram_token cannot be empty");
        }

        if self.telegram_chat_id.is_empty() {
            anyhow::bail!("telegram_chat_id cannot be empty");
        }

        for (name, url) in [
            ("endpoint", &self.endpoint),
            ("telegram_api_url", &self.telegram_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.retry_period.as_secs() == 0 {
            anyhow::bail!("retry_period must be greater than 0");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Built-in verdicts extended with the configured ones
    pub fn verdict_table(&self) -> VerdictTable {
        self.extra_verdicts
            .iter()
            .fold(VerdictTable::default(), |table, (code, text)| {
                table.with_verdict(code.as_str(), text.as_str())
            })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("request_timeout", &self.request_timeout)
            .field("extra_verdicts", &self.extra_verdicts)
            .finish()
    }
}

fn parse_secs(key: &str, value: &str) -> anyhow::Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .with_context(|| format!("{key} must be a whole number of seconds, got `{value}`"))
}

fn parse_verdicts(entries: &str) -> anyhow::Result<Vec<(String, String)>> {
    entries.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, text) = entry
                .split_once('=')
                .with_context(|| format!("EXTRA_VERDICTS entry `{entry}` is not `code=text`"))?;
            let (code, text) = (code.trim(), text.trim());
            if code.is_empty() || text.is_empty() {
                anyhow::bail!("EXTRA_VERDICTS entry `{}` has an empty code or text", entry);
            }
            Ok((code.to_string(), text.to_string()))
        })
        .collect()
}
