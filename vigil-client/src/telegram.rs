//! Telegram Bot API client

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Public Telegram Bot API host
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Sends text messages through a Telegram bot
///
/// The bot token is part of every request URL, so transport errors are
/// stripped of their URL before they leave this client.
#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    token: String,
    client: Client,
}

impl TelegramClient {
    /// Create a client for the public Bot API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_TELEGRAM_API_URL, token, Client::new())
    }

    /// Create a client against a custom Bot API server
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the Bot API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `text` to the chat identified by `chat_id`
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        debug!(chat_id, "Sending Telegram message");

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.without_url()))?;

        let status = response.status();
        let reply = response
            .json::<SendMessageResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.without_url().to_string()));

        match reply {
            Ok(reply) if status.is_success() && reply.ok => Ok(()),
            Ok(reply) => Err(ClientError::api_error(
                status.as_u16(),
                reply
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )),
            Err(_) if !status.is_success() => {
                Err(ClientError::api_error(status.as_u16(), "Unknown error"))
            }
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}
