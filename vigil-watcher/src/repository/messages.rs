//! Messages repository
//!
//! Delivers notification text through the external messaging channel.

use async_trait::async_trait;
use thiserror::Error;
use vigil_client::TelegramClient;

/// The channel could not deliver a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to deliver message via {channel}: {reason}")]
pub struct DeliveryError {
    pub channel: &'static str,
    pub reason: String,
}

/// Trait for messaging channels
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Send `text` to the configured destination.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Telegram implementation of MessageChannel
pub struct TelegramChannel {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramChannel {
    /// Creates a channel that posts to `chat_id`
    pub fn new(client: TelegramClient, chat_id: String) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.client
            .send_message(&self.chat_id, text)
            .await
            .map_err(|e| DeliveryError {
                channel: self.name(),
                reason: e.to_string(),
            })
    }
}
