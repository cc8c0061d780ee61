//! Status repository
//!
//! Issues the time-windowed query against the homework status API.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use vigil_client::{ClientError, StatusClient};
use vigil_core::domain::PollWindow;

/// Why a poll produced no usable response
///
/// None of these are retried within the cycle; the next cycle is the retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("status API unreachable: {0}")]
    Transport(String),

    #[error("status API answered with status {status}: {message}")]
    Protocol { status: u16, message: String },

    #[error("status API response is not valid JSON: {0}")]
    Decode(String),

    #[error("status API response has the wrong shape: {0}")]
    Shape(String),
}

impl From<ClientError> for PollError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(e) => Self::Transport(e.to_string()),
            ClientError::Api { status, message } => Self::Protocol { status, message },
            ClientError::Decode(reason) => Self::Decode(reason),
            ClientError::Shape(reason) => Self::Shape(reason),
        }
    }
}

/// Source of raw status responses
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches every status change since the start of `window`
    ///
    /// A successful result is always a JSON object.
    async fn poll(&self, window: PollWindow) -> Result<Value, PollError>;
}

/// HTTP implementation of StatusSource
pub struct HttpStatusSource {
    client: StatusClient,
}

impl HttpStatusSource {
    pub fn new(client: StatusClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn poll(&self, window: PollWindow) -> Result<Value, PollError> {
        Ok(self.client.fetch_statuses(window.from_date()).await?)
    }
}
