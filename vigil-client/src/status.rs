//! Homework status API client

use std::fmt;

use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Client for the homework status endpoint
///
/// Every request carries `Authorization: OAuth <token>` and a single
/// `from_date` query parameter.
#[derive(Clone)]
pub struct StatusClient {
    endpoint: String,
    token: String,
    client: Client,
}

impl StatusClient {
    /// Create a new status client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the status endpoint
    /// * `token` - API token sent in the authorization header
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(endpoint, token, Client::new())
    }

    /// Create a status client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(endpoint: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client,
        }
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch homework statuses changed since `from_date`
    ///
    /// # Errors
    /// - [`ClientError::Transport`] if no response was received
    /// - [`ClientError::Api`] for any status other than 200
    /// - [`ClientError::Decode`] if the body is not valid JSON
    /// - [`ClientError::Shape`] if the JSON is not an object
    pub async fn fetch_statuses(&self, from_date: i64) -> Result<Value> {
        debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = crate::error_text(response).await;
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ClientError::Decode(format!("Failed to parse JSON response: {e}")))?;

        if !value.is_object() {
            return Err(ClientError::Shape(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        Ok(value)
    }
}

impl fmt::Debug for StatusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
