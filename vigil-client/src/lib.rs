//! Vigil HTTP Clients
//!
//! Typed HTTP clients for the two external services the watcher talks to:
//!
//! - [`StatusClient`] queries the homework status API for changes since a
//!   timestamp and classifies every failure mode
//! - [`TelegramClient`] delivers text messages through the Telegram Bot API
//!
//! # Example
//!
//! ```no_run
//! use vigil_client::StatusClient;
//!
//! #[tokio::main]
//! async fn main() -> vigil_client::Result<()> {
//!     let client = StatusClient::new(
//!         "https://practicum.yandex.ru/api/user_api/homework_statuses/",
//!         "my-token",
//!     );
//!
//!     let response = client.fetch_statuses(1_700_000_000).await?;
//!     println!("{response}");
//!     Ok(())
//! }
//! ```

pub mod error;
mod status;
mod telegram;

pub use error::{ClientError, Result};
pub use status::StatusClient;
pub use telegram::{DEFAULT_TELEGRAM_API_URL, TelegramClient};

/// Reads the body of a failed response for the error message
async fn error_text(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}
