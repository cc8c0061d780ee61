//! Notifier
//!
//! Sends one message through a channel. Duplicate suppression is the
//! caller's job: the driver compares against the last delivered text
//! before calling in, and only records a message after `notify` succeeds.
//! Failures are returned, not logged; the driver logs them once per cycle.

use tracing::debug;

use crate::repository::{DeliveryError, MessageChannel};

/// Delivers `message` through `channel`, without retrying
pub async fn notify(channel: &dyn MessageChannel, message: &str) -> Result<(), DeliveryError> {
    channel.send(message).await?;
    debug!(channel = channel.name(), "Message delivered");
    Ok(())
}
