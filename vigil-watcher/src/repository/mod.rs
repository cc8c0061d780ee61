//! Repository layer
//!
//! Repositories are thin adapters over the external collaborators: the
//! homework status API and the messaging channel. They translate transport
//! errors into the watcher's own failure kinds and carry no business logic.
//!
//! Both seams are trait-based so the cycle driver can be tested with
//! in-memory fakes.

mod messages;
mod statuses;

// Re-export traits
pub use messages::MessageChannel;
pub use statuses::StatusSource;

// Re-export implementations
pub use messages::TelegramChannel;
pub use statuses::HttpStatusSource;

// Re-export errors
pub use messages::DeliveryError;
pub use statuses::PollError;
