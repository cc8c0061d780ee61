//! Service layer
//!
//! Services hold the watcher's logic that sits between the repositories
//! and the cycle driver.

mod notifier;

pub use notifier::notify;
