//! Scheduler layer for the watcher
//!
//! This layer drives the polling cycle: poll the status API, validate the
//! response, interpret the newest subject, notify on change, then sleep.
//! It owns the only mutable state in the process (the poll window and the
//! last delivered message).

pub mod driver;
pub mod error;

pub use driver::CycleDriver;
pub use error::CycleError;
