//! Core domain types
//!
//! These types are shared between the status client (which produces raw
//! responses) and the watcher (which drives the polling cycle).

pub mod subject;
pub mod verdict;
pub mod window;

pub use subject::{SUBJECT_FIELDS, Subject};
pub use verdict::VerdictTable;
pub use window::PollWindow;
