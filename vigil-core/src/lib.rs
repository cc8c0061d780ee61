//! Vigil Core
//!
//! Core types and pure logic for the Vigil homework status watcher.
//!
//! This crate contains:
//! - Domain types: the tracked subject, the poll window and the verdict table
//! - Validation: extracting subjects from a raw status API response
//! - Interpretation: turning a subject's status into notification text
//!
//! Nothing here performs I/O. Transports live in `vigil-client`, the
//! polling loop lives in `vigil-watcher`.

pub mod domain;
pub mod interpret;
pub mod validate;

pub use interpret::{InterpretError, interpret};
pub use validate::{ShapeError, extract_subjects};
