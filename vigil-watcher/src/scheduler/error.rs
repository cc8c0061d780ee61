//! Cycle error type
//!
//! Every failure a cycle can hit, from any component. The driver handles
//! all of them in one place and never lets one end the process.

use thiserror::Error;
use vigil_core::{InterpretError, ShapeError};

use crate::repository::{DeliveryError, PollError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("poll failed: {0}")]
    Poll(#[from] PollError),

    #[error("invalid response: {0}")]
    Shape(#[from] ShapeError),

    #[error("cannot interpret status: {0}")]
    Interpret(#[from] InterpretError),

    #[error("notification failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl CycleError {
    /// Unknown status codes are logged quietly
    pub fn is_unknown_status(&self) -> bool {
        matches!(self, Self::Interpret(e) if e.is_unknown_status())
    }
}
