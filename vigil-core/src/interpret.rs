//! Status interpretation
//!
//! Turns a subject's current status into the text sent to the user.
//! Pure and deterministic: the same subject and table always give the
//! same message.

use thiserror::Error;

use crate::domain::{Subject, VerdictTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("subject has no status")]
    MissingStatus,

    #[error("unknown status `{0}`")]
    UnknownStatus(String),

    #[error("subject has no homework name")]
    MissingName,
}

impl InterpretError {
    /// Unknown codes are an expected transient condition, not a fault
    pub fn is_unknown_status(&self) -> bool {
        matches!(self, Self::UnknownStatus(_))
    }
}

/// Builds the notification text for `subject`.
///
/// The status is checked before the name, so a subject with neither
/// reports `MissingStatus`.
pub fn interpret(subject: &Subject, verdicts: &VerdictTable) -> Result<String, InterpretError> {
    let status = subject
        .status
        .as_deref()
        .ok_or(InterpretError::MissingStatus)?;

    let verdict = verdicts
        .verdict(status)
        .ok_or_else(|| InterpretError::UnknownStatus(status.to_string()))?;

    let name = subject
        .homework_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(InterpretError::MissingName)?;

    Ok(format!("Status of homework \"{name}\" changed. {verdict}"))
}
