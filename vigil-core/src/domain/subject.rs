//! Subject domain types

use serde::{Deserialize, Serialize};

/// Keys every homework record is expected to carry, in API order.
pub const SUBJECT_FIELDS: [&str; 6] = [
    "id",
    "status",
    "homework_name",
    "reviewer_comment",
    "date_updated",
    "lesson_name",
];

/// A tracked homework submission as reported by the status API.
///
/// Every field is optional: the API is not trusted to send a complete
/// record, and a missing field is only a data-quality warning until
/// interpretation actually needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Option<i64>,
    pub status: Option<String>,
    /// Display name used in notifications
    pub homework_name: Option<String>,
    pub reviewer_comment: Option<String>,
    pub date_updated: Option<String>,
    pub lesson_name: Option<String>,
}

impl Subject {
    /// Creates a subject carrying only a status and a display name
    pub fn new(status: impl Into<String>, homework_name: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            homework_name: Some(homework_name.into()),
            ..Self::default()
        }
    }
}
