//! Response validation
//!
//! Checks the shape of a raw status API response and extracts the subject
//! list. Structural problems with the response are errors. Inside the list
//! only the newest subject's `status` and `homework_name` can fail
//! validation, since they are the only values a status decision reads.
//! Everything else is advisory: logged and then ignored.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::domain::{SUBJECT_FIELDS, Subject};

/// Key holding the subject list in the response body
pub const SUBJECTS_KEY: &str = "homeworks";

/// Key holding the server timestamp echoed back by the API
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Structural problems with a status API response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has no `homeworks` field")]
    MissingSubjects,

    #[error("`homeworks` is not a list")]
    SubjectsNotAList,

    #[error("subject #{index} is malformed: {reason}")]
    MalformedSubject { index: usize, reason: String },
}

/// Extracts the subject list from a raw response.
///
/// The list is returned in API order (most recent first). An empty list is
/// valid and means nothing changed inside the poll window. Older entries
/// never fail validation: a broken entry becomes an empty [`Subject`] so
/// positions are preserved.
pub fn extract_subjects(response: &Value) -> Result<Vec<Subject>, ShapeError> {
    let object = response.as_object().ok_or(ShapeError::NotAnObject)?;

    let items = object
        .get(SUBJECTS_KEY)
        .ok_or(ShapeError::MissingSubjects)?
        .as_array()
        .ok_or(ShapeError::SubjectsNotAList)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_subject(index, item, index == 0))
        .collect()
}

/// Server timestamp from the response, if present
pub fn response_timestamp(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}

/// Builds a subject; `newest` makes decision fields strict
fn parse_subject(index: usize, item: &Value, newest: bool) -> Result<Subject, ShapeError> {
    let Some(fields) = item.as_object() else {
        if newest {
            return Err(ShapeError::MalformedSubject {
                index,
                reason: "not a JSON object".to_string(),
            });
        }
        warn!(subject = index, "Ignoring status API entry that is not a JSON object");
        return Ok(Subject::default());
    };

    for field in SUBJECT_FIELDS {
        if fields.get(field).is_none_or(is_blank) {
            warn!(subject = index, field, "Status API response is missing an expected field");
        }
    }

    Ok(Subject {
        id: advisory(index, fields, "id", Value::as_i64),
        status: decisive(index, fields, "status", newest)?,
        homework_name: decisive(index, fields, "homework_name", newest)?,
        reviewer_comment: advisory(index, fields, "reviewer_comment", as_string),
        date_updated: advisory(index, fields, "date_updated", as_string),
        lesson_name: advisory(index, fields, "lesson_name", as_string),
    })
}

/// A field no decision depends on: wrong types are logged and dropped
fn advisory<T>(
    index: usize,
    fields: &Map<String, Value>,
    field: &str,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    match fields.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => extract(value).or_else(|| {
            warn!(subject = index, field, "Ignoring status API field with an unexpected type");
            None
        }),
    }
}

/// A text field the status decision reads
fn decisive(
    index: usize,
    fields: &Map<String, Value>,
    field: &str,
    strict: bool,
) -> Result<Option<String>, ShapeError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) if strict => Err(ShapeError::MalformedSubject {
            index,
            reason: format!("`{field}` is not a string"),
        }),
        Some(_) => {
            warn!(subject = index, field, "Ignoring status API field with an unexpected type");
            Ok(None)
        }
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
