//! Submission checks applied at the HTTP boundary.
//!
//! The render pipeline is total and renders whatever it is given. These checks mirror
//! the required fields of the resume form so the API rejects the same submissions the
//! form would.

use serde::Serialize;

use crate::models::resume::ResumeRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Returns every required field that is blank. An empty vector means the record is accepted.
pub fn validate_submission(record: &ResumeRecord) -> Vec<FieldError> {
    let required = [
        ("personalInfo.name", record.personal_info.name.as_str()),
        ("personalInfo.email", record.personal_info.email.as_str()),
    ];

    required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError {
            field,
            message: "is required",
        })
        .collect()
}

/// Joins field errors into a single human-readable message.
pub fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
