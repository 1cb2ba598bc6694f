//! Field validation for meeting candidates.
//!
//! # Responsibility
//! - Trim raw candidate input and check it against meeting field rules.
//! - Report the first violated rule in a fixed priority order.
//!
//! # Invariants
//! - Validation is pure: no I/O, no logging, no mutation of the input.
//! - Rule order: missing field, missing participant, invalid email,
//!   unknown level.

use crate::model::meeting::{MeetingCandidate, MeetingLevel, ValidMeeting};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Violated validation rule for a meeting candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    MissingField { field: &'static str },
    /// Participant list is empty or has an empty entry.
    MissingParticipant,
    /// A participant entry does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Level is not one of `Team|Department|Company`.
    UnknownLevel(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "please fill in all required fields (missing `{field}`)")
            }
            Self::MissingParticipant => {
                write!(f, "please provide at least one participant email")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::UnknownLevel(value) => write!(
                f,
                "unknown meeting level `{value}`; expected Team|Department|Company"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Validates a raw candidate and returns its trimmed, typed fields.
///
/// # Errors
/// - `MissingField` for the first blank field in the order
///   title, date, time, level, description.
/// - `MissingParticipant` when the list is empty or any entry is blank.
/// - `InvalidEmail` with the first entry failing the email pattern.
/// - `UnknownLevel` when level is not an exact level name.
pub fn validate(candidate: &MeetingCandidate) -> Result<ValidMeeting, ValidationError> {
    let title = candidate.title.trim();
    let date = candidate.date.trim();
    let time = candidate.time.trim();
    let level = candidate.level.trim();
    let description = candidate.description.trim();

    let required = [
        ("title", title),
        ("date", date),
        ("time", time),
        ("level", level),
        ("description", description),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(ValidationError::MissingField { field: *field });
    }

    let participants = normalize_participants(&candidate.participants)?;

    let level = level
        .parse::<MeetingLevel>()
        .map_err(|_| ValidationError::UnknownLevel(level.to_string()))?;

    Ok(ValidMeeting {
        title: title.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        level,
        participants,
        description: description.to_string(),
    })
}

/// Returns whether `value` matches the basic `local@domain.tld` shape.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn normalize_participants(raw: &[String]) -> Result<Vec<String>, ValidationError> {
    let trimmed: Vec<String> = raw.iter().map(|entry| entry.trim().to_string()).collect();
    if trimmed.is_empty() || trimmed.iter().any(String::is_empty) {
        return Err(ValidationError::MissingParticipant);
    }
    if let Some(bad) = trimmed.iter().find(|entry| !is_valid_email(entry)) {
        return Err(ValidationError::InvalidEmail(bad.clone()));
    }
    Ok(trimmed)
}
