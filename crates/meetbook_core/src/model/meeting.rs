//! Meeting domain model.
//!
//! # Responsibility
//! - Define the canonical persisted meeting record and its wire shape.
//! - Define the raw candidate shape collected from user input.
//!
//! # Invariants
//! - `id` is unique across the collection and never reused.
//! - Core builds every stored `MeetingRecord` from a `ValidMeeting`, so
//!   stored string fields are trimmed and non-empty.
//! - `participants` always has at least one syntactically valid email.
//!
//! # See also
//! - crate::rules::validator

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable meeting identifier, assigned once at creation time.
pub type MeetingId = i64;

/// Organizational scope of a meeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingLevel {
    #[default]
    Team,
    Department,
    Company,
}

impl MeetingLevel {
    /// All levels in display order.
    pub const ALL: [MeetingLevel; 3] = [Self::Team, Self::Department, Self::Company];

    /// Returns the wire/display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Team => "Team",
            Self::Department => "Department",
            Self::Company => "Company",
        }
    }
}

impl Display for MeetingLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MeetingLevel {
    type Err = ();

    /// Exact, case-sensitive match on the wire name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or(())
    }
}

/// Raw meeting field values as typed by the user.
///
/// Nothing here is trimmed or validated; see `rules::validator::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingCandidate {
    pub title: String,
    pub date: String,
    pub time: String,
    /// Level name as text, so unknown values can be reported.
    pub level: String,
    pub participants: Vec<String>,
    pub description: String,
}

impl Default for MeetingCandidate {
    /// Blank form: default level and one empty participant slot.
    fn default() -> Self {
        Self {
            title: String::new(),
            date: String::new(),
            time: String::new(),
            level: MeetingLevel::default().as_str().to_string(),
            participants: vec![String::new()],
            description: String::new(),
        }
    }
}

impl From<&MeetingRecord> for MeetingCandidate {
    fn from(record: &MeetingRecord) -> Self {
        Self {
            title: record.title.clone(),
            date: record.date.clone(),
            time: record.time.clone(),
            level: record.level.as_str().to_string(),
            participants: record.participants.clone(),
            description: record.description.clone(),
        }
    }
}

/// Trimmed, fully validated meeting fields without an identity.
///
/// Only `rules::validator::validate` produces this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMeeting {
    pub(crate) title: String,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) level: MeetingLevel,
    pub(crate) participants: Vec<String>,
    pub(crate) description: String,
}

impl ValidMeeting {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

/// Canonical persisted meeting record.
///
/// Field names are the persisted wire names; `level` serializes as its
/// display name (`"Team"`, `"Department"`, `"Company"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: MeetingId,
    pub title: String,
    pub date: String,
    pub time: String,
    pub level: MeetingLevel,
    pub participants: Vec<String>,
    pub description: String,
}

impl MeetingRecord {
    /// Binds validated fields to an identity.
    pub fn from_valid(id: MeetingId, valid: ValidMeeting) -> Self {
        Self {
            id,
            title: valid.title,
            date: valid.date,
            time: valid.time,
            level: valid.level,
            participants: valid.participants,
            description: valid.description,
        }
    }

    /// Returns whether this record occupies the given time slot.
    ///
    /// Literal string equality; `"9:00"` and `"09:00"` are different slots.
    pub fn occupies(&self, date: &str, time: &str) -> bool {
        self.date == date && self.time == time
    }
}

#[cfg(test)]
mod tests {
    use super::{MeetingCandidate, MeetingLevel};

    #[test]
    fn level_parses_exact_names_only() {
        assert_eq!("Department".parse::<MeetingLevel>(), Ok(MeetingLevel::Department));
        assert!("team".parse::<MeetingLevel>().is_err());
        assert!("".parse::<MeetingLevel>().is_err());
    }

    #[test]
    fn blank_candidate_has_one_empty_participant_slot() {
        let candidate = MeetingCandidate::default();
        assert_eq!(candidate.level, "Team");
        assert_eq!(candidate.participants, vec![String::new()]);
    }
}
