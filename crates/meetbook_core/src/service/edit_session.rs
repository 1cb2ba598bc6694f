//! Draft editing session for one meeting.
//!
//! # Responsibility
//! - Stage field edits for a new or existing meeting without touching the
//!   canonical collection.
//! - Defer validation to `commit`, which routes to `MeetingStore::create`
//!   or `MeetingStore::update`.
//!
//! # Invariants
//! - Staged edits are never validated before `commit`.
//! - A failed commit keeps the draft open and records the reason as the
//!   pending error; a successful commit or `cancel` closes the session.
//! - The staged participant list never drops below one slot.

use crate::model::meeting::{MeetingCandidate, MeetingId, MeetingRecord};
use crate::repo::slot_repo::SlotStorage;
use crate::service::meeting_store::{IdClock, MeetingStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Single-valued text fields addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Date,
    Time,
    Level,
    Description,
}

impl FromStr for DraftField {
    type Err = EditSessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "level" => Ok(Self::Level),
            "description" => Ok(Self::Description),
            _ => Err(EditSessionError::UnknownField(value.to_string())),
        }
    }
}

/// Errors from draft editing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSessionError {
    /// Session is closed (never opened, committed, or cancelled).
    NotOpen,
    /// Field name does not map to a `DraftField`.
    UnknownField(String),
    /// Participant slot index is past the end of the staged list.
    ParticipantIndexOutOfRange { index: usize, len: usize },
    /// Removing the slot would leave no participant slots.
    LastParticipantSlot,
    /// Store rejected the draft; the session stays open.
    Commit(StoreError),
}

impl Display for EditSessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "edit session is not open"),
            Self::UnknownField(name) => write!(f, "unknown meeting field: `{name}`"),
            Self::ParticipantIndexOutOfRange { index, len } => write!(
                f,
                "participant slot {index} out of range (slots: {len})"
            ),
            Self::LastParticipantSlot => {
                write!(f, "at least one participant slot must remain")
            }
            Self::Commit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditSessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Commit(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Draft {
    original: Option<MeetingRecord>,
    staged: MeetingCandidate,
}

/// Two-phase draft: stage freely, validate once on commit.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    draft: Option<Draft>,
    pending_error: Option<StoreError>,
}

impl EditSession {
    /// Creates a closed session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a draft for `existing`, or a blank new-meeting draft for `None`.
    ///
    /// Replaces any draft already open and clears the pending error.
    pub fn open(&mut self, existing: Option<&MeetingRecord>) {
        let staged = existing.map(MeetingCandidate::from).unwrap_or_default();
        self.draft = Some(Draft {
            original: existing.cloned(),
            staged,
        });
        self.pending_error = None;
    }

    /// Convenience constructor returning an already-open session.
    pub fn opened(existing: Option<&MeetingRecord>) -> Self {
        let mut session = Self::new();
        session.open(existing);
        session
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Returns whether the open draft edits an existing record.
    pub fn is_editing_existing(&self) -> bool {
        self.original_id().is_some()
    }

    /// Id of the record under edit, `None` for new drafts or closed sessions.
    pub fn original_id(&self) -> Option<MeetingId> {
        self.draft
            .as_ref()
            .and_then(|draft| draft.original.as_ref())
            .map(|record| record.id)
    }

    /// Staged field values, `None` when closed.
    pub fn staged(&self) -> Option<&MeetingCandidate> {
        self.draft.as_ref().map(|draft| &draft.staged)
    }

    /// Reason the last commit failed, cleared by `open`.
    pub fn pending_error(&self) -> Option<&StoreError> {
        self.pending_error.as_ref()
    }

    /// Replaces one staged text field; no validation.
    pub fn edit_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), EditSessionError> {
        let staged = self.staged_mut()?;
        let slot = match field {
            DraftField::Title => &mut staged.title,
            DraftField::Date => &mut staged.date,
            DraftField::Time => &mut staged.time,
            DraftField::Level => &mut staged.level,
            DraftField::Description => &mut staged.description,
        };
        *slot = value.into();
        Ok(())
    }

    /// Replaces one staged participant entry; no validation.
    pub fn set_participant(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), EditSessionError> {
        let participants = &mut self.staged_mut()?.participants;
        let len = participants.len();
        let slot = participants
            .get_mut(index)
            .ok_or(EditSessionError::ParticipantIndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Replaces the whole staged participant list.
    ///
    /// An empty list is staged as one empty slot.
    pub fn set_participants(&mut self, values: Vec<String>) -> Result<(), EditSessionError> {
        let participants = &mut self.staged_mut()?.participants;
        *participants = values;
        if participants.is_empty() {
            participants.push(String::new());
        }
        Ok(())
    }

    /// Appends an empty participant slot.
    pub fn add_participant_slot(&mut self) -> Result<(), EditSessionError> {
        self.staged_mut()?.participants.push(String::new());
        Ok(())
    }

    /// Removes the participant slot at `index`, keeping at least one slot.
    pub fn remove_participant_slot(&mut self, index: usize) -> Result<(), EditSessionError> {
        let participants = &mut self.staged_mut()?.participants;
        let len = participants.len();
        if index >= len {
            return Err(EditSessionError::ParticipantIndexOutOfRange { index, len });
        }
        if len == 1 {
            return Err(EditSessionError::LastParticipantSlot);
        }
        participants.remove(index);
        Ok(())
    }

    /// Validates and applies the draft through `store`.
    ///
    /// New drafts call `create`; drafts of an existing record call `update`
    /// with that record's id.
    ///
    /// # Errors
    /// - `NotOpen` when there is no draft.
    /// - `Commit` with the store's rejection; the draft stays open and the
    ///   reason is kept as `pending_error()`.
    pub fn commit<S: SlotStorage, C: IdClock>(
        &mut self,
        store: &mut MeetingStore<S, C>,
    ) -> Result<MeetingRecord, EditSessionError> {
        let draft = self.draft.as_ref().ok_or(EditSessionError::NotOpen)?;
        let result = match &draft.original {
            Some(original) => store.update(original.id, &draft.staged),
            None => store.create(&draft.staged),
        };

        match result {
            Ok(record) => {
                self.close();
                Ok(record)
            }
            Err(err) => {
                self.pending_error = Some(err.clone());
                Err(EditSessionError::Commit(err))
            }
        }
    }

    /// Discards the draft regardless of its validity.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.draft = None;
        self.pending_error = None;
    }

    fn staged_mut(&mut self) -> Result<&mut MeetingCandidate, EditSessionError> {
        self.draft
            .as_mut()
            .map(|draft| &mut draft.staged)
            .ok_or(EditSessionError::NotOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftField, EditSession, EditSessionError};

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!(" Title ".parse::<DraftField>(), Ok(DraftField::Title));
        assert_eq!(
            "colour".parse::<DraftField>(),
            Err(EditSessionError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn closed_session_rejects_edits() {
        let mut session = EditSession::new();
        assert_eq!(
            session.edit_field(DraftField::Title, "x"),
            Err(EditSessionError::NotOpen)
        );
        assert_eq!(session.add_participant_slot(), Err(EditSessionError::NotOpen));
    }

    #[test]
    fn set_participants_keeps_one_slot() {
        let mut session = EditSession::opened(None);
        session.set_participants(Vec::new()).unwrap();
        assert_eq!(session.staged().unwrap().participants, vec![String::new()]);
    }
}
