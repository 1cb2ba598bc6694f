//! Meeting collection owner and mutation entry point.
//!
//! # Responsibility
//! - Own the canonical in-memory meeting collection.
//! - Run validation and conflict checks before every create/update.
//! - Persist the whole collection after every successful mutation.
//!
//! # Invariants
//! - No two records share an id or a `(date, time)` pair.
//! - A failed create/update leaves the collection untouched and writes nothing.
//! - Each successful create/update/delete performs exactly one slot write.
//! - Persistence failures never undo an in-memory mutation; they are logged
//!   and kept in `persistence_error()` until the next successful write.

use crate::model::meeting::{MeetingCandidate, MeetingId, MeetingRecord, ValidMeeting};
use crate::repo::persistence::{PersistenceBridge, PersistenceError};
use crate::repo::slot_repo::SlotStorage;
use crate::rules::conflict::find_conflict;
use crate::rules::validator::{validate, ValidationError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejection reason for a create/update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Candidate fields violate a validation rule.
    Validation(ValidationError),
    /// Another record already occupies the candidate time slot.
    SchedulingConflict {
        date: String,
        time: String,
        existing_id: MeetingId,
    },
    /// Target record does not exist.
    NotFound(MeetingId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SchedulingConflict { date, time, .. } => write!(
                f,
                "a meeting is already scheduled at {date} {time}"
            ),
            Self::NotFound(id) => write!(f, "meeting not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::SchedulingConflict { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Time source for id assignment, in epoch milliseconds.
pub trait IdClock {
    fn now_ms(&self) -> i64;
}

/// Wall-clock id source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl IdClock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Owned meeting collection backed by one durable slot.
pub struct MeetingStore<S: SlotStorage, C: IdClock = SystemClock> {
    records: Vec<MeetingRecord>,
    bridge: PersistenceBridge<S>,
    clock: C,
    last_issued_id: MeetingId,
    persistence_error: Option<PersistenceError>,
}

impl<S: SlotStorage> MeetingStore<S> {
    /// Loads the collection from `bridge`; starts empty when nothing loads.
    pub fn open(bridge: PersistenceBridge<S>) -> Self {
        Self::open_with_clock(bridge, SystemClock)
    }
}

impl<S: SlotStorage, C: IdClock> MeetingStore<S, C> {
    /// Loads the collection using a caller-provided id clock.
    pub fn open_with_clock(bridge: PersistenceBridge<S>, clock: C) -> Self {
        let report = bridge.load_report();
        let last_issued_id = report
            .records
            .iter()
            .map(|record| record.id)
            .max()
            .unwrap_or(0);

        info!(
            "event=store_open module=store status=ok records={} discarded={}",
            report.records.len(),
            report.discarded
        );

        Self {
            records: report.records,
            bridge,
            clock,
            last_issued_id,
            persistence_error: report.read_error,
        }
    }

    /// Validates and inserts a new meeting, then persists.
    ///
    /// # Errors
    /// - `Validation` for the first violated field rule.
    /// - `SchedulingConflict` when `(date, time)` is already taken.
    pub fn create(&mut self, candidate: &MeetingCandidate) -> StoreResult<MeetingRecord> {
        let valid = self
            .check(candidate, None)
            .inspect_err(|err| log_rejected("meeting_create", None, err))?;

        let id = self.next_id();
        let record = MeetingRecord::from_valid(id, valid);
        self.records.push(record.clone());
        info!("event=meeting_create module=store status=ok id={id}");
        self.persist();
        Ok(record)
    }

    /// Replaces the record `id` with validated candidate fields, then persists.
    ///
    /// The record keeps its id and is never compared against itself for
    /// slot conflicts.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the collection.
    /// - `Validation` / `SchedulingConflict` as for `create`.
    pub fn update(
        &mut self,
        id: MeetingId,
        candidate: &MeetingCandidate,
    ) -> StoreResult<MeetingRecord> {
        let Some(index) = self.position(id) else {
            let err = StoreError::NotFound(id);
            log_rejected("meeting_update", Some(id), &err);
            return Err(err);
        };
        let valid = self
            .check(candidate, Some(id))
            .inspect_err(|err| log_rejected("meeting_update", Some(id), err))?;

        let record = MeetingRecord::from_valid(id, valid);
        self.records[index] = record.clone();
        info!("event=meeting_update module=store status=ok id={id}");
        self.persist();
        Ok(record)
    }

    /// Removes the record `id` if present, then persists.
    ///
    /// Returns whether a record was removed. Deleting an unknown id is a
    /// no-op, not an error.
    pub fn delete(&mut self, id: MeetingId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;
        info!("event=meeting_delete module=store status=ok id={id} removed={removed}");
        self.persist();
        removed
    }

    /// Returns the full collection in storage order (not display order).
    pub fn list(&self) -> &[MeetingRecord] {
        &self.records
    }

    pub fn get(&self, id: MeetingId) -> Option<&MeetingRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the last persistence failure, cleared by the next good write.
    pub fn persistence_error(&self) -> Option<&PersistenceError> {
        self.persistence_error.as_ref()
    }

    fn check(
        &self,
        candidate: &MeetingCandidate,
        exclude_id: Option<MeetingId>,
    ) -> StoreResult<ValidMeeting> {
        let valid = validate(candidate)?;
        if let Some(existing_id) =
            find_conflict(&self.records, valid.date(), valid.time(), exclude_id)
        {
            return Err(StoreError::SchedulingConflict {
                date: valid.date().to_string(),
                time: valid.time().to_string(),
                existing_id,
            });
        }
        Ok(valid)
    }

    fn position(&self, id: MeetingId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn next_id(&mut self) -> MeetingId {
        let id = match self.last_issued_id.checked_add(1) {
            Some(floor) => self.clock.now_ms().max(floor),
            None => self.lowest_free_id(),
        };
        self.last_issued_id = self.last_issued_id.max(id);
        id
    }

    /// Smallest positive id not held by a record; used once the id space
    /// above `last_issued_id` is exhausted.
    fn lowest_free_id(&self) -> MeetingId {
        let taken: HashSet<MeetingId> = self.records.iter().map(|record| record.id).collect();
        let id = (1..=MeetingId::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or(MeetingId::MIN);
        warn!("event=meeting_id module=store status=fallback reason=id_space_exhausted id={id}");
        id
    }

    fn persist(&mut self) {
        match self.bridge.save(&self.records) {
            Ok(()) => {
                self.persistence_error = None;
            }
            Err(err) => {
                warn!(
                    "event=slot_save module=store status=error error_code=persistence_unavailable records={} error={}",
                    self.records.len(),
                    err
                );
                self.persistence_error = Some(err);
            }
        }
    }
}

fn log_rejected(event: &str, id: Option<MeetingId>, err: &StoreError) {
    let reason = match err {
        StoreError::Validation(ValidationError::MissingField { .. }) => "missing_field",
        StoreError::Validation(ValidationError::MissingParticipant) => "missing_participant",
        StoreError::Validation(ValidationError::InvalidEmail(_)) => "invalid_email",
        StoreError::Validation(ValidationError::UnknownLevel(_)) => "unknown_level",
        StoreError::SchedulingConflict { .. } => "scheduling_conflict",
        StoreError::NotFound(_) => "not_found",
    };
    match id {
        Some(id) => info!("event={event} module=store status=rejected id={id} reason={reason}"),
        None => info!("event={event} module=store status=rejected reason={reason}"),
    }
}
