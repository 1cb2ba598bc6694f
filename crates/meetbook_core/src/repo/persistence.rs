//! Meeting collection serialization to a single durable slot.
//!
//! # Responsibility
//! - Save the whole meeting collection as one JSON array (overwrite).
//! - Load the collection back, failing soft on any storage or data problem.
//!
//! # Invariants
//! - `save` never appends or diffs; it replaces the slot contents entirely.
//! - `load` never returns an error. Absent, unreadable, or non-array slots
//!   load as an empty collection.
//! - Individual array entries that fail to decode, fail validation, or reuse
//!   an id or `(date, time)` already loaded are dropped; the first wins.
//! - Loaded records are re-normalized (trimmed) through the validator.

use crate::model::meeting::{MeetingCandidate, MeetingId, MeetingRecord};
use crate::repo::slot_repo::{SlotError, SlotStorage};
use crate::rules::conflict::has_conflict;
use crate::rules::validator::validate;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used when no override is configured.
pub const DEFAULT_SLOT_KEY: &str = "meetings";

/// Durable slot could not be read or written.
///
/// Never fatal to the in-memory collection.
#[derive(Debug)]
pub enum PersistenceError {
    /// Slot storage failed (disabled, quota exceeded, I/O).
    Unavailable(SlotError),
    /// Collection could not be encoded to JSON.
    Encode(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "persistence unavailable: {err}"),
            Self::Encode(err) => write!(f, "failed to encode meetings: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<SlotError> for PersistenceError {
    fn from(value: SlotError) -> Self {
        Self::Unavailable(value)
    }
}

/// Outcome of a tolerant load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records that survived decoding and validation, in stored order.
    pub records: Vec<MeetingRecord>,
    /// Number of stored entries dropped as malformed or duplicate.
    pub discarded: usize,
    /// Set when the slot itself could not be read.
    pub read_error: Option<PersistenceError>,
}

/// Serializes the meeting collection to and from one named slot.
pub struct PersistenceBridge<S: SlotStorage> {
    storage: S,
    key: String,
}

impl<S: SlotStorage> PersistenceBridge<S> {
    /// Creates a bridge over the default `meetings` slot.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_SLOT_KEY)
    }

    /// Creates a bridge over a caller-chosen slot key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Overwrites the slot with the full collection.
    ///
    /// # Errors
    /// - `Encode` when JSON encoding fails.
    /// - `Unavailable` when the slot write fails.
    pub fn save(&self, records: &[MeetingRecord]) -> Result<(), PersistenceError> {
        let payload = serde_json::to_string(records).map_err(PersistenceError::Encode)?;
        self.storage.write_slot(&self.key, &payload)?;
        Ok(())
    }

    /// Loads the collection, returning an empty one on any slot failure.
    pub fn load(&self) -> Vec<MeetingRecord> {
        self.load_report().records
    }

    /// Loads the collection with discard and read-error details.
    pub fn load_report(&self) -> LoadReport {
        let raw = match self.storage.read_slot(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=slot_load module=persistence status=empty reason=absent");
                return LoadReport::default();
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=persistence status=error error_code=slot_read_failed error={}",
                    err
                );
                return LoadReport {
                    read_error: Some(err.into()),
                    ..LoadReport::default()
                };
            }
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("event=slot_load module=persistence status=empty reason=not_an_array");
                return LoadReport::default();
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=persistence status=empty reason=malformed_json line={} column={}",
                    err.line(),
                    err.column()
                );
                return LoadReport::default();
            }
        };

        let report = decode_entries(entries);
        info!(
            "event=slot_load module=persistence status=ok loaded={} discarded={}",
            report.records.len(),
            report.discarded
        );
        report
    }
}

fn decode_entries(entries: Vec<Value>) -> LoadReport {
    let mut records: Vec<MeetingRecord> = Vec::with_capacity(entries.len());
    let mut seen_ids: HashSet<MeetingId> = HashSet::new();
    let mut discarded = 0;

    for entry in entries {
        match decode_entry(entry) {
            Some(record)
                if !seen_ids.contains(&record.id)
                    && !has_conflict(&records, &record.date, &record.time, None) =>
            {
                seen_ids.insert(record.id);
                records.push(record);
            }
            _ => discarded += 1,
        }
    }

    LoadReport {
        records,
        discarded,
        read_error: None,
    }
}

fn decode_entry(entry: Value) -> Option<MeetingRecord> {
    let stored: MeetingRecord = serde_json::from_value(entry).ok()?;
    let valid = validate(&MeetingCandidate::from(&stored)).ok()?;
    Some(MeetingRecord::from_valid(stored.id, valid))
}
