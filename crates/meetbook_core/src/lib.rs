//! Core domain logic for Meetbook, a single-user meeting scheduler.
//! This crate is the single source of truth for meeting invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rules;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::meeting::{MeetingCandidate, MeetingId, MeetingLevel, MeetingRecord, ValidMeeting};
pub use repo::persistence::{LoadReport, PersistenceBridge, PersistenceError, DEFAULT_SLOT_KEY};
pub use repo::slot_repo::{MemorySlotStorage, SlotError, SlotResult, SlotStorage, SqliteSlotStorage};
pub use rules::conflict::{find_conflict, has_conflict};
pub use rules::validator::{is_valid_email, validate, ValidationError};
pub use service::edit_session::{DraftField, EditSession, EditSessionError};
pub use service::meeting_store::{IdClock, MeetingStore, StoreError, StoreResult, SystemClock};
pub use service::presenter::{present, MeetingRow};

/// Minimal health-check API for host wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
