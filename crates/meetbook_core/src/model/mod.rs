//! Domain model for scheduled meetings.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted shape and the raw input shape separate.
//!
//! # Invariants
//! - Every stored meeting is identified by a stable `MeetingId`.
//! - Deletion is a hard remove from the collection.

pub mod meeting;
