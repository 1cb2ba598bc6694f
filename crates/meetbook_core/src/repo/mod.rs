//! Persistence layer: durable slots and meeting collection serialization.
//!
//! # Responsibility
//! - Define the key-value slot contract and its SQLite/in-memory backends.
//! - Translate the meeting collection to and from its stored JSON form.
//!
//! # Invariants
//! - Only `service::meeting_store` calls `PersistenceBridge::save`.
//! - Load paths fail soft; write paths report `PersistenceError`.

pub mod persistence;
pub mod slot_repo;
