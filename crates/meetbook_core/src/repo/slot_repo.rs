//! Durable key-value slot contracts and implementations.
//!
//! # Responsibility
//! - Provide whole-value read/overwrite access to named text slots.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `write_slot` replaces the previous value in a single statement; a slot
//!   never holds a partially written value.
//! - A missing slot reads as `None`, not as an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Slot storage transport error.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Slot key is blank after trim.
    InvalidKey(String),
    /// Backend refused the operation (disabled, quota, read-only).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key: `{key}`"),
            Self::Unavailable(message) => write!(f, "slot storage unavailable: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-value access to named durable text slots.
pub trait SlotStorage {
    /// Reads the full value stored under `key`.
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for &S {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write_slot(key, value)
    }
}

/// SQLite-backed slot storage over the `kv_slots` table.
pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local slot storage.
///
/// Used by tests and hosts that run without a database file. Can be switched
/// into a failing mode to exercise unavailable-storage paths.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-seeded with one raw slot value.
    pub fn with_slot(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .slots
            .borrow_mut()
            .insert(key.trim().to_string(), value.into());
        storage
    }

    /// Makes every subsequent read and write fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Returns the raw stored value, bypassing availability checks.
    pub fn raw_slot(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key.trim()).cloned()
    }

    fn ensure_available(&self) -> SlotResult<()> {
        if self.unavailable.get() {
            return Err(SlotError::Unavailable("memory storage disabled".to_string()));
        }
        Ok(())
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        self.ensure_available()?;
        let key = normalize_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.ensure_available()?;
        let key = normalize_key(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn normalize_key(key: &str) -> SlotResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(SlotError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{MemorySlotStorage, SlotError, SlotStorage, SqliteSlotStorage};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_slot_overwrites_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let storage = SqliteSlotStorage::new(&conn);

        assert_eq!(storage.read_slot("meetings").unwrap(), None);
        storage.write_slot("meetings", "[1]").unwrap();
        storage.write_slot("meetings", "[2]").unwrap();
        assert_eq!(storage.read_slot("meetings").unwrap().as_deref(), Some("[2]"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn blank_key_is_rejected() {
        let storage = MemorySlotStorage::new();
        let err = storage.write_slot("  ", "x").unwrap_err();
        assert!(matches!(err, SlotError::InvalidKey(_)));
    }

    #[test]
    fn unavailable_memory_storage_fails_reads_and_writes() {
        let storage = MemorySlotStorage::with_slot("meetings", "[]");
        storage.set_unavailable(true);
        assert!(matches!(
            storage.read_slot("meetings").unwrap_err(),
            SlotError::Unavailable(_)
        ));
        assert!(storage.write_slot("meetings", "[1]").is_err());
        assert_eq!(storage.raw_slot("meetings").as_deref(), Some("[]"));
    }
}
