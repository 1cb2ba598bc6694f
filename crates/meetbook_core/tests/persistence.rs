use meetbook_core::db::open_db;
use meetbook_core::{
    MeetingCandidate, MeetingRecord, MeetingStore, MemorySlotStorage, PersistenceBridge,
    SqliteSlotStorage, DEFAULT_SLOT_KEY,
};
use serde_json::json;

fn candidate(title: &str, date: &str, time: &str, level: &str) -> MeetingCandidate {
    MeetingCandidate {
        title: title.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        level: level.to_string(),
        participants: vec!["a@b.com".to_string(), "ops@corp.example".to_string()],
        description: format!("{title} notes"),
    }
}

fn sorted_by_id(mut records: Vec<MeetingRecord>) -> Vec<MeetingRecord> {
    records.sort_by_key(|record| record.id);
    records
}

#[test]
fn save_then_load_roundtrips_by_value() {
    let storage = MemorySlotStorage::new();
    let mut store = MeetingStore::open(PersistenceBridge::new(&storage));
    store.create(&candidate("Standup", "2024-05-01", "09:00", "Team")).unwrap();
    store.create(&candidate("All hands", "2024-04-30", "16:00", "Company")).unwrap();
    store.create(&candidate("Budget", "2024-05-02", "11:15", "Department")).unwrap();

    let bridge = PersistenceBridge::new(&storage);
    let loaded = bridge.load();
    assert_eq!(sorted_by_id(loaded), sorted_by_id(store.list().to_vec()));
}

#[test]
fn collection_survives_reopening_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meetbook.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let mut store = MeetingStore::open(PersistenceBridge::new(SqliteSlotStorage::new(&conn)));
        store.create(&candidate("Standup", "2024-05-01", "09:00", "Team")).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = MeetingStore::open(PersistenceBridge::new(SqliteSlotStorage::new(&conn)));
    assert_eq!(store.list(), &[created]);
}

#[test]
fn stored_shape_uses_expected_wire_fields() {
    let storage = MemorySlotStorage::new();
    let mut store = MeetingStore::open(PersistenceBridge::new(&storage));
    let created = store
        .create(&candidate("Standup", "2024-05-01", "09:00", "Department"))
        .unwrap();

    let raw = storage.raw_slot(DEFAULT_SLOT_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": created.id,
            "title": "Standup",
            "date": "2024-05-01",
            "time": "09:00",
            "level": "Department",
            "participants": ["a@b.com", "ops@corp.example"],
            "description": "Standup notes"
        }])
    );
}

#[test]
fn absent_slot_loads_empty() {
    let bridge = PersistenceBridge::new(MemorySlotStorage::new());
    let report = bridge.load_report();
    assert!(report.records.is_empty());
    assert_eq!(report.discarded, 0);
    assert!(report.read_error.is_none());
}

#[test]
fn malformed_json_loads_empty() {
    let storage = MemorySlotStorage::with_slot(DEFAULT_SLOT_KEY, "[{\"id\": 1, ");
    let bridge = PersistenceBridge::new(storage);
    assert!(bridge.load().is_empty());
}

#[test]
fn malformed_entries_are_dropped_individually() {
    let slot = json!([
        {
            "id": 1, "title": "Keep", "date": "2024-05-01", "time": "09:00",
            "level": "Team", "participants": ["a@b.com"], "description": "ok"
        },
        "not an object",
        {
            "id": 2, "title": "Missing description", "date": "2024-05-01",
            "time": "10:00", "level": "Team", "participants": ["a@b.com"]
        },
        {
            "id": 3, "title": "Bad email", "date": "2024-05-01", "time": "11:00",
            "level": "Team", "participants": ["nope"], "description": "x"
        },
        {
            "id": 4, "title": "Bad level", "date": "2024-05-01", "time": "12:00",
            "level": "Galaxy", "participants": ["a@b.com"], "description": "x"
        },
        {
            "id": 5, "title": "  ", "date": "2024-05-01", "time": "13:00",
            "level": "Team", "participants": ["a@b.com"], "description": "x"
        },
        {
            "id": 6, "title": "Also keep", "date": "2024-05-02", "time": "09:00",
            "level": "Company", "participants": ["c@d.io"], "description": "ok"
        }
    ]);
    let storage = MemorySlotStorage::with_slot(DEFAULT_SLOT_KEY, slot.to_string());
    let report = PersistenceBridge::new(storage).load_report();

    let ids: Vec<i64> = report.records.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![1, 6]);
    assert_eq!(report.discarded, 5);
}

#[test]
fn duplicate_ids_and_slots_keep_first_entry() {
    let slot = json!([
        {
            "id": 1, "title": "First", "date": "2024-05-01", "time": "09:00",
            "level": "Team", "participants": ["a@b.com"], "description": "x"
        },
        {
            "id": 1, "title": "Same id", "date": "2024-05-03", "time": "09:00",
            "level": "Team", "participants": ["a@b.com"], "description": "x"
        },
        {
            "id": 2, "title": "Same slot", "date": "2024-05-01", "time": "09:00",
            "level": "Team", "participants": ["a@b.com"], "description": "x"
        }
    ]);
    let storage = MemorySlotStorage::with_slot(DEFAULT_SLOT_KEY, slot.to_string());
    let report = PersistenceBridge::new(storage).load_report();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].title, "First");
    assert_eq!(report.discarded, 2);
}

#[test]
fn custom_slot_key_is_isolated_from_default() {
    let storage = MemorySlotStorage::new();
    let mut store = MeetingStore::open(PersistenceBridge::with_key(&storage, "meetings-work"));
    store.create(&candidate("Standup", "2024-05-01", "09:00", "Team")).unwrap();

    assert!(storage.raw_slot("meetings-work").is_some());
    assert!(PersistenceBridge::new(&storage).load().is_empty());
}
