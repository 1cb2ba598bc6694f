//! Time-slot conflict detection.
//!
//! Two meetings conflict when their `date` and `time` strings are identical.
//! No normalization is applied, so `"9:00"` does not collide with `"09:00"`.

use crate::model::meeting::{MeetingId, MeetingRecord};

/// Returns the id of a record occupying `(date, time)`, ignoring `exclude_id`.
pub fn find_conflict(
    records: &[MeetingRecord],
    date: &str,
    time: &str,
    exclude_id: Option<MeetingId>,
) -> Option<MeetingId> {
    records
        .iter()
        .filter(|record| Some(record.id) != exclude_id)
        .find(|record| record.occupies(date, time))
        .map(|record| record.id)
}

/// Returns whether any record other than `exclude_id` occupies `(date, time)`.
pub fn has_conflict(
    records: &[MeetingRecord],
    date: &str,
    time: &str,
    exclude_id: Option<MeetingId>,
) -> bool {
    find_conflict(records, date, time, exclude_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::{find_conflict, has_conflict};
    use crate::model::meeting::{MeetingLevel, MeetingRecord};

    fn record(id: i64, date: &str, time: &str) -> MeetingRecord {
        MeetingRecord {
            id,
            title: "Sync".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            level: MeetingLevel::Team,
            participants: vec!["a@b.com".to_string()],
            description: "weekly".to_string(),
        }
    }

    #[test]
    fn detects_identical_slot() {
        let records = vec![record(1, "2024-05-01", "09:00"), record(2, "2024-05-02", "09:00")];
        assert_eq!(find_conflict(&records, "2024-05-02", "09:00", None), Some(2));
        assert!(!has_conflict(&records, "2024-05-03", "09:00", None));
    }

    #[test]
    fn excluded_record_does_not_conflict_with_itself() {
        let records = vec![record(1, "2024-05-01", "09:00")];
        assert!(!has_conflict(&records, "2024-05-01", "09:00", Some(1)));
        assert!(has_conflict(&records, "2024-05-01", "09:00", Some(7)));
    }

    #[test]
    fn comparison_is_literal() {
        let records = vec![record(1, "2024-05-01", "09:00")];
        assert!(!has_conflict(&records, "2024-05-01", "9:00", None));
    }
}
