//! Display-ready, chronologically sorted view of the meeting collection.
//!
//! The view is recomputed on every call and borrows the records; it never
//! mutates or persists anything.

use crate::model::meeting::MeetingRecord;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];
const DATE_LABEL_FORMAT: &str = "%b %-d, %Y";

/// One display row; `record` is a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRow<'a> {
    pub record: &'a MeetingRecord,
    /// Parsed start, `None` when date or time cannot be parsed.
    pub starts_at: Option<NaiveDateTime>,
    /// Human-readable date (`May 1, 2024`), or the raw text if unparseable.
    pub date_label: String,
    /// Participants joined with `", "`.
    pub participants_label: String,
}

/// Returns rows sorted ascending by `(date, time)`.
///
/// Sorting is stable, so records sharing a start keep insertion order.
/// Records with an unparseable date or time sort after all others.
pub fn present(records: &[MeetingRecord]) -> Vec<MeetingRow<'_>> {
    let mut rows: Vec<MeetingRow<'_>> = records.iter().map(to_row).collect();
    rows.sort_by_key(|row| (row.starts_at.is_none(), row.starts_at));
    rows
}

/// Parses a record's start from its stored date and time strings.
pub fn parse_start(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())?;
    Some(date.and_time(time))
}

fn to_row(record: &MeetingRecord) -> MeetingRow<'_> {
    let date_label = NaiveDate::parse_from_str(&record.date, DATE_FORMAT)
        .map(|date| date.format(DATE_LABEL_FORMAT).to_string())
        .unwrap_or_else(|_| record.date.clone());

    MeetingRow {
        record,
        starts_at: parse_start(&record.date, &record.time),
        date_label,
        participants_label: record.participants.join(", "),
    }
}
