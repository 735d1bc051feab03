//! Attendance records (one per event day) and their entries

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::day_window::DayWindow;

/// All attendance records of an event, keyed by day index
pub type AttendanceBook = BTreeMap<u32, AttendanceRecord>;

/// One logged admission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Entry {
    pub pass_id: String,
    /// Calendar date of the scan
    pub date: NaiveDate,
    /// Wall-clock time of the scan, for display only
    #[schema(value_type = String, example = "22:14:03")]
    pub time: NaiveTime,
}

impl Entry {
    pub fn new(pass_id: impl Into<String>, scanned_at: NaiveDateTime) -> Self {
        let time = scanned_at.time();
        Self {
            pass_id: pass_id.into(),
            date: scanned_at.date(),
            time: time.with_nanosecond(0).unwrap_or(time),
        }
    }
}

/// Version a conditional update is checked against. `generation` is
/// stamped by the store whenever the records are initialized, so a record
/// of an earlier event never matches one of the current event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordVersion {
    pub generation: u64,
    pub count: u32,
}

/// Attendance record for one event day. Entries are append-only and
/// `count` always equals the number of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    /// Initialization the record belongs to (assigned by the store)
    #[serde(default)]
    pub generation: u64,
    /// Calendar day of the window (display)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Window opening instant (display)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub start: Option<NaiveDateTime>,
    /// Window closing instant (display)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl AttendanceRecord {
    /// Empty record for a freshly generated window
    pub fn for_window(window: &DayWindow) -> Self {
        Self {
            generation: 0,
            date: Some(window.date),
            start: Some(window.admission_start),
            end: Some(window.admission_end),
            count: 0,
            entries: Vec::new(),
        }
    }

    pub fn version(&self) -> RecordVersion {
        RecordVersion {
            generation: self.generation,
            count: self.count,
        }
    }

    pub fn contains_pass(&self, pass_id: &str) -> bool {
        self.entries.iter().any(|e| e.pass_id == pass_id)
    }

    /// Copy of this record with one more admission appended
    pub fn with_entry(&self, entry: Entry) -> Self {
        let mut next = self.clone();
        next.entries.push(entry);
        next.count = self.count + 1;
        next
    }
}

/// Attendance record together with its day index
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayAttendance {
    pub day: u32,
    #[serde(flatten)]
    pub record: AttendanceRecord,
}
