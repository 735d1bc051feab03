//! Per-day admission window

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The admission-valid instant range for one calendar day of the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayWindow {
    /// 1-based day number, in chronological order
    pub index: u32,
    /// Calendar day the window opens on
    pub date: NaiveDate,
    #[schema(value_type = String, example = "2024-12-31T22:00:00")]
    pub admission_start: NaiveDateTime,
    #[schema(value_type = String, example = "2025-01-01T02:00:00")]
    pub admission_end: NaiveDateTime,
}

impl DayWindow {
    /// Both bounds are inclusive
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.admission_start <= instant && instant <= self.admission_end
    }
}
