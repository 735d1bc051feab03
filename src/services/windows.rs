//! Day window generation

use chrono::{Days, NaiveDateTime};

use crate::{
    error::{AppError, AppResult},
    models::{AttendanceBook, AttendanceRecord, DayWindow, EventConfig},
};

/// One admission window per calendar day from `start_date` to `end_date`
/// inclusive, indexed from 1 in chronological order. When the daily end
/// time is not after the start time the window closes on the next day.
pub fn generate_windows(config: &EventConfig) -> AppResult<Vec<DayWindow>> {
    if config.start_date > config.end_date {
        return Err(AppError::InvalidConfig(format!(
            "start_date {} is after end_date {}",
            config.start_date, config.end_date
        )));
    }

    let end_offset = if config.is_overnight() { 1 } else { 0 };
    let mut windows = Vec::new();

    for (offset, date) in config.start_date.iter_days().enumerate() {
        if date > config.end_date {
            break;
        }

        let admission_start = NaiveDateTime::new(date, config.daily_start_time);
        let end_date = date
            .checked_add_days(Days::new(end_offset))
            .ok_or_else(|| AppError::InvalidConfig("Event runs past the supported calendar".to_string()))?;
        let admission_end = NaiveDateTime::new(end_date, config.daily_end_time);

        let index = u32::try_from(offset + 1)
            .map_err(|_| AppError::InvalidConfig("Event spans too many days".to_string()))?;

        windows.push(DayWindow {
            index,
            date,
            admission_start,
            admission_end,
        });
    }

    Ok(windows)
}

/// Empty attendance records, one per window
pub fn empty_records(windows: &[DayWindow]) -> AttendanceBook {
    windows
        .iter()
        .map(|w| (w.index, AttendanceRecord::for_window(w)))
        .collect()
}

/// First window (by index) containing `now`
pub fn active_window(windows: &[DayWindow], now: NaiveDateTime) -> Option<&DayWindow> {
    windows.iter().find(|w| w.contains(now))
}
