//! Event configuration model (dates, daily hours, capacity)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Published event configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventConfig {
    /// Event name
    pub event_name: String,
    /// First day of the event
    pub start_date: NaiveDate,
    /// Last day of the event (inclusive)
    pub end_date: NaiveDate,
    /// Daily admission opening time
    #[schema(value_type = String, example = "17:00:00")]
    pub daily_start_time: NaiveTime,
    /// Daily admission closing time; earlier than or equal to the opening
    /// time means the window runs past midnight
    #[schema(value_type = String, example = "02:00:00")]
    pub daily_end_time: NaiveTime,
    /// Maximum admissions per day
    pub max_attendees: u32,
}

/// Save event configuration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveEventConfig {
    #[validate(length(min = 1, message = "Event name is required"))]
    pub event_name: String,
    /// Start date (YYYY-MM-DD)
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    /// End date (YYYY-MM-DD)
    #[validate(length(min = 1, message = "End date is required"))]
    pub end_date: String,
    /// Daily start time (HH:MM)
    #[validate(length(min = 1, message = "Start time is required"))]
    pub start_time: String,
    /// Daily end time (HH:MM)
    #[validate(length(min = 1, message = "End time is required"))]
    pub end_time: String,
    #[validate(range(min = 0, message = "Max attendees must be a non-negative integer"))]
    pub max_attendees: i64,
}

impl EventConfig {
    /// Whether the daily window crosses midnight
    pub fn is_overnight(&self) -> bool {
        self.daily_end_time <= self.daily_start_time
    }

    /// Build a configuration from a save request, rejecting anything that
    /// would not produce at least one admission window.
    pub fn parse(data: &SaveEventConfig) -> AppResult<Self> {
        data.validate()
            .map_err(|e| AppError::InvalidConfig(e.to_string()))?;

        let start_date = parse_date(&data.start_date, "start_date")?;
        let end_date = parse_date(&data.end_date, "end_date")?;
        if start_date > end_date {
            return Err(AppError::InvalidConfig(format!(
                "start_date {} is after end_date {}",
                start_date, end_date
            )));
        }

        let max_attendees = u32::try_from(data.max_attendees).map_err(|_| {
            AppError::InvalidConfig("max_attendees out of range".to_string())
        })?;

        Ok(Self {
            event_name: data.event_name.trim().to_string(),
            start_date,
            end_date,
            daily_start_time: parse_time(&data.start_time, "start_time")?,
            daily_end_time: parse_time(&data.end_time, "end_time")?,
            max_attendees,
        })
    }
}

fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidConfig(format!("Invalid {} (expected YYYY-MM-DD)", field)))
}

fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidConfig(format!("Invalid {} (expected HH:MM)", field)))
}
