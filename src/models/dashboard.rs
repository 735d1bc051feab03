//! Dashboard summary model

use serde::Serialize;
use utoipa::ToSchema;

use super::{attendance::Entry, event::EventConfig};

/// Admissions counted on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DayCount {
    pub day: u32,
    pub date: Option<chrono::NaiveDate>,
    pub count: u32,
}

/// Admissions within one minute of the active day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ArrivalBucket {
    /// HH:MM
    pub time: String,
    pub count: u32,
}

/// Event overview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub event: Option<EventConfig>,
    pub days: Vec<DayCount>,
    pub total_admitted: u64,
    /// Day whose window contains the current time
    pub active_day: Option<u32>,
    pub active_entries: Vec<Entry>,
    pub arrivals: Vec<ArrivalBucket>,
}
