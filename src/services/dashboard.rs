//! Dashboard summary service

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    error::AppResult,
    models::{ArrivalBucket, DashboardSummary, DayCount, Entry},
    repository::Repository,
};

use super::{
    clock::Clock,
    windows::{active_window, generate_windows},
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Event details, per-day counts and the active day's arrivals
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let now = self.clock.now();
        let config = self.repository.read_config().await?;
        let records = self.repository.read_all().await?.unwrap_or_default();

        let days: Vec<DayCount> = records
            .iter()
            .map(|(day, record)| DayCount {
                day: *day,
                date: record.date,
                count: record.count,
            })
            .collect();
        let total_admitted = days.iter().map(|d| u64::from(d.count)).sum();

        // Same day rule as admission: the window containing now
        let active_day = config
            .as_ref()
            .and_then(|c| generate_windows(c).ok())
            .and_then(|windows| active_window(&windows, now).map(|w| w.index));

        let active_entries = active_day
            .and_then(|day| records.get(&day))
            .map(|r| r.entries.clone())
            .unwrap_or_default();
        let arrivals = arrivals_by_minute(&active_entries);

        Ok(DashboardSummary {
            event: config,
            days,
            total_admitted,
            active_day,
            active_entries,
            arrivals,
        })
    }
}

/// Count entries per HH:MM, sorted by time label
pub fn arrivals_by_minute(entries: &[Entry]) -> Vec<ArrivalBucket> {
    let mut buckets: BTreeMap<String, u32> = BTreeMap::new();
    for entry in entries {
        *buckets.entry(entry.time.format("%H:%M").to_string()).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(time, count)| ArrivalBucket { time, count })
        .collect()
}
