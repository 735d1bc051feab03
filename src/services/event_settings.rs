//! Event configuration service (save, reset, attendance data)

use crate::{
    error::{AppError, AppResult},
    models::{DayAttendance, DayWindow, EventConfig, SaveEventConfig},
    repository::Repository,
};

use super::windows::{empty_records, generate_windows};

#[derive(Clone)]
pub struct EventSettingsService {
    repository: Repository,
}

impl EventSettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get the published configuration
    pub async fn get(&self) -> AppResult<EventConfig> {
        self.repository
            .read_config()
            .await?
            .ok_or_else(|| AppError::NotFound("No event configured".to_string()))
    }

    /// Validate a configuration and publish it together with one empty
    /// attendance record per day. Nothing is written when validation fails,
    /// and a failed publish leaves the previous event untouched.
    pub async fn save(&self, data: &SaveEventConfig) -> AppResult<(EventConfig, Vec<DayWindow>)> {
        let config = EventConfig::parse(data)?;
        let windows = generate_windows(&config)?;

        self.repository.publish(&config, &empty_records(&windows)).await?;

        tracing::info!(
            event = %config.event_name,
            days = windows.len(),
            max_attendees = config.max_attendees,
            "Event configured"
        );
        Ok((config, windows))
    }

    /// Clear the configuration; attendance records are kept
    pub async fn reset(&self) -> AppResult<()> {
        self.repository.clear_config().await?;
        tracing::info!("Event configuration reset");
        Ok(())
    }

    /// Admission windows of the published configuration
    pub async fn windows(&self) -> AppResult<Vec<DayWindow>> {
        generate_windows(&self.get().await?)
    }

    /// All attendance records in day order
    pub async fn attendance(&self) -> AppResult<Vec<DayAttendance>> {
        Ok(self
            .repository
            .read_all()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|(day, record)| DayAttendance { day, record })
            .collect())
    }

    /// Delete all attendance records; the configuration is kept
    pub async fn clear_attendance(&self) -> AppResult<()> {
        self.repository.delete_all().await?;
        tracing::warn!("All attendance records deleted");
        Ok(())
    }
}
