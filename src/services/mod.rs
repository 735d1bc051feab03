//! Business logic services

pub mod admission;
pub mod auth;
pub mod clock;
pub mod dashboard;
pub mod event_settings;
pub mod pass;
pub mod scanner;
pub mod windows;

use std::{sync::Arc, time::Duration};

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub checkin: admission::CheckinService,
    pub dashboard: dashboard::DashboardService,
    pub event_settings: event_settings::EventSettingsService,
    pub scanner: scanner::ScanGate,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        clock: Arc<dyn clock::Clock>,
    ) -> AppResult<Self> {
        let format = pass::PassFormat::new(&config.pass.prefix)?;

        Ok(Self {
            auth: auth::AuthService::new(config.auth.clone()),
            checkin: admission::CheckinService::new(
                repository.clone(),
                format,
                clock.clone(),
                config.store.max_retries,
            ),
            dashboard: dashboard::DashboardService::new(repository.clone(), clock),
            event_settings: event_settings::EventSettingsService::new(repository.clone()),
            scanner: scanner::ScanGate::new(Duration::from_millis(config.scanner.cooldown_ms)),
            repository,
        })
    }
}
