//! Repository layer: attendance store backends behind a common trait

pub mod memory;
pub mod postgres;
pub mod redis;

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    config::{StoreBackend, StoreConfig},
    error::{AppError, AppResult},
    models::{AttendanceBook, AttendanceRecord, EventConfig, RecordVersion},
};

/// Keyed-document store holding the event configuration and the per-day
/// attendance records of one namespace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Read the published event configuration
    async fn read_config(&self) -> AppResult<Option<EventConfig>>;

    /// Replace the event configuration
    async fn write_config(&self, config: &EventConfig) -> AppResult<()>;

    /// Remove the event configuration
    async fn clear_config(&self) -> AppResult<()>;

    /// Read every attendance record; `None` when there are none
    async fn read_all(&self) -> AppResult<Option<AttendanceBook>>;

    /// Replace all attendance records at once, stamping them with a fresh
    /// generation
    async fn write_all_records(&self, records: &AttendanceBook) -> AppResult<()>;

    /// Replace the configuration and all attendance records in one atomic
    /// step; on failure neither is changed
    async fn publish(&self, config: &EventConfig, records: &AttendanceBook) -> AppResult<()>;

    /// Store `record` for `day` only if the stored record still has the
    /// `expected` generation and count. Returns `false` when the condition
    /// failed or the record no longer exists.
    async fn conditional_update(
        &self,
        day: u32,
        expected: RecordVersion,
        record: &AttendanceRecord,
    ) -> AppResult<bool>;

    /// Delete all attendance records
    async fn delete_all(&self) -> AppResult<()>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository: a store backend with per-operation timeouts
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn AttendanceStore>,
    timeout: Duration,
}

impl Repository {
    pub fn new(store: Arc<dyn AttendanceStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Connect to the configured backend
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let store: Arc<dyn AttendanceStore> = match config.backend {
            StoreBackend::Postgres => {
                Arc::new(postgres::PgAttendanceStore::connect(config).await?)
            }
            StoreBackend::Redis => {
                Arc::new(redis::RedisAttendanceStore::connect(&config.url, &config.namespace).await?)
            }
            StoreBackend::Memory => Arc::new(memory::MemoryAttendanceStore::new()),
        };
        tracing::info!("Attendance store ready ({:?}, namespace {})", config.backend, config.namespace);
        Ok(Self::new(store, timeout))
    }

    /// Run a store operation under the timeout, folding infrastructure
    /// failures into `StoreUnavailable`.
    async fn guarded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_transient() => {
                tracing::warn!(operation, error = %e, "Store operation failed");
                Err(AppError::StoreUnavailable(format!("{} failed: {}", operation, e)))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                tracing::warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Store operation timed out");
                Err(AppError::StoreUnavailable(format!(
                    "{} timed out after {} ms",
                    operation,
                    self.timeout.as_millis()
                )))
            }
        }
    }

    pub async fn read_config(&self) -> AppResult<Option<EventConfig>> {
        self.guarded("read_config", self.store.read_config()).await
    }

    pub async fn clear_config(&self) -> AppResult<()> {
        self.guarded("clear_config", self.store.clear_config()).await
    }

    pub async fn read_all(&self) -> AppResult<Option<AttendanceBook>> {
        self.guarded("read_all", self.store.read_all()).await
    }

    pub async fn publish(&self, config: &EventConfig, records: &AttendanceBook) -> AppResult<()> {
        self.guarded("publish", self.store.publish(config, records)).await
    }

    pub async fn conditional_update(
        &self,
        day: u32,
        expected: RecordVersion,
        record: &AttendanceRecord,
    ) -> AppResult<bool> {
        self.guarded(
            "conditional_update",
            self.store.conditional_update(day, expected, record),
        )
        .await
    }

    pub async fn delete_all(&self) -> AppResult<()> {
        self.guarded("delete_all", self.store.delete_all()).await
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.guarded("ping", self.store.ping()).await
    }
}
