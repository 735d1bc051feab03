//! In-process attendance store, for development and tests

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{AttendanceBook, AttendanceRecord, EventConfig, RecordVersion},
};

use super::AttendanceStore;

#[derive(Default)]
struct MemoryState {
    config: Option<EventConfig>,
    records: AttendanceBook,
    generation: u64,
}

impl MemoryState {
    fn replace_records(&mut self, records: &AttendanceBook) {
        self.generation += 1;
        let generation = self.generation;
        self.records = records
            .iter()
            .map(|(day, record)| {
                (
                    *day,
                    AttendanceRecord {
                        generation,
                        ..record.clone()
                    },
                )
            })
            .collect();
    }
}

#[derive(Default)]
pub struct MemoryAttendanceStore {
    state: RwLock<MemoryState>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn read_config(&self) -> AppResult<Option<EventConfig>> {
        Ok(self.state.read().await.config.clone())
    }

    async fn write_config(&self, config: &EventConfig) -> AppResult<()> {
        self.state.write().await.config = Some(config.clone());
        Ok(())
    }

    async fn clear_config(&self) -> AppResult<()> {
        self.state.write().await.config = None;
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Option<AttendanceBook>> {
        let state = self.state.read().await;
        if state.records.is_empty() {
            return Ok(None);
        }
        Ok(Some(state.records.clone()))
    }

    async fn write_all_records(&self, records: &AttendanceBook) -> AppResult<()> {
        self.state.write().await.replace_records(records);
        Ok(())
    }

    async fn publish(&self, config: &EventConfig, records: &AttendanceBook) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.config = Some(config.clone());
        state.replace_records(records);
        Ok(())
    }

    async fn conditional_update(
        &self,
        day: u32,
        expected: RecordVersion,
        record: &AttendanceRecord,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&day) {
            Some(current) if current.version() == expected => {
                current.count = record.count;
                current.entries = record.entries.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_all(&self) -> AppResult<()> {
        self.state.write().await.records.clear();
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
