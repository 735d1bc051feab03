//! Redis attendance store
//!
//! The configuration lives as a JSON string at `{namespace}:details`; the
//! attendance records live in the hash `{namespace}:attendees`, one field
//! per day index holding the JSON record. `{namespace}:generation` counts
//! bulk initializations.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, Script};

use crate::{
    error::{AppError, AppResult},
    models::{AttendanceBook, AttendanceRecord, EventConfig, RecordVersion},
};

use super::AttendanceStore;

/// KEYS[1] = attendees hash, ARGV = day, expected generation, expected
/// count, new record JSON. Returns 1 when written, 0 on a version mismatch,
/// -1 when the day is missing.
const CONDITIONAL_UPDATE_SCRIPT: &str = r#"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if not current then
    return -1
end
local record = cjson.decode(current)
if tonumber(record['generation'] or 0) ~= tonumber(ARGV[2]) then
    return 0
end
if tonumber(record['count'] or 0) ~= tonumber(ARGV[3]) then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[4])
return 1
"#;

#[derive(Clone)]
pub struct RedisAttendanceStore {
    client: Client,
    details_key: String,
    attendees_key: String,
    generation_key: String,
    update_script: Script,
}

impl RedisAttendanceStore {
    /// Open the client and check the connection
    pub async fn connect(url: &str, namespace: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let store = Self {
            client,
            details_key: format!("{}:details", namespace),
            attendees_key: format!("{}:attendees", namespace),
            generation_key: format!("{}:generation", namespace),
            update_script: Script::new(CONDITIONAL_UPDATE_SCRIPT),
        };
        store.ping().await?;

        tracing::info!("Connected to Redis");
        Ok(store)
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Queue the replacement of the attendees hash with `records` stamped
    /// with a new generation
    async fn queue_replace_records(
        &self,
        conn: &mut MultiplexedConnection,
        pipe: &mut redis::Pipeline,
        records: &AttendanceBook,
    ) -> AppResult<()> {
        let generation: u64 = conn.incr(&self.generation_key, 1).await?;
        let fields = stamped_fields(records, generation)?;

        pipe.del(&self.attendees_key).ignore();
        if !fields.is_empty() {
            pipe.hset_multiple(&self.attendees_key, &fields).ignore();
        }
        Ok(())
    }
}

/// Hash fields for `records`, each serialized with `generation`
fn stamped_fields(records: &AttendanceBook, generation: u64) -> AppResult<Vec<(u32, String)>> {
    records
        .iter()
        .map(|(day, record)| {
            let stamped = AttendanceRecord {
                generation,
                ..record.clone()
            };
            Ok((*day, serde_json::to_string(&stamped)?))
        })
        .collect()
}

#[async_trait]
impl AttendanceStore for RedisAttendanceStore {
    async fn read_config(&self) -> AppResult<Option<EventConfig>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(&self.details_key).await?;
        raw.map(|json| serde_json::from_str(&json).map_err(AppError::from))
            .transpose()
    }

    async fn write_config(&self, config: &EventConfig) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let json = serde_json::to_string(config)?;
        conn.set::<_, _, ()>(&self.details_key, json).await?;
        Ok(())
    }

    async fn clear_config(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(&self.details_key).await?;
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Option<AttendanceBook>> {
        let mut conn = self.connection().await?;
        let fields: HashMap<String, String> = conn.hgetall(&self.attendees_key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        let mut book = AttendanceBook::new();
        for (field, json) in fields {
            let day: u32 = field
                .parse()
                .map_err(|_| AppError::Internal(format!("Invalid day field '{}' in attendees", field)))?;
            book.insert(day, serde_json::from_str(&json)?);
        }
        Ok(Some(book))
    }

    async fn write_all_records(&self, records: &AttendanceBook) -> AppResult<()> {
        let mut conn = self.connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        self.queue_replace_records(&mut conn, &mut pipe, records).await?;
        pipe.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }

    async fn publish(&self, config: &EventConfig, records: &AttendanceBook) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let json = serde_json::to_string(config)?;

        let mut pipe = redis::pipe();
        pipe.atomic().set(&self.details_key, json).ignore();
        self.queue_replace_records(&mut conn, &mut pipe, records).await?;
        pipe.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }

    async fn conditional_update(
        &self,
        day: u32,
        expected: RecordVersion,
        record: &AttendanceRecord,
    ) -> AppResult<bool> {
        let mut conn = self.connection().await?;
        let json = serde_json::to_string(record)?;

        let written: i64 = self
            .update_script
            .key(&self.attendees_key)
            .arg(day)
            .arg(expected.generation)
            .arg(expected.count)
            .arg(json)
            .invoke_async(&mut conn)
            .await?;

        if written < 0 {
            tracing::warn!(day, "Conditional update on a missing attendance record");
        }
        Ok(written == 1)
    }

    async fn delete_all(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(&self.attendees_key).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;
        Ok(())
    }
}
