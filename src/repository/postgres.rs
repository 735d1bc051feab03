//! PostgreSQL attendance store

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgConnection, Pool, Postgres};

use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
    models::{AttendanceBook, AttendanceRecord, Entry, EventConfig, RecordVersion},
};

use super::AttendanceStore;

#[derive(Debug, FromRow)]
struct EventConfigRow {
    event_name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    daily_start_time: NaiveTime,
    daily_end_time: NaiveTime,
    max_attendees: i32,
}

impl TryFrom<EventConfigRow> for EventConfig {
    type Error = AppError;

    fn try_from(row: EventConfigRow) -> AppResult<Self> {
        Ok(Self {
            event_name: row.event_name,
            start_date: row.start_date,
            end_date: row.end_date,
            daily_start_time: row.daily_start_time,
            daily_end_time: row.daily_end_time,
            max_attendees: u32::try_from(row.max_attendees)
                .map_err(|_| AppError::Internal("Negative max_attendees in event_configs".to_string()))?,
        })
    }
}

#[derive(Debug, FromRow)]
struct AttendanceDayRow {
    day_index: i32,
    generation: i64,
    day_date: Option<NaiveDate>,
    window_start: Option<NaiveDateTime>,
    window_end: Option<NaiveDateTime>,
    count: i32,
    entries: Json<Vec<Entry>>,
}

impl AttendanceDayRow {
    /// Day index and record, rejecting values a valid row never holds
    fn into_entry(self) -> AppResult<(u32, AttendanceRecord)> {
        let day = u32::try_from(self.day_index)
            .map_err(|_| AppError::Internal(format!("Invalid day_index {}", self.day_index)))?;
        let generation = u64::try_from(self.generation).map_err(|_| {
            AppError::Internal(format!("Invalid generation {} for day {}", self.generation, day))
        })?;
        let count = u32::try_from(self.count)
            .map_err(|_| AppError::Internal(format!("Invalid count {} for day {}", self.count, day)))?;

        Ok((
            day,
            AttendanceRecord {
                generation,
                date: self.day_date,
                start: self.window_start,
                end: self.window_end,
                count,
                entries: self.entries.0,
            },
        ))
    }
}

#[derive(Clone)]
pub struct PgAttendanceStore {
    pool: Pool<Postgres>,
    namespace: String,
}

impl PgAttendanceStore {
    pub fn new(pool: Pool<Postgres>, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }

    /// Create the connection pool and run migrations
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.timeout_ms))
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool, config.namespace.clone()))
    }

    async fn upsert_config(&self, conn: &mut PgConnection, config: &EventConfig) -> AppResult<()> {
        let max_attendees = i32::try_from(config.max_attendees)
            .map_err(|_| AppError::InvalidConfig("max_attendees too large".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO event_configs (
                namespace, event_name, start_date, end_date,
                daily_start_time, daily_end_time, max_attendees
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (namespace) DO UPDATE SET
                event_name = EXCLUDED.event_name,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                daily_start_time = EXCLUDED.daily_start_time,
                daily_end_time = EXCLUDED.daily_end_time,
                max_attendees = EXCLUDED.max_attendees,
                modif_date = NOW()
            "#,
        )
        .bind(&self.namespace)
        .bind(&config.event_name)
        .bind(config.start_date)
        .bind(config.end_date)
        .bind(config.daily_start_time)
        .bind(config.daily_end_time)
        .bind(max_attendees)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete the namespace's records and insert `records` under a new
    /// generation
    async fn replace_records(&self, conn: &mut PgConnection, records: &AttendanceBook) -> AppResult<()> {
        let generation: i64 = sqlx::query_scalar("SELECT nextval('attendance_generation')")
            .fetch_one(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM attendance_days WHERE namespace = $1")
            .bind(&self.namespace)
            .execute(&mut *conn)
            .await?;

        for (day, record) in records {
            sqlx::query(
                r#"
                INSERT INTO attendance_days (
                    namespace, day_index, generation, day_date, window_start, window_end, count, entries
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&self.namespace)
            .bind(to_i32(*day, "day index")?)
            .bind(generation)
            .bind(record.date)
            .bind(record.start)
            .bind(record.end)
            .bind(to_i32(record.count, "count")?)
            .bind(Json(&record.entries))
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}

fn to_i32(value: u32, what: &str) -> AppResult<i32> {
    i32::try_from(value).map_err(|_| AppError::Internal(format!("{} {} out of range", what, value)))
}

fn to_i64(value: u64, what: &str) -> AppResult<i64> {
    i64::try_from(value).map_err(|_| AppError::Internal(format!("{} {} out of range", what, value)))
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn read_config(&self) -> AppResult<Option<EventConfig>> {
        let row = sqlx::query_as::<_, EventConfigRow>(
            r#"
            SELECT event_name, start_date, end_date, daily_start_time, daily_end_time, max_attendees
            FROM event_configs
            WHERE namespace = $1
            "#,
        )
        .bind(&self.namespace)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EventConfig::try_from).transpose()
    }

    async fn write_config(&self, config: &EventConfig) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;
        self.upsert_config(&mut conn, config).await
    }

    async fn clear_config(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM event_configs WHERE namespace = $1")
            .bind(&self.namespace)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Option<AttendanceBook>> {
        let rows = sqlx::query_as::<_, AttendanceDayRow>(
            r#"
            SELECT day_index, generation, day_date, window_start, window_end, count, entries
            FROM attendance_days
            WHERE namespace = $1
            ORDER BY day_index
            "#,
        )
        .bind(&self.namespace)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let book = rows
            .into_iter()
            .map(AttendanceDayRow::into_entry)
            .collect::<AppResult<AttendanceBook>>()?;
        Ok(Some(book))
    }

    async fn write_all_records(&self, records: &AttendanceBook) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        self.replace_records(&mut tx, records).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn publish(&self, config: &EventConfig, records: &AttendanceBook) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        self.upsert_config(&mut tx, config).await?;
        self.replace_records(&mut tx, records).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn conditional_update(
        &self,
        day: u32,
        expected: RecordVersion,
        record: &AttendanceRecord,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_days
            SET count = $3, entries = $4
            WHERE namespace = $1 AND day_index = $2 AND generation = $5 AND count = $6
            "#,
        )
        .bind(&self.namespace)
        .bind(to_i32(day, "day index")?)
        .bind(to_i32(record.count, "count")?)
        .bind(Json(&record.entries))
        .bind(to_i64(expected.generation, "generation")?)
        .bind(to_i32(expected.count, "count")?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_all(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM attendance_days WHERE namespace = $1")
            .bind(&self.namespace)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
