//! Shared helpers for in-process tests

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Barrier;
use tower::ServiceExt;

use passgate_server::{
    api,
    config::AppConfig,
    error::{AppError, AppResult},
    models::{AttendanceBook, AttendanceRecord, EventConfig, RecordVersion, SaveEventConfig},
    repository::{memory::MemoryAttendanceStore, AttendanceStore, Repository},
    services::{clock::FixedClock, Services},
    AppState,
};

/// Services over `store`, with a three-day 18:00 to 01:00 event published
pub async fn services_over(
    store: Arc<dyn AttendanceStore>,
    max_attendees: i64,
    max_retries: u32,
) -> Arc<Services> {
    let mut config = AppConfig::default();
    config.store.max_retries = max_retries;

    let repository = Repository::new(store, Duration::from_secs(5));
    let clock = Arc::new(FixedClock::new(at(2025, 3, 1, 19, 0)));
    let services = Services::new(repository, &config, clock).unwrap();

    services
        .event_settings
        .save(&save_request("2025-03-01", "2025-03-03", max_attendees))
        .await
        .unwrap();

    Arc::new(services)
}

pub fn save_request(start_date: &str, end_date: &str, max_attendees: i64) -> SaveEventConfig {
    SaveEventConfig {
        event_name: "Spring Fest".to_string(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        start_time: "18:00".to_string(),
        end_time: "01:00".to_string(),
        max_attendees,
    }
}

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<FixedClock>,
    pub services: Arc<Services>,
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// Build the full router over an in-memory store and a settable clock
pub fn test_app(cooldown_ms: u64, now: NaiveDateTime) -> TestApp {
    let mut config = AppConfig::default();
    config.scanner.cooldown_ms = cooldown_ms;

    let repository = Repository::new(
        Arc::new(MemoryAttendanceStore::new()),
        Duration::from_millis(config.store.timeout_ms),
    );
    let clock = Arc::new(FixedClock::new(now));
    let services = Arc::new(
        Services::new(repository, &config, clock.clone()).expect("Failed to build services"),
    );

    let state = AppState {
        config: Arc::new(config),
        services: services.clone(),
    };

    TestApp {
        router: api::create_router(state),
        clock,
        services,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn login(&self) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": "admin", "password": "admin" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Publish a three-day 18:00 to 01:00 event
    pub async fn configure(&self, max_attendees: i64) {
        let token = self.login().await;
        let (status, _) = self
            .request(
                "PUT",
                "/api/v1/event",
                Some(&token),
                Some(json!({
                    "event_name": "Spring Fest",
                    "start_date": "2025-03-01",
                    "end_date": "2025-03-03",
                    "start_time": "18:00",
                    "end_time": "01:00",
                    "max_attendees": max_attendees,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    pub async fn scan(&self, data: &str) -> Value {
        let (status, body) = self
            .request("POST", "/api/v1/scan", None, Some(json!({ "data": data })))
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

/// Memory store wrapper that can fail publishes, hold the first readers of
/// the records at a barrier, and counts rejected conditional updates
pub struct InstrumentedStore {
    inner: MemoryAttendanceStore,
    fail_publish: AtomicBool,
    barrier: Option<Barrier>,
    barrier_readers: usize,
    held_reads: AtomicUsize,
    pub rejected_updates: AtomicUsize,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryAttendanceStore::new(),
            fail_publish: AtomicBool::new(false),
            barrier: None,
            barrier_readers: 0,
            held_reads: AtomicUsize::new(0),
            rejected_updates: AtomicUsize::new(0),
        }
    }

    /// The first `readers` calls to `read_all` wait until all of them have
    /// read, so their decisions are made on the same state
    pub fn with_read_barrier(readers: usize) -> Self {
        Self {
            barrier: Some(Barrier::new(readers)),
            barrier_readers: readers,
            ..Self::new()
        }
    }

    pub fn fail_publishes(&self) {
        self.fail_publish.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AttendanceStore for InstrumentedStore {
    async fn read_config(&self) -> AppResult<Option<EventConfig>> {
        self.inner.read_config().await
    }

    async fn write_config(&self, config: &EventConfig) -> AppResult<()> {
        self.inner.write_config(config).await
    }

    async fn clear_config(&self) -> AppResult<()> {
        self.inner.clear_config().await
    }

    async fn read_all(&self) -> AppResult<Option<AttendanceBook>> {
        let records = self.inner.read_all().await?;
        if let Some(barrier) = &self.barrier {
            if self.held_reads.fetch_add(1, Ordering::SeqCst) < self.barrier_readers {
                barrier.wait().await;
            }
        }
        Ok(records)
    }

    async fn write_all_records(&self, records: &AttendanceBook) -> AppResult<()> {
        self.inner.write_all_records(records).await
    }

    async fn publish(&self, config: &EventConfig, records: &AttendanceBook) -> AppResult<()> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("publish rejected".to_string()));
        }
        self.inner.publish(config, records).await
    }

    async fn conditional_update(
        &self,
        day: u32,
        expected: RecordVersion,
        record: &AttendanceRecord,
    ) -> AppResult<bool> {
        let written = self.inner.conditional_update(day, expected, record).await?;
        if !written {
            self.rejected_updates.fetch_add(1, Ordering::SeqCst);
        }
        Ok(written)
    }

    async fn delete_all(&self) -> AppResult<()> {
        self.inner.delete_all().await
    }

    async fn ping(&self) -> AppResult<()> {
        self.inner.ping().await
    }
}
