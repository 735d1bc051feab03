//! Publishing an event over a store that already holds one

use std::sync::Arc;

use passgate_server::{error::AppError, models::DecisionOutcome};

use crate::common::{save_request, services_over, InstrumentedStore};

#[tokio::test]
async fn test_failed_resave_keeps_previous_event() {
    let store = Arc::new(InstrumentedStore::new());
    let services = services_over(store.clone(), 10, 5).await;
    assert_eq!(services.checkin.decide("ONGC1").await.outcome, DecisionOutcome::Admitted);

    store.fail_publishes();
    let err = services
        .event_settings
        .save(&save_request("2025-06-01", "2025-06-01", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));

    let config = services.event_settings.get().await.unwrap();
    assert_eq!(config.start_date.to_string(), "2025-03-01");

    let attendance = services.event_settings.attendance().await.unwrap();
    assert_eq!(attendance.len(), 3);
    assert_eq!(attendance[0].record.date.map(|d| d.to_string()).as_deref(), Some("2025-03-01"));
    assert!(attendance[0].record.contains_pass("ONGC1"));

    // Scans keep deciding against the untouched event
    assert_eq!(
        services.checkin.decide("ONGC1").await.outcome,
        DecisionOutcome::ReentryAllowed
    );
}

#[tokio::test]
async fn test_resave_starts_from_empty_records() {
    let store = Arc::new(InstrumentedStore::new());
    let services = services_over(store, 10, 5).await;
    assert_eq!(services.checkin.decide("ONGC1").await.outcome, DecisionOutcome::Admitted);

    services
        .event_settings
        .save(&save_request("2025-03-01", "2025-03-03", 10))
        .await
        .unwrap();

    let attendance = services.event_settings.attendance().await.unwrap();
    assert!(attendance.iter().all(|day| day.record.count == 0));
    assert_eq!(services.checkin.decide("ONGC1").await.outcome, DecisionOutcome::Admitted);
}
