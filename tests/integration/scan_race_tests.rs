//! Concurrent scans against one shared store

use std::sync::{atomic::Ordering, Arc};

use passgate_server::models::DecisionOutcome;

use crate::common::{services_over, InstrumentedStore};

#[tokio::test]
async fn test_last_seat_goes_to_exactly_one_pass() {
    // Both scans read the empty day before either one writes
    let store = Arc::new(InstrumentedStore::with_read_barrier(2));
    let services = services_over(store.clone(), 1, 5).await;

    let (a, b) = tokio::join!(
        services.checkin.decide("ONGC1"),
        services.checkin.decide("ONGC2"),
    );

    let mut outcomes = vec![a.outcome, b.outcome];
    outcomes.sort_by_key(|o| o.granted());
    assert_eq!(
        outcomes,
        vec![DecisionOutcome::CapacityReached, DecisionOutcome::Admitted]
    );
    assert!(store.rejected_updates.load(Ordering::SeqCst) >= 1);

    let attendance = services.event_settings.attendance().await.unwrap();
    assert_eq!(attendance[0].record.count, 1);
    assert_eq!(attendance[0].record.entries.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scans_never_exceed_capacity() {
    let store = Arc::new(InstrumentedStore::with_read_barrier(12));
    let services = services_over(store.clone(), 3, 5).await;

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let services = services.clone();
            tokio::spawn(async move { services.checkin.decide(&format!("ONGC{}", i)).await })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        let report = handle.await.unwrap();
        match report.outcome {
            DecisionOutcome::Admitted => admitted += 1,
            DecisionOutcome::CapacityReached => {}
            other => panic!("unexpected outcome {:?}", other),
        }
    }
    assert_eq!(admitted, 3);
    // Everyone decided on the same empty record, so all but one write lost
    assert!(store.rejected_updates.load(Ordering::SeqCst) >= 11);

    let attendance = services.event_settings.attendance().await.unwrap();
    assert_eq!(attendance[0].record.count, 3);
    assert_eq!(attendance[0].record.entries.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_admissions_are_not_lost() {
    let store = Arc::new(InstrumentedStore::with_read_barrier(20));
    let services = services_over(store.clone(), 100, 50).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let services = services.clone();
            tokio::spawn(async move { services.checkin.decide(&format!("ONGC{}", i)).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().outcome, DecisionOutcome::Admitted);
    }

    let attendance = services.event_settings.attendance().await.unwrap();
    let record = &attendance[0].record;
    assert_eq!(record.count, 20);
    assert_eq!(record.entries.len(), 20);
    for i in 0..20 {
        assert!(record.contains_pass(&format!("ONGC{}", i)));
    }
}
