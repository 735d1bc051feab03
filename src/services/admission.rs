//! Admission decisions
//!
//! [`decide`] is a pure function of the event configuration, the attendance
//! records, the scan instant and the scanned string. [`CheckinService`]
//! loads that state from the store, runs the decision and applies the
//! resulting admission with a compare-and-swap on the day's record,
//! re-deciding from fresh state whenever another scanner got there first.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    error::{AppError, AppResult},
    models::{
        AttendanceBook, AttendanceRecord, DecisionOutcome, DecisionReport, Entry, EventConfig,
        RecordVersion,
    },
    repository::Repository,
};

use super::{
    clock::Clock,
    pass::PassFormat,
    windows::{active_window, generate_windows},
};

/// Record update to apply when a pass is admitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub day: u32,
    /// Version the stored record must still have for the update to apply
    pub expected: RecordVersion,
    pub record: AttendanceRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub day: Option<u32>,
    pub admission: Option<Admission>,
}

impl Decision {
    fn rejected(outcome: DecisionOutcome, day: Option<u32>) -> Self {
        Self {
            outcome,
            day,
            admission: None,
        }
    }

    pub fn report(&self) -> DecisionReport {
        DecisionReport::new(self.outcome, self.day)
    }
}

/// Decide whether `raw` is admitted at `now`. Checks run in a fixed order
/// and the first failing one determines the outcome.
pub fn decide(
    config: Option<&EventConfig>,
    records: Option<&AttendanceBook>,
    now: NaiveDateTime,
    raw: &str,
    format: &PassFormat,
) -> Decision {
    let (Some(config), Some(records)) = (config, records) else {
        return Decision::rejected(DecisionOutcome::ConfigMissing, None);
    };

    let windows = generate_windows(config).unwrap_or_else(|e| {
        tracing::warn!("Stored event configuration yields no windows: {}", e);
        Vec::new()
    });
    let Some(active) = active_window(&windows, now) else {
        return Decision::rejected(DecisionOutcome::OutsideEventHours, None);
    };
    let day = active.index;

    let Some(record) = records.get(&day) else {
        return Decision::rejected(DecisionOutcome::UnknownDay, Some(day));
    };

    let pass_id = match format.validate(raw) {
        Ok(pass_id) => pass_id,
        Err(_) => return Decision::rejected(DecisionOutcome::MalformedPass, Some(day)),
    };

    if record.contains_pass(pass_id) {
        return Decision::rejected(DecisionOutcome::ReentryAllowed, Some(day));
    }

    if let Some((used_on, _)) = records
        .iter()
        .find(|(other, r)| **other != day && r.contains_pass(pass_id))
    {
        tracing::debug!(pass_id, day, used_on, "Pass bound to another day");
        return Decision::rejected(DecisionOutcome::AlreadyUsedOnOtherDay, Some(day));
    }

    if record.count >= config.max_attendees {
        return Decision::rejected(DecisionOutcome::CapacityReached, Some(day));
    }

    Decision {
        outcome: DecisionOutcome::Admitted,
        day: Some(day),
        admission: Some(Admission {
            day,
            expected: record.version(),
            record: record.with_entry(Entry::new(pass_id, now)),
        }),
    }
}

/// Scan-facing decision service
#[derive(Clone)]
pub struct CheckinService {
    repository: Repository,
    format: PassFormat,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl CheckinService {
    pub fn new(
        repository: Repository,
        format: PassFormat,
        clock: Arc<dyn Clock>,
        max_attempts: u32,
    ) -> Self {
        Self {
            repository,
            format,
            clock,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Decide on a scanned string. Always returns a renderable result; store
    /// failures surface as `StoreUnavailable` and leave no partial update.
    pub async fn decide(&self, raw: &str) -> DecisionReport {
        let now = self.clock.now();
        match self.decide_at(raw, now).await {
            Ok(decision) => {
                tracing::info!(
                    outcome = %decision.outcome,
                    day = decision.day,
                    "Scan decided"
                );
                decision.report()
            }
            Err(e) => {
                tracing::error!("Scan could not be decided: {}", e);
                DecisionReport::new(DecisionOutcome::StoreUnavailable, None)
            }
        }
    }

    /// Decide and apply at a given instant
    pub async fn decide_at(&self, raw: &str, now: NaiveDateTime) -> AppResult<Decision> {
        for attempt in 1..=self.max_attempts {
            let config = self.repository.read_config().await?;
            let records = self.repository.read_all().await?;

            let decision = decide(config.as_ref(), records.as_ref(), now, raw, &self.format);
            let Some(admission) = &decision.admission else {
                return Ok(decision);
            };

            if self
                .repository
                .conditional_update(admission.day, admission.expected, &admission.record)
                .await?
            {
                tracing::info!(
                    pass_id = raw,
                    day = admission.day,
                    count = admission.record.count,
                    "Entry logged"
                );
                return Ok(decision);
            }

            tracing::warn!(
                day = admission.day,
                attempt,
                "Attendance record changed concurrently, re-deciding"
            );
        }

        Err(AppError::StoreUnavailable(format!(
            "Gave up after {} conflicting updates",
            self.max_attempts
        )))
    }
}
