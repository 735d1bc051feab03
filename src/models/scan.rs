//! Scan requests and admission decisions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of one admission decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// First scan of the pass: entry logged and counted
    Admitted,
    /// Pass already admitted today: let in, not counted again
    ReentryAllowed,
    /// Pass was bound to another day of the event
    AlreadyUsedOnOtherDay,
    /// Today's capacity is exhausted
    CapacityReached,
    /// No day window contains the scan instant
    OutsideEventHours,
    /// Scanned string is not a pass of this event
    MalformedPass,
    /// Active day has no attendance record
    UnknownDay,
    /// Event configuration or attendance records are absent
    ConfigMissing,
    /// Store failure or timeout; retrying the scan is safe
    StoreUnavailable,
}

impl DecisionOutcome {
    /// Human-readable message shown to the scan operator
    pub fn message(&self) -> &'static str {
        match self {
            DecisionOutcome::Admitted => "Pass Valid: Entry logged.",
            DecisionOutcome::ReentryAllowed => "Pass Valid: Re-entry allowed.",
            DecisionOutcome::AlreadyUsedOnOtherDay => "Pass Invalid: This pass is already used.",
            DecisionOutcome::CapacityReached => "Event capacity reached. Entry not allowed.",
            DecisionOutcome::OutsideEventHours => "Event not active during this time.",
            DecisionOutcome::MalformedPass => "Invalid Pass: Pass is not for this Event.",
            DecisionOutcome::UnknownDay => "Error: Invalid event day.",
            DecisionOutcome::ConfigMissing => "Error: Event data missing.",
            DecisionOutcome::StoreUnavailable => "Error validating pass.",
        }
    }

    /// Whether the attendee may walk in
    pub fn granted(&self) -> bool {
        matches!(self, DecisionOutcome::Admitted | DecisionOutcome::ReentryAllowed)
    }
}

impl std::fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Renderable result of a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DecisionReport {
    pub outcome: DecisionOutcome,
    /// Active event day, when one was determined
    pub day: Option<u32>,
    pub granted: bool,
    pub message: String,
}

impl DecisionReport {
    pub fn new(outcome: DecisionOutcome, day: Option<u32>) -> Self {
        Self {
            outcome,
            day,
            granted: outcome.granted(),
            message: outcome.message().to_string(),
        }
    }
}

/// Scan request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Raw string read from the QR code
    pub data: String,
}

/// Scan response: either a decision or a notice that the scan was ignored
/// because another one is still in flight or cooling down
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanResponse {
    pub accepted: bool,
    pub decision: Option<DecisionReport>,
}
