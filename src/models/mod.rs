//! Data models for Passgate

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod day_window;
pub mod event;
pub mod scan;

// Re-export commonly used types
pub use attendance::{AttendanceBook, AttendanceRecord, DayAttendance, Entry, RecordVersion};
pub use auth::{LoginRequest, LoginResponse, OrganizerClaims};
pub use dashboard::{ArrivalBucket, DashboardSummary, DayCount};
pub use day_window::DayWindow;
pub use event::{EventConfig, SaveEventConfig};
pub use scan::{DecisionOutcome, DecisionReport, ScanRequest, ScanResponse};
