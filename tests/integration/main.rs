mod api_tests;
mod common;
mod event_lifecycle_tests;
mod scan_race_tests;
