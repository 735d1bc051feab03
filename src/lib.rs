//! Passgate Event Check-in Server
//!
//! Admits attendees of a multi-day event by scanning their passes. Each scan
//! is checked against the configured daily admission windows, the per-day
//! capacity and the pass's earlier entries, and the outcome is recorded in a
//! shared attendance store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
