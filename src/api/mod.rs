//! API handlers for Passgate REST endpoints

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod event;
pub mod health;
pub mod openapi;
pub mod scan;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::OrganizerClaims, AppState};

/// Extractor for the authenticated organizer from the JWT token
pub struct Organizer(pub OrganizerClaims);

#[async_trait]
impl FromRequestParts<AppState> for Organizer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = state.services.auth.verify(token)?;
        Ok(Organizer(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        // Event configuration
        .route(
            "/event",
            get(event::get_event).put(event::save_event).delete(event::reset_event),
        )
        .route("/event/windows", get(event::get_windows))
        // Attendance
        .route(
            "/attendance",
            get(attendance::list_attendance).delete(attendance::clear_attendance),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        // Scanning
        .route("/scan", post(scan::scan))
        .route("/scanner", get(scan::scanner_state))
        .route("/scanner/resume", post(scan::resume_scanner))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
