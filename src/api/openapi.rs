//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendance, auth, dashboard, event, health, scan};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Passgate API",
        version = "1.0.0",
        description = "Multi-day event check-in REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        // Event
        event::get_event,
        event::save_event,
        event::reset_event,
        event::get_windows,
        // Attendance
        attendance::list_attendance,
        attendance::clear_attendance,
        dashboard::get_dashboard,
        // Scan
        scan::scan,
        scan::scanner_state,
        scan::resume_scanner,
    ),
    components(
        schemas(
            // Auth
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            // Event
            crate::models::EventConfig,
            crate::models::SaveEventConfig,
            crate::models::DayWindow,
            event::SaveEventResponse,
            // Attendance
            crate::models::AttendanceRecord,
            crate::models::DayAttendance,
            crate::models::Entry,
            crate::models::DashboardSummary,
            crate::models::DayCount,
            crate::models::ArrivalBucket,
            // Scan
            crate::models::ScanRequest,
            crate::models::ScanResponse,
            crate::models::DecisionReport,
            crate::models::DecisionOutcome,
            crate::services::scanner::ScanState,
            scan::ScannerStateResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Organizer authentication"),
        (name = "event", description = "Event configuration"),
        (name = "attendance", description = "Attendance records"),
        (name = "dashboard", description = "Event overview"),
        (name = "scan", description = "Pass scanning")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the organizer bearer token scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
