//! Event configuration endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{DayWindow, EventConfig, SaveEventConfig},
};

use super::Organizer;

/// Saved configuration with its generated day windows
#[derive(Serialize, ToSchema)]
pub struct SaveEventResponse {
    pub event: EventConfig,
    pub windows: Vec<DayWindow>,
}

/// Get the current event configuration
#[utoipa::path(
    get,
    path = "/event",
    tag = "event",
    responses(
        (status = 200, description = "Event configuration", body = EventConfig),
        (status = 404, description = "No event configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_event(State(state): State<crate::AppState>) -> AppResult<Json<EventConfig>> {
    let config = state.services.event_settings.get().await?;
    Ok(Json(config))
}

/// Publish the event configuration and initialize attendance records
#[utoipa::path(
    put,
    path = "/event",
    tag = "event",
    security(("bearer_auth" = [])),
    request_body = SaveEventConfig,
    responses(
        (status = 200, description = "Event configured", body = SaveEventResponse),
        (status = 400, description = "Invalid configuration", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_event(
    State(state): State<crate::AppState>,
    Organizer(claims): Organizer,
    Json(data): Json<SaveEventConfig>,
) -> AppResult<Json<SaveEventResponse>> {
    tracing::info!(organizer = %claims.sub, "Saving event configuration");
    let (event, windows) = state.services.event_settings.save(&data).await?;
    Ok(Json(SaveEventResponse { event, windows }))
}

/// Reset the event configuration
#[utoipa::path(
    delete,
    path = "/event",
    tag = "event",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Event configuration reset")
    )
)]
pub async fn reset_event(
    State(state): State<crate::AppState>,
    Organizer(_claims): Organizer,
) -> AppResult<StatusCode> {
    state.services.event_settings.reset().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admission windows of the current event
#[utoipa::path(
    get,
    path = "/event/windows",
    tag = "event",
    responses(
        (status = 200, description = "Day windows in order", body = Vec<DayWindow>),
        (status = 404, description = "No event configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_windows(State(state): State<crate::AppState>) -> AppResult<Json<Vec<DayWindow>>> {
    let windows = state.services.event_settings.windows().await?;
    Ok(Json(windows))
}
