//! Attendance endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{error::AppResult, models::DayAttendance};

use super::Organizer;

/// List attendance records by day
#[utoipa::path(
    get,
    path = "/attendance",
    tag = "attendance",
    responses(
        (status = 200, description = "Attendance records", body = Vec<DayAttendance>)
    )
)]
pub async fn list_attendance(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<DayAttendance>>> {
    let days = state.services.event_settings.attendance().await?;
    Ok(Json(days))
}

/// Delete all attendance records
#[utoipa::path(
    delete,
    path = "/attendance",
    tag = "attendance",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Attendance records deleted")
    )
)]
pub async fn clear_attendance(
    State(state): State<crate::AppState>,
    Organizer(claims): Organizer,
) -> AppResult<StatusCode> {
    tracing::info!(organizer = %claims.sub, "Clearing attendance data");
    state.services.event_settings.clear_attendance().await?;
    Ok(StatusCode::NO_CONTENT)
}
