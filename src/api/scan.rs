//! Scan endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{ScanRequest, ScanResponse},
    services::scanner::ScanState,
};

#[derive(Serialize, ToSchema)]
pub struct ScannerStateResponse {
    pub state: ScanState,
}

/// Submit a scanned pass. Ignored (`accepted: false`) while a previous scan
/// is in flight or cooling down.
#[utoipa::path(
    post,
    path = "/scan",
    tag = "scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Decision, or notice that the scan was ignored", body = ScanResponse)
    )
)]
pub async fn scan(
    State(state): State<crate::AppState>,
    Json(request): Json<ScanRequest>,
) -> Json<ScanResponse> {
    let Some(_ticket) = state.services.scanner.try_begin() else {
        tracing::debug!("Scan ignored, previous scan still pending");
        return Json(ScanResponse {
            accepted: false,
            decision: None,
        });
    };

    let report = state.services.checkin.decide(&request.data).await;
    Json(ScanResponse {
        accepted: true,
        decision: Some(report),
    })
}

/// Current scan lock state
#[utoipa::path(
    get,
    path = "/scanner",
    tag = "scan",
    responses(
        (status = 200, description = "Scan lock state", body = ScannerStateResponse)
    )
)]
pub async fn scanner_state(State(state): State<crate::AppState>) -> Json<ScannerStateResponse> {
    Json(ScannerStateResponse {
        state: state.services.scanner.state(),
    })
}

/// Force-release the scan lock
#[utoipa::path(
    post,
    path = "/scanner/resume",
    tag = "scan",
    responses(
        (status = 204, description = "Scan lock released")
    )
)]
pub async fn resume_scanner(State(state): State<crate::AppState>) -> StatusCode {
    state.services.scanner.resume();
    StatusCode::NO_CONTENT
}
