use super::state::AppState;
use crate::app::ControlEvent;
use crate::gesture::GestureSample;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TapRequest {
    /// Event time; stamped on arrival if absent
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MotionRequest {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

async fn dispatch(state: &AppState, event: ControlEvent) -> axum::response::Response {
    debug!("Control event: {:?}", event);

    match state.events.send(event).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(AcceptedResponse {
                status: "accepted".to_string(),
            }),
        )
            .into_response(),
        Err(_) => {
            warn!("Controller is not running, dropping event");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Application is not running".to_string(),
                }),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /input/tap
/// Deliver a pointer press
pub async fn tap(
    State(state): State<AppState>,
    body: Option<Json<TapRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let timestamp_ms = req.timestamp_ms.unwrap_or_else(now_ms);

    dispatch(&state, ControlEvent::PointerDown { timestamp_ms }).await
}

/// POST /input/motion
/// Deliver an accelerometer sample
pub async fn motion(
    State(state): State<AppState>,
    Json(req): Json<MotionRequest>,
) -> impl IntoResponse {
    let sample = GestureSample {
        x: req.x,
        y: req.y,
        z: req.z,
        timestamp_ms: req.timestamp_ms.unwrap_or_else(now_ms),
    };

    dispatch(&state, ControlEvent::Motion(sample)).await
}

/// POST /app/reload
/// Restart the application
pub async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    dispatch(&state, ControlEvent::Reload).await
}

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.status.borrow().clone();
    (StatusCode::OK, Json(snapshot))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
