//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, SessionType, TimerSnapshot};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

type ControlResult = Result<Json<ApiResponse>, (StatusCode, Json<ErrorResponse>)>;

fn respond(action: &str, result: Result<TimerSnapshot, String>, message: String) -> ControlResult {
    match result {
        Ok(timer) => {
            info!("{} endpoint called - {}", action, message);
            Ok(Json(ApiResponse::new(message, timer)))
        }
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e))))
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    let result = state.start();
    let message = match &result {
        Ok(timer) if timer.running => format!("{} running", timer.label),
        Ok(timer) => format!("{} has no time remaining", timer.label),
        Err(_) => String::new(),
    };
    respond("start", result, message)
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    respond("pause", state.pause(), "Timer paused".to_string())
}

/// Handle POST /reset - Rewind the current session
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    respond("reset", state.reset(), "Session reset".to_string())
}

/// Handle POST /skip - Move on to the next session
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    let result = state.skip_session();
    let message = match &result {
        Ok(timer) => format!("Skipped to {}", timer.label),
        Err(_) => String::new(),
    };
    respond("skip", result, message)
}

/// Handle POST /switch/:session - Jump to a specific session type
pub async fn switch_handler(
    State(state): State<Arc<AppState>>,
    Path(session): Path<String>,
) -> ControlResult {
    let target: SessionType = match session.parse() {
        Ok(target) => target,
        Err(e) => {
            warn!("Rejected switch request: {}", e);
            return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))));
        }
    };

    respond(
        "switch",
        state.switch_to_session(target),
        format!("Switched to {}", target.label()),
    )
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        settings: state.settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
