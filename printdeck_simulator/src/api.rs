//! Defines the Axum routes of the simulated printer service.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use printdeck_shared::{endpoints, Envelope, ErrorBody, LoadFileRequest, SessionCommandRequest};
use tokio::sync::RwLock;

use crate::printer::{JobTicket, SimConfig, SimError, SimulatedPrinter};

/// Knobs tests use to make the status endpoint misbehave.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub info_delay: Option<Duration>,
    pub fail_info: bool,
    /// Answer list requests with `{}` instead of a payload.
    pub empty_lists: bool,
    /// Raw body sent with `200 OK` in place of the status envelope.
    pub info_body: Option<String>,
}

#[derive(Clone)]
pub struct SimState {
    pub printer: Arc<RwLock<SimulatedPrinter>>,
    pub faults: Arc<RwLock<Faults>>,
}

impl SimState {
    pub fn new(config: SimConfig) -> Self {
        Self {
            printer: Arc::new(RwLock::new(SimulatedPrinter::new(config))),
            faults: Arc::new(RwLock::new(Faults::default())),
        }
    }

    pub async fn journal(&self) -> Vec<(String, String)> {
        self.printer.read().await.journal().to_vec()
    }
}

/// Helper to create a JSON error response with a message and status code
fn json_error(message: &str, status: StatusCode) -> axum::response::Response {
    (status, Json(ErrorBody { error: message.to_string() })).into_response()
}

fn sim_error(err: SimError) -> axum::response::Response {
    let status = match err {
        SimError::UnknownSession(_) | SimError::UnknownFile(_) => StatusCode::NOT_FOUND,
        SimError::Busy | SimError::NothingLoaded => StatusCode::CONFLICT,
    };
    tracing::warn!("Rejecting command: {}", err);
    json_error(&err.to_string(), status)
}

fn ok_message(message: String) -> axum::response::Response {
    (StatusCode::OK, Json(Envelope::new(message))).into_response()
}

/// Creates the Axum router with all the API endpoints.
pub fn create_router(state: SimState) -> Router {
    Router::new()
        .route(endpoints::PRINTER_INFO, get(get_info))
        .route(endpoints::SESSIONS, get(get_sessions))
        .route(endpoints::GCODES, get(get_gcodes))
        .route(endpoints::COMMAND_START, post(start_handler))
        .route(endpoints::COMMAND_PAUSE, post(pause_handler))
        .route(endpoints::COMMAND_CANCEL, post(cancel_handler))
        .route(endpoints::COMMAND_AUTOHOME, post(autohome_handler))
        .route(endpoints::COMMAND_LEVEL_BED_TEST, post(level_bed_test_handler))
        .route(endpoints::COMMAND_UNLOCK, post(unlock_handler))
        .route(endpoints::COMMAND_LOAD, post(load_handler))
        .with_state(state)
}

/// Schedule the end of a job started by a command.
fn spawn_job_timer(state: &SimState, ticket: JobTicket, duration: Duration) {
    let printer = state.printer.clone();
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if printer.write().await.finish(ticket) {
            tracing::info!("Simulated job {} finished", ticket.generation);
        }
    });
}

/// GET /api/printer/info
async fn get_info(State(state): State<SimState>) -> axum::response::Response {
    let faults = state.faults.read().await.clone();
    if let Some(delay) = faults.info_delay {
        tokio::time::sleep(delay).await;
    }
    if faults.fail_info {
        return json_error("printer agent unreachable", StatusCode::BAD_GATEWAY);
    }
    if let Some(body) = faults.info_body {
        return (StatusCode::OK, body).into_response();
    }
    let info = state.printer.read().await.info();
    (StatusCode::OK, Json(Envelope::new(info))).into_response()
}

/// GET /api/printer/sessions
async fn get_sessions(State(state): State<SimState>) -> axum::response::Response {
    if state.faults.read().await.empty_lists {
        return (StatusCode::OK, Json(Envelope::<Vec<String>>::empty())).into_response();
    }
    let sessions = state.printer.read().await.sessions().to_vec();
    (StatusCode::OK, Json(Envelope::new(sessions))).into_response()
}

/// GET /api/gcodes
async fn get_gcodes(State(state): State<SimState>) -> axum::response::Response {
    if state.faults.read().await.empty_lists {
        return (StatusCode::OK, Json(Envelope::<Vec<String>>::empty())).into_response();
    }
    let files = state.printer.read().await.files().to_vec();
    (StatusCode::OK, Json(Envelope::new(files))).into_response()
}

/// POST /api/command/start
async fn start_handler(
    State(state): State<SimState>,
    Json(req): Json<SessionCommandRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_START, &req.session_id);
    let duration = printer.job_duration();
    match printer.start(&req.session_id) {
        Ok((message, ticket)) => {
            spawn_job_timer(&state, ticket, duration);
            ok_message(message)
        }
        Err(e) => sim_error(e),
    }
}

/// POST /api/command/pause
async fn pause_handler(
    State(state): State<SimState>,
    Json(req): Json<SessionCommandRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_PAUSE, &req.session_id);
    printer.pause(&req.session_id).map_or_else(sim_error, ok_message)
}

/// POST /api/command/cancel
async fn cancel_handler(
    State(state): State<SimState>,
    Json(req): Json<SessionCommandRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_CANCEL, &req.session_id);
    printer.cancel(&req.session_id).map_or_else(sim_error, ok_message)
}

/// POST /api/command/autohome
async fn autohome_handler(
    State(state): State<SimState>,
    Json(req): Json<SessionCommandRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_AUTOHOME, &req.session_id);
    let duration = printer.job_duration();
    match printer.auto_home(&req.session_id) {
        Ok((message, ticket)) => {
            spawn_job_timer(&state, ticket, duration);
            ok_message(message)
        }
        Err(e) => sim_error(e),
    }
}

/// POST /api/command/levelbedtest
async fn level_bed_test_handler(
    State(state): State<SimState>,
    Json(req): Json<SessionCommandRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_LEVEL_BED_TEST, &req.session_id);
    let duration = printer.job_duration();
    match printer.level_bed_test(&req.session_id) {
        Ok((message, ticket)) => {
            spawn_job_timer(&state, ticket, duration);
            ok_message(message)
        }
        Err(e) => sim_error(e),
    }
}

/// POST /api/command/unlock
async fn unlock_handler(
    State(state): State<SimState>,
    Json(req): Json<SessionCommandRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_UNLOCK, &req.session_id);
    printer.unlock(&req.session_id).map_or_else(sim_error, ok_message)
}

/// POST /api/command/load
async fn load_handler(
    State(state): State<SimState>,
    Json(req): Json<LoadFileRequest>,
) -> axum::response::Response {
    let mut printer = state.printer.write().await;
    printer.record(endpoints::COMMAND_LOAD, &req.session_id);
    printer.load(&req.session_id, &req.file_id).map_or_else(sim_error, ok_message)
}
