//! Status and statistics queries.

use crate::responses::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use courier_core::CourierError;
use courier_queue::{JobId, JobRecord, QueueStats};
use serde::Serialize;

/// Status query response.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    /// Snapshot of the record.
    pub job: JobRecord,
}

/// Creates the jobs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/job/:id", get(get_job))
        .route("/api/queue-stats", get(queue_stats))
}

/// Returns the current record snapshot, or 404 once the record has been
/// reclaimed or never existed (indistinguishable by design).
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = state
        .engine
        .get_job(&JobId::from(id.clone()))
        .ok_or_else(|| CourierError::not_found("Job", id))?;

    Ok(Json(JobResponse { job }))
}

/// Returns point-in-time counts over the live job table.
pub async fn queue_stats(State(state): State<AppState>) -> Json<QueueStats> {
    Json(state.engine.stats())
}
