//! Intake endpoint for new submissions.

use crate::responses::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::{routing::post, Json, Router};
use courier_core::CourierError;
use courier_queue::{JobRecord, SubmitOptions};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Intake request body.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Unit-of-work type tag.
    pub kind: String,
    /// Opaque payload, validated per kind.
    pub payload: serde_json::Value,
    /// Optional attempt ceiling override.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

/// Intake response: the created record.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Human-readable acknowledgment.
    pub message: String,
    /// The created record, `waiting` with zero attempts.
    pub job: JobRecord,
}

/// Expected payload for the `form-submission` kind.
#[derive(Debug, Deserialize, Validate)]
pub struct FormSubmission {
    /// Submitter name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    /// Submitter email.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    /// Message body.
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// Creates the submit router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/submit", post(submit))
}

/// Accepts a submission, validates it for its kind, and enqueues it.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    validate_payload(&request.kind, &request.payload)?;

    let job = state.engine.submit(
        &request.kind,
        request.payload,
        SubmitOptions {
            max_attempts: request.max_attempts,
        },
    )?;

    info!(job_id = %job.id, kind = %job.kind, "Submission accepted");

    Ok(Json(SubmitResponse {
        message: "Form submitted successfully".to_string(),
        job,
    }))
}

/// Kind-specific structural validation; unknown kinds only get the engine's
/// structural check.
fn validate_payload(kind: &str, payload: &serde_json::Value) -> Result<(), ApiError> {
    if kind == "form-submission" {
        let form: FormSubmission = serde_json::from_value(payload.clone())
            .map_err(|err| CourierError::validation(format!("invalid form payload: {err}")))?;
        form.validate().map_err(|err| {
            let mut fields: Vec<String> =
                err.field_errors().keys().map(|k| k.to_string()).collect();
            fields.sort();
            CourierError::validation(format!("invalid form fields: {}", fields.join(", ")))
        })?;
    }
    Ok(())
}
