//! The queue engine's intake contract, as seen from the client side.

use crate::error::{OfflineError, OfflineResult};
use async_trait::async_trait;
use courier_queue::JobRecord;
use serde::{Deserialize, Serialize};

/// Submits a unit of work to the queue engine.
///
/// Consumed by the submission router (direct path) and the reconciliation
/// driver (replay path); both treat any `Err` as "not confirmed delivered".
#[async_trait]
pub trait JobIntake: Send + Sync {
    /// Submits the payload and returns the created server-side record.
    async fn submit(
        &self,
        kind: &str,
        payload: &serde_json::Value,
        max_attempts: Option<u32>,
    ) -> OfflineResult<JobRecord>;
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    kind: &'a str,
    payload: &'a serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    job: JobRecord,
}

/// HTTP client for a remote queue engine's `/api/submit` endpoint.
pub struct HttpIntake {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIntake {
    /// Creates a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl JobIntake for HttpIntake {
    async fn submit(
        &self,
        kind: &str,
        payload: &serde_json::Value,
        max_attempts: Option<u32>,
    ) -> OfflineResult<JobRecord> {
        let response = self
            .client
            .post(format!("{}/api/submit", self.base_url))
            .json(&SubmitBody {
                kind,
                payload,
                max_attempts,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OfflineError::Rejected(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: SubmitResponse = response.json().await?;
        Ok(parsed.job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_submit_parses_created_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Form submitted successfully",
                "job": {
                    "id": "abc-123",
                    "kind": "form-submission",
                    "payload": {"name": "A"},
                    "submitted_at": "2024-01-01T00:00:00Z",
                    "status": "waiting",
                    "attempts": 0,
                    "max_attempts": 3
                }
            })))
            .mount(&server)
            .await;

        let intake = HttpIntake::new(server.uri());
        let job = intake
            .submit("form-submission", &json!({"name": "A"}), None)
            .await
            .unwrap();

        assert_eq!(job.id.as_str(), "abc-123");
        assert_eq!(job.attempts, 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let intake = HttpIntake::new(server.uri());
        let err = intake
            .submit("form-submission", &json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OfflineError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_submit_transport_error_is_connectivity() {
        let intake = HttpIntake::new("http://127.0.0.1:1");
        let err = intake
            .submit("form-submission", &json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OfflineError::Connectivity(_)));
    }
}
