//! Routes a submission either directly to the queue engine or into the
//! offline store.

use crate::connectivity::ConnectivityMonitor;
use crate::error::OfflineResult;
use crate::events::ClientEvent;
use crate::intake::JobIntake;
use crate::record::OfflineRecord;
use crate::store::OfflineStore;
use chrono::{DateTime, Utc};
use courier_queue::JobRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Uniform view of an acknowledged submission, whether it was queued
/// server-side or stored offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Record id (server job id or offline-scoped id).
    pub id: String,

    /// Unit-of-work type tag.
    pub kind: String,

    /// Lifecycle status as a string.
    pub status: String,

    /// Attempts so far.
    pub attempts: u32,

    /// Attempt ceiling.
    pub max_attempts: u32,

    /// When the submission was made.
    pub submitted_at: DateTime<Utc>,
}

impl From<&JobRecord> for JobSnapshot {
    fn from(job: &JobRecord) -> Self {
        Self {
            id: job.id.to_string(),
            kind: job.kind.clone(),
            status: job.status.to_string(),
            attempts: job.attempts,
            max_attempts: job.max_attempts,
            submitted_at: job.submitted_at,
        }
    }
}

impl From<&OfflineRecord> for JobSnapshot {
    fn from(record: &OfflineRecord) -> Self {
        Self {
            id: record.id.clone(),
            kind: record.kind.clone(),
            status: format!("offline/{}", record.status),
            attempts: record.attempts,
            max_attempts: record.max_attempts,
            submitted_at: record.submitted_at,
        }
    }
}

/// Success-shaped acknowledgment returned for every submission path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// True when the submission was stored offline instead of delivered.
    pub offline: bool,

    /// The acknowledged record.
    pub job: JobSnapshot,
}

/// Decides per submission whether to deliver directly or divert to the
/// offline store.
pub struct SubmissionRouter {
    monitor: Arc<ConnectivityMonitor>,
    intake: Arc<dyn JobIntake>,
    store: Arc<dyn OfflineStore>,
    events: broadcast::Sender<ClientEvent>,
    default_max_attempts: u32,
}

impl SubmissionRouter {
    /// Creates a router over the given monitor, intake, and store.
    pub fn new(
        monitor: Arc<ConnectivityMonitor>,
        intake: Arc<dyn JobIntake>,
        store: Arc<dyn OfflineStore>,
        events: broadcast::Sender<ClientEvent>,
        default_max_attempts: u32,
    ) -> Self {
        Self {
            monitor,
            intake,
            store,
            events,
            default_max_attempts,
        }
    }

    /// Submits a unit of work.
    ///
    /// Online: attempt direct intake; any intake failure falls back to the
    /// offline path. Offline: divert straight to the store without network
    /// I/O. Both paths return a success-shaped acknowledgment; only a store
    /// write failure is an error.
    pub async fn submit(
        &self,
        kind: &str,
        payload: serde_json::Value,
    ) -> OfflineResult<SubmissionAck> {
        if self.monitor.is_online().await {
            match self.intake.submit(kind, &payload, None).await {
                Ok(job) => {
                    debug!(job_id = %job.id, "Submission delivered directly");
                    return Ok(SubmissionAck {
                        offline: false,
                        job: JobSnapshot::from(&job),
                    });
                }
                Err(err) => {
                    warn!(error = %err, "Direct intake failed, storing offline");
                }
            }
        }

        self.store_offline(kind, payload).await
    }

    async fn store_offline(
        &self,
        kind: &str,
        payload: serde_json::Value,
    ) -> OfflineResult<SubmissionAck> {
        let record = OfflineRecord::new(kind, payload, self.default_max_attempts);
        self.store.put(record.clone()).await?;

        info!(offline_job_id = %record.id, "Submission stored offline");
        let _ = self.events.send(ClientEvent::Stored {
            record: record.clone(),
        });

        Ok(SubmissionAck {
            offline: true,
            job: JobSnapshot::from(&record),
        })
    }
}
