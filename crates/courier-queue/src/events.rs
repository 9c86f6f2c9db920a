//! Terminal job events emitted by the engine.

use crate::job::JobRecord;
use serde::{Deserialize, Serialize};

/// Event published when a job reaches a terminal state.
///
/// Delivery is at-least-once over a broadcast channel; a slow subscriber
/// may observe lag and should treat duplicate events as idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    /// The job's work step succeeded.
    Completed(JobRecord),
    /// The job exhausted its attempts.
    Failed(JobRecord),
}

impl JobEvent {
    /// Returns the record carried by the event.
    pub fn job(&self) -> &JobRecord {
        match self {
            JobEvent::Completed(job) | JobEvent::Failed(job) => job,
        }
    }
}
