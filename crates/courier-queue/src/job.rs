//! Job record and status definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Creates a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a job ID from a string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the job ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Job lifecycle status.
///
/// Legal transitions are `Waiting -> Processing` and
/// `Processing -> Completed | Waiting | Failed`. `Completed` and `Failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued and waiting for the worker.
    Waiting,
    /// Job is currently being processed.
    Processing,
    /// Job completed successfully.
    Completed,
    /// Job failed after exhausting its attempts.
    Failed,
}

impl JobStatus {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Waiting
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Waiting => write!(f, "waiting"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A unit of work tracked by the queue engine.
///
/// The engine owns the record exclusively once it is in the table; `status`
/// and `attempts` are only mutated by the worker loop and intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job ID, generated at creation.
    pub id: JobId,

    /// Unit-of-work type tag.
    pub kind: String,

    /// Opaque payload passed through to the handler.
    pub payload: serde_json::Value,

    /// When the job was submitted. Immutable.
    pub submitted_at: DateTime<Utc>,

    /// Current lifecycle status.
    pub status: JobStatus,

    /// Processing attempts so far.
    pub attempts: u32,

    /// Attempt ceiling, fixed at creation.
    pub max_attempts: u32,
}

impl JobRecord {
    /// Creates a new waiting record.
    pub fn new(kind: impl Into<String>, payload: serde_json::Value, max_attempts: u32) -> Self {
        Self {
            id: JobId::new(),
            kind: kind.into(),
            payload,
            submitted_at: Utc::now(),
            status: JobStatus::Waiting,
            attempts: 0,
            max_attempts,
        }
    }

    /// Returns true once the attempt ceiling has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

/// Options accepted at intake.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitOptions {
    /// Override for the attempt ceiling.
    pub max_attempts: Option<u32>,
}

/// Point-in-time counts over the live job table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Live records, all statuses.
    pub total: usize,

    /// Records waiting for the worker.
    pub waiting: usize,

    /// Records being processed.
    pub processing: usize,

    /// Completed records still within their grace period.
    pub completed: usize,

    /// Failed records still within their grace period.
    pub failed: usize,
}
