//! The client-side representation of a not-yet-confirmed submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client-side lifecycle state of an offline record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineStatus {
    /// Waiting for the next reconciliation pass.
    Pending,
    /// A resubmission is in flight. Set before the network call and cleared
    /// after, so overlapping reconciliation passes skip the record.
    InFlight,
}

impl fmt::Display for OfflineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfflineStatus::Pending => write!(f, "pending"),
            OfflineStatus::InFlight => write!(f, "in_flight"),
        }
    }
}

/// A submission persisted locally because it could not be confirmed
/// delivered. Same shape as a server job record, keyed by its own fresh id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineRecord {
    /// Fresh offline-scoped id, distinct from any server job id.
    pub id: String,

    /// Unit-of-work type tag.
    pub kind: String,

    /// Opaque payload, replayed verbatim at resubmission.
    pub payload: serde_json::Value,

    /// When the submission was originally made.
    pub submitted_at: DateTime<Utc>,

    /// Client-side lifecycle state.
    pub status: OfflineStatus,

    /// Resubmission attempts so far.
    pub attempts: u32,

    /// Resubmission attempt ceiling.
    pub max_attempts: u32,
}

impl OfflineRecord {
    /// Creates a pending record with a fresh id.
    pub fn new(kind: impl Into<String>, payload: serde_json::Value, max_attempts: u32) -> Self {
        Self {
            id: format!("offline-{}", Uuid::new_v4()),
            kind: kind.into(),
            payload,
            submitted_at: Utc::now(),
            status: OfflineStatus::Pending,
            attempts: 0,
            max_attempts,
        }
    }

    /// Returns true once the resubmission ceiling has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}
