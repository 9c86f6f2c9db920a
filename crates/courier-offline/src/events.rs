//! Notifications from the client-side resilience stack to its consumers.

use crate::record::OfflineRecord;
use courier_queue::JobRecord;

/// Notification published by the router and the reconciliation driver.
///
/// Delivery is at-least-once over a broadcast channel; consumers must treat
/// a duplicate event for the same record as idempotent.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A submission was stored offline instead of delivered.
    Stored {
        /// The persisted record.
        record: OfflineRecord,
    },
    /// An offline record was delivered to the queue engine.
    Synced {
        /// The offline-scoped id of the drained record.
        offline_job_id: String,
        /// The freshly created server-side record, for correlation.
        job: JobRecord,
    },
    /// An offline record exhausted its resubmission attempts and was
    /// discarded.
    Failed {
        /// The offline-scoped id of the discarded record.
        offline_job_id: String,
    },
}
