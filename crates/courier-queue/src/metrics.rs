//! Metrics for queue engine monitoring.

use metrics::{describe_counter, describe_gauge};

/// Metric names for the queue engine.
pub mod names {
    /// Total jobs accepted at intake.
    pub const JOBS_SUBMITTED_TOTAL: &str = "courier_jobs_submitted_total";
    /// Total jobs completed successfully.
    pub const JOBS_COMPLETED_TOTAL: &str = "courier_jobs_completed_total";
    /// Total jobs that exhausted their attempts.
    pub const JOBS_FAILED_TOTAL: &str = "courier_jobs_failed_total";
    /// Total re-queued attempts.
    pub const JOBS_RETRIED_TOTAL: &str = "courier_jobs_retried_total";

    /// Current waiting jobs.
    pub const JOBS_WAITING: &str = "courier_jobs_waiting";
    /// Current processing jobs (0 or 1 for a single-consumer engine).
    pub const JOBS_PROCESSING: &str = "courier_jobs_processing";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::JOBS_SUBMITTED_TOTAL,
        "Total number of jobs accepted at intake"
    );
    describe_counter!(
        names::JOBS_COMPLETED_TOTAL,
        "Total number of jobs completed successfully"
    );
    describe_counter!(
        names::JOBS_FAILED_TOTAL,
        "Total number of jobs that exhausted their attempts"
    );
    describe_counter!(
        names::JOBS_RETRIED_TOTAL,
        "Total number of re-queued job attempts"
    );

    describe_gauge!(names::JOBS_WAITING, "Current number of waiting jobs");
    describe_gauge!(
        names::JOBS_PROCESSING,
        "Current number of jobs being processed"
    );
}
