//! The pluggable work step executed by the worker loop.

use crate::error::QueueError;
use crate::job::JobRecord;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for performing the actual unit of work behind a job.
///
/// The engine calls `execute` once per processing attempt. Returning an
/// error routes the record through the retry path; the engine converts
/// panics into the same path, so the worker loop never aborts.
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    /// Perform the work for one attempt of the given job.
    async fn execute(&self, job: &JobRecord) -> Result<(), QueueError>;
}

/// Reference handler simulating a variable-duration external call.
///
/// Sleeps for a duration inside `[min_duration, max_duration]` and fails a
/// configurable fraction of attempts. Used by the shipped binary and the
/// integration tests; real consumers supply their own handler.
#[derive(Debug, Clone)]
pub struct SimulatedHandler {
    /// Fraction of attempts that fail, in `[0.0, 1.0]`.
    pub failure_rate: f64,

    /// Lower bound of the simulated work duration.
    pub min_duration: Duration,

    /// Upper bound of the simulated work duration.
    pub max_duration: Duration,
}

impl Default for SimulatedHandler {
    fn default() -> Self {
        Self {
            failure_rate: 0.1,
            min_duration: Duration::from_millis(1000),
            max_duration: Duration::from_millis(3000),
        }
    }
}

impl SimulatedHandler {
    /// Creates a handler with the given failure rate and the default
    /// duration range.
    pub fn with_failure_rate(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Creates a handler that never fails and finishes immediately.
    /// Useful in tests that only exercise queue mechanics.
    pub fn instant() -> Self {
        Self {
            failure_rate: 0.0,
            min_duration: Duration::ZERO,
            max_duration: Duration::ZERO,
        }
    }
}

#[async_trait]
impl JobHandler for SimulatedHandler {
    async fn execute(&self, job: &JobRecord) -> Result<(), QueueError> {
        let span_ms = self
            .max_duration
            .saturating_sub(self.min_duration)
            .as_millis() as u64;
        let extra = if span_ms == 0 { 0 } else { rand_below(span_ms) };
        let duration = self.min_duration + Duration::from_millis(extra);

        tokio::time::sleep(duration).await;

        if self.failure_rate > 0.0 && (rand_below(10_000) as f64) < self.failure_rate * 10_000.0 {
            return Err(QueueError::ExecutionFailed(format!(
                "simulated processing error for job {}",
                job.id
            )));
        }

        Ok(())
    }
}

/// Generate a pseudo-random value in `[0, range)` using a simple LCG.
fn rand_below(range: u64) -> u64 {
    use std::time::SystemTime;

    if range == 0 {
        return 0;
    }

    // Simple pseudo-random based on time
    let seed = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    // LCG parameters
    let a: u64 = 6364136223846793005;
    let c: u64 = 1442695040888963407;

    let random = seed.wrapping_mul(a).wrapping_add(c);
    random % range
}
