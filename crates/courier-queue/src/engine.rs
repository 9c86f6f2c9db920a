//! The queue engine: intake, job table, and the single-consumer worker loop.

use crate::config::EngineConfig;
use crate::error::{QueueError, QueueResult};
use crate::events::JobEvent;
use crate::handler::JobHandler;
use crate::job::{JobId, JobRecord, JobStatus, QueueStats, SubmitOptions};
use crate::metrics::names;
use metrics::{counter, gauge};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tracing::{debug, error, info, warn};

/// In-memory, single-consumer job queue engine.
///
/// One engine instance owns its job table and waiting list exclusively.
/// Construct it explicitly, call [`QueueEngine::start`] to spawn the worker
/// loop, and [`QueueEngine::stop`] to shut it down; the engine is cheap to
/// clone and share across request handlers.
#[derive(Clone)]
pub struct QueueEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: EngineConfig,
    handler: Arc<dyn JobHandler>,
    jobs: RwLock<HashMap<JobId, JobRecord>>,
    waiting: Mutex<VecDeque<JobId>>,
    wakeup: Notify,
    events: broadcast::Sender<JobEvent>,
    running: AtomicBool,
    // Bumped on every start; a superseded worker exits before its next pop.
    generation: AtomicU64,
    shutdown_tx: broadcast::Sender<()>,
}

impl QueueEngine {
    /// Creates an engine with the given configuration and work handler.
    pub fn new(config: EngineConfig, handler: Arc<dyn JobHandler>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            inner: Arc::new(EngineInner {
                config,
                handler,
                jobs: RwLock::new(HashMap::new()),
                waiting: Mutex::new(VecDeque::new()),
                wakeup: Notify::new(),
                events,
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                shutdown_tx,
            }),
        }
    }

    /// Starts the worker loop.
    ///
    /// Errors if the engine is already running. Must be called from within
    /// a tokio runtime.
    pub fn start(&self) -> QueueResult<()> {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(QueueError::Worker("engine already running".to_string()));
        }

        info!(
            max_attempts = self.inner.config.default_max_attempts,
            pause_ms = self.inner.config.inter_job_pause_ms,
            "Starting queue engine"
        );

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        let shutdown_rx = self.inner.shutdown_tx.subscribe();
        tokio::spawn(worker_loop(inner, generation, shutdown_rx));

        Ok(())
    }

    /// Signals the worker loop to stop.
    ///
    /// An in-flight attempt runs to completion; waiting records stay queued
    /// and resume processing on the next `start`.
    pub fn stop(&self) {
        if self.inner.running.swap(false, Ordering::SeqCst) {
            info!("Stopping queue engine");
            let _ = self.inner.shutdown_tx.send(());
        }
    }

    /// Returns true while the worker loop is running.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Intake: validates and enqueues a unit of work.
    ///
    /// Returns the created record immediately; completion is observed via
    /// [`QueueEngine::subscribe`] or by polling [`QueueEngine::get_job`].
    /// The only failure is structural validation of the submission.
    pub fn submit(
        &self,
        kind: &str,
        payload: serde_json::Value,
        options: SubmitOptions,
    ) -> QueueResult<JobRecord> {
        validate_submission(kind, &payload)?;

        let max_attempts = options
            .max_attempts
            .unwrap_or(self.inner.config.default_max_attempts)
            .max(1);
        let record = JobRecord::new(kind, payload, max_attempts);

        self.inner
            .jobs
            .write()
            .insert(record.id.clone(), record.clone());
        self.inner.waiting.lock().push_back(record.id.clone());
        self.inner.wakeup.notify_one();

        counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
        debug!(job_id = %record.id, kind = %record.kind, "Job submitted");

        Ok(record)
    }

    /// Returns a snapshot of the record, or `None` once it has been
    /// reclaimed or never existed (the two are indistinguishable).
    pub fn get_job(&self, id: &JobId) -> Option<JobRecord> {
        self.inner.jobs.read().get(id).cloned()
    }

    /// Returns point-in-time counts over the live job table.
    pub fn stats(&self) -> QueueStats {
        let jobs = self.inner.jobs.read();
        let mut stats = QueueStats {
            total: jobs.len(),
            ..QueueStats::default()
        };
        for job in jobs.values() {
            match job.status {
                JobStatus::Waiting => stats.waiting += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Subscribes to terminal job events.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.inner.events.subscribe()
    }
}

/// Structural validation at intake; nothing is created on failure.
fn validate_submission(kind: &str, payload: &serde_json::Value) -> QueueResult<()> {
    if kind.trim().is_empty() {
        return Err(QueueError::Validation("kind must not be empty".to_string()));
    }
    if !payload.is_object() {
        return Err(QueueError::Validation(
            "payload must be a JSON object".to_string(),
        ));
    }
    Ok(())
}

async fn worker_loop(
    inner: Arc<EngineInner>,
    generation: u64,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    info!(generation, "Worker loop started");

    loop {
        // Drain the FIFO one record at a time.
        loop {
            if inner.generation.load(Ordering::SeqCst) != generation {
                info!(generation, "Worker loop superseded");
                return;
            }
            let next = inner.waiting.lock().pop_front();
            let Some(job_id) = next else { break };

            process_job(&inner, &job_id).await;

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Worker loop received shutdown mid-drain");
                    return;
                }
                _ = tokio::time::sleep(inner.config.inter_job_pause()) => {}
            }
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = inner.wakeup.notified() => {}
        }
    }

    info!("Worker loop stopped");
}

/// Processes one attempt of one record. Never returns an error: any handler
/// failure or panic is converted into the retry/failure path.
async fn process_job(inner: &Arc<EngineInner>, job_id: &JobId) {
    let snapshot = {
        let mut jobs = inner.jobs.write();
        let Some(job) = jobs.get_mut(job_id) else {
            warn!(job_id = %job_id, "Waiting job vanished from table");
            return;
        };
        job.status = JobStatus::Processing;
        job.attempts += 1;
        job.clone()
    };

    gauge!(names::JOBS_WAITING).set(inner.waiting.lock().len() as f64);
    gauge!(names::JOBS_PROCESSING).set(1.0);
    debug!(
        job_id = %snapshot.id,
        kind = %snapshot.kind,
        attempt = snapshot.attempts,
        max_attempts = snapshot.max_attempts,
        "Processing job"
    );

    // Run the handler in its own task so a panic is caught here and becomes
    // an ordinary failed attempt.
    let handler = inner.handler.clone();
    let job_for_handler = snapshot.clone();
    let result = match tokio::spawn(async move { handler.execute(&job_for_handler).await }).await {
        Ok(result) => result,
        Err(join_err) => Err(QueueError::Worker(format!("handler panicked: {join_err}"))),
    };

    gauge!(names::JOBS_PROCESSING).set(0.0);

    match result {
        Ok(()) => complete_job(inner, job_id),
        Err(err) => fail_or_retry(inner, job_id, &snapshot, &err),
    }
}

fn complete_job(inner: &Arc<EngineInner>, job_id: &JobId) {
    let terminal = {
        let mut jobs = inner.jobs.write();
        let Some(job) = jobs.get_mut(job_id) else { return };
        job.status = JobStatus::Completed;
        job.clone()
    };

    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    debug!(job_id = %job_id, attempts = terminal.attempts, "Job completed");

    let _ = inner.events.send(JobEvent::Completed(terminal));
    schedule_removal(inner, job_id.clone(), inner.config.completed_retention());
}

fn fail_or_retry(inner: &Arc<EngineInner>, job_id: &JobId, snapshot: &JobRecord, err: &QueueError) {
    if snapshot.attempts < snapshot.max_attempts {
        warn!(
            job_id = %job_id,
            attempt = snapshot.attempts,
            error = %err,
            "Job attempt failed, re-queueing"
        );

        {
            let mut jobs = inner.jobs.write();
            if let Some(job) = jobs.get_mut(job_id) {
                job.status = JobStatus::Waiting;
            }
        }
        // Retries join the tail so one flaky job cannot starve the head.
        inner.waiting.lock().push_back(job_id.clone());
        counter!(names::JOBS_RETRIED_TOTAL).increment(1);
        return;
    }

    error!(
        job_id = %job_id,
        attempts = snapshot.attempts,
        error = %err,
        "Job failed permanently"
    );

    let terminal = {
        let mut jobs = inner.jobs.write();
        let Some(job) = jobs.get_mut(job_id) else { return };
        job.status = JobStatus::Failed;
        job.clone()
    };

    counter!(names::JOBS_FAILED_TOTAL).increment(1);
    let _ = inner.events.send(JobEvent::Failed(terminal));
    schedule_removal(inner, job_id.clone(), inner.config.failed_retention());
}

/// Reclaims a terminal record after its grace period so pending status polls
/// can still observe the result.
fn schedule_removal(inner: &Arc<EngineInner>, job_id: JobId, after: Duration) {
    let inner = inner.clone();
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        inner.jobs.write().remove(&job_id);
        debug!(job_id = %job_id, "Job record reclaimed");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::SimulatedHandler;
    use serde_json::json;

    fn engine() -> QueueEngine {
        QueueEngine::new(
            EngineConfig::default(),
            Arc::new(SimulatedHandler::instant()),
        )
    }

    #[tokio::test]
    async fn test_submit_returns_waiting_record() {
        let engine = engine();
        let record = engine
            .submit(
                "form-submission",
                json!({"name": "A", "email": "a@x.com", "message": "hi"}),
                SubmitOptions::default(),
            )
            .unwrap();

        assert_eq!(record.status, JobStatus::Waiting);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.max_attempts, 3);
    }

    #[tokio::test]
    async fn test_submit_rejects_non_object_payload() {
        let engine = engine();
        let err = engine
            .submit("form-submission", json!("not an object"), SubmitOptions::default())
            .unwrap_err();

        assert!(matches!(err, QueueError::Validation(_)));
        assert_eq!(engine.stats().total, 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_kind() {
        let engine = engine();
        let err = engine
            .submit("  ", json!({}), SubmitOptions::default())
            .unwrap_err();

        assert!(matches!(err, QueueError::Validation(_)));
    }

    #[tokio::test]
    async fn test_max_attempts_override_and_floor() {
        let engine = engine();
        let record = engine
            .submit(
                "form-submission",
                json!({}),
                SubmitOptions {
                    max_attempts: Some(5),
                },
            )
            .unwrap();
        assert_eq!(record.max_attempts, 5);

        let record = engine
            .submit(
                "form-submission",
                json!({}),
                SubmitOptions {
                    max_attempts: Some(0),
                },
            )
            .unwrap();
        assert_eq!(record.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_get_job_snapshot_and_missing() {
        let engine = engine();
        let record = engine
            .submit("form-submission", json!({}), SubmitOptions::default())
            .unwrap();

        let found = engine.get_job(&record.id).unwrap();
        assert_eq!(found.id, record.id);
        assert!(engine.get_job(&JobId::from("nope")).is_none());
    }

    #[tokio::test]
    async fn test_stats_counts_sum_to_total() {
        let engine = engine();
        for _ in 0..4 {
            engine
                .submit("form-submission", json!({}), SubmitOptions::default())
                .unwrap();
        }

        let stats = engine.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(
            stats.waiting + stats.processing + stats.completed + stats.failed,
            stats.total
        );
    }

    #[tokio::test]
    async fn test_double_start_errors() {
        let engine = engine();
        engine.start().unwrap();
        assert!(engine.start().is_err());
        engine.stop();
    }

    #[tokio::test]
    async fn test_stop_then_restart() {
        let engine = engine();
        engine.start().unwrap();
        engine.stop();
        assert!(!engine.is_running());
        engine.start().unwrap();
        assert!(engine.is_running());
        engine.stop();
    }
}
