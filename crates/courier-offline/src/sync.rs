//! Drains the offline store against the queue engine's intake contract.

use crate::config::OfflineConfig;
use crate::error::OfflineResult;
use crate::events::ClientEvent;
use crate::intake::JobIntake;
use crate::record::OfflineStatus;
use crate::store::OfflineStore;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// The independent signals that can start a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// The platform reported connectivity restored.
    ConnectivityRestored,
    /// The page/tab became visible while online.
    VisibilityRestored,
    /// The periodic timer fired.
    Interval,
    /// Explicit user action.
    Manual,
    /// A peer process or background context asked for a sync.
    PeerMessage,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// False when another pass was already in flight and this one bailed.
    pub ran: bool,

    /// Records delivered and removed.
    pub synced: usize,

    /// Records discarded after exhausting their attempts.
    pub discarded: usize,

    /// Records whose resubmission failed and that stay pending.
    pub deferred: usize,

    /// Records skipped because a resubmission was already in flight.
    pub skipped: usize,
}

/// Single consumer draining the offline store, fed by many trigger sources.
///
/// At most one pass runs at any instant: overlapping `drain` calls bail on
/// the gate, and within a pass each record is marked in flight before the
/// network call so a concurrent pass cannot resubmit it.
pub struct ReconciliationDriver {
    store: Arc<dyn OfflineStore>,
    intake: Arc<dyn JobIntake>,
    config: OfflineConfig,
    events: broadcast::Sender<ClientEvent>,
    trigger_tx: mpsc::Sender<SyncTrigger>,
    trigger_rx: parking_lot::Mutex<Option<mpsc::Receiver<SyncTrigger>>>,
    drain_gate: tokio::sync::Mutex<()>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ReconciliationDriver {
    /// Creates a driver over the given store and intake.
    pub fn new(
        store: Arc<dyn OfflineStore>,
        intake: Arc<dyn JobIntake>,
        config: OfflineConfig,
        events: broadcast::Sender<ClientEvent>,
    ) -> Arc<Self> {
        let (trigger_tx, trigger_rx) = mpsc::channel(config.trigger_buffer.max(1));
        let (shutdown_tx, _) = broadcast::channel(1);

        Arc::new(Self {
            store,
            intake,
            config,
            events,
            trigger_tx,
            trigger_rx: parking_lot::Mutex::new(Some(trigger_rx)),
            drain_gate: tokio::sync::Mutex::new(()),
            shutdown_tx,
        })
    }

    /// Requests a reconciliation pass. Never blocks: when the buffer is
    /// full a pass is already pending and the trigger is coalesced.
    pub fn trigger(&self, trigger: SyncTrigger) {
        match self.trigger_tx.try_send(trigger) {
            Ok(()) => debug!(?trigger, "Sync trigger queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(?trigger, "Sync trigger coalesced, drain already pending");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(?trigger, "Sync trigger dropped, driver stopped");
            }
        }
    }

    /// Spawns the consumer task: drains on every trigger and on the
    /// periodic interval, until [`ReconciliationDriver::stop`].
    ///
    /// Panics if called twice; the receiver can only be taken once.
    pub fn run(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let mut trigger_rx = self
            .trigger_rx
            .lock()
            .take()
            .expect("reconciliation driver already running");
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let driver = self;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(driver.config.sync_interval());
            // The first tick fires immediately; skip it so startup does not
            // race the host's own initial trigger.
            interval.tick().await;

            info!(
                interval_secs = driver.config.sync_interval_secs,
                "Reconciliation driver started"
            );

            loop {
                let trigger = tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    received = trigger_rx.recv() => match received {
                        Some(trigger) => trigger,
                        None => break,
                    },
                    _ = interval.tick() => SyncTrigger::Interval,
                };

                if let Err(err) = driver.drain(trigger).await {
                    warn!(error = %err, "Reconciliation pass failed");
                }
            }

            info!("Reconciliation driver stopped");
        })
    }

    /// Stops the consumer task.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Runs one reconciliation pass.
    ///
    /// Reads the pending set and resubmits each eligible record through the
    /// intake contract: success removes the record and emits `Synced`,
    /// failure increments its attempt counter, exhaustion discards it and
    /// emits `Failed` exactly once. Store read errors fail open to an empty
    /// pass.
    pub async fn drain(&self, trigger: SyncTrigger) -> OfflineResult<DrainReport> {
        let Ok(_guard) = self.drain_gate.try_lock() else {
            debug!(?trigger, "Drain already in progress, skipping");
            return Ok(DrainReport::default());
        };

        let records = match self.store.list().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "Offline store unreadable, skipping pass");
                Vec::new()
            }
        };

        let mut report = DrainReport {
            ran: true,
            ..DrainReport::default()
        };

        if records.is_empty() {
            return Ok(report);
        }

        info!(?trigger, pending = records.len(), "Draining offline store");

        for listed in records {
            // Re-read: a previous iteration of an overlapping pass may have
            // finished this record already.
            let current = match self.store.get(&listed.id).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(err) => {
                    warn!(offline_job_id = %listed.id, error = %err, "Record unreadable, skipping");
                    continue;
                }
            };

            if current.status == OfflineStatus::InFlight {
                report.skipped += 1;
                continue;
            }

            if current.is_exhausted() {
                self.discard(current.id.clone()).await;
                report.discarded += 1;
                continue;
            }

            let mut record = current;
            record.status = OfflineStatus::InFlight;
            if let Err(err) = self.store.put(record.clone()).await {
                warn!(offline_job_id = %record.id, error = %err, "Could not mark record in flight");
                continue;
            }

            match self.intake.submit(&record.kind, &record.payload, None).await {
                Ok(job) => {
                    if let Err(err) = self.store.remove(&record.id).await {
                        warn!(offline_job_id = %record.id, error = %err, "Could not remove synced record");
                    }
                    info!(
                        offline_job_id = %record.id,
                        job_id = %job.id,
                        "Offline record synced"
                    );
                    let _ = self.events.send(ClientEvent::Synced {
                        offline_job_id: record.id.clone(),
                        job,
                    });
                    report.synced += 1;
                }
                Err(err) => {
                    record.attempts += 1;
                    if record.is_exhausted() {
                        warn!(
                            offline_job_id = %record.id,
                            attempts = record.attempts,
                            error = %err,
                            "Offline record exhausted"
                        );
                        self.discard(record.id.clone()).await;
                        report.discarded += 1;
                    } else {
                        debug!(
                            offline_job_id = %record.id,
                            attempts = record.attempts,
                            error = %err,
                            "Resubmission failed, keeping record pending"
                        );
                        record.status = OfflineStatus::Pending;
                        if let Err(err) = self.store.put(record).await {
                            warn!(error = %err, "Could not re-persist deferred record");
                        }
                        report.deferred += 1;
                    }
                }
            }

            tokio::time::sleep(self.config.drain_pause()).await;
        }

        Ok(report)
    }

    async fn discard(&self, offline_job_id: String) {
        if let Err(err) = self.store.remove(&offline_job_id).await {
            warn!(offline_job_id = %offline_job_id, error = %err, "Could not discard record");
            return;
        }
        let _ = self.events.send(ClientEvent::Failed { offline_job_id });
    }
}
