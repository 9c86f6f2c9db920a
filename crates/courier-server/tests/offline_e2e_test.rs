//! End-to-end scenarios: a client-side stack (monitor, router, driver)
//! against a live server hosting a real engine.

use courier_offline::{
    ClientEvent, ConnectivityMonitor, HttpIntake, MemoryOfflineStore, OfflineConfig,
    OfflineStore, ReconciliationDriver, SubmissionRouter, SyncTrigger,
};
use courier_queue::{EngineConfig, JobStatus, QueueEngine, SimulatedHandler};
use courier_server::{create_router, AppState, HttpConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

struct TestServer {
    base_url: String,
    engine: Arc<QueueEngine>,
}

async fn spawn_server() -> TestServer {
    let engine = Arc::new(QueueEngine::new(
        EngineConfig {
            inter_job_pause_ms: 1,
            ..EngineConfig::default()
        },
        Arc::new(SimulatedHandler::instant()),
    ));
    engine.start().unwrap();

    let router = create_router(AppState::new(engine.clone()), &HttpConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        engine,
    }
}

fn client_stack(
    server: &TestServer,
) -> (
    Arc<ConnectivityMonitor>,
    SubmissionRouter,
    Arc<ReconciliationDriver>,
    Arc<MemoryOfflineStore>,
    broadcast::Receiver<ClientEvent>,
) {
    let monitor = Arc::new(ConnectivityMonitor::new(
        format!("{}/health", server.base_url),
        Duration::from_secs(1),
    ));
    let intake = Arc::new(HttpIntake::new(server.base_url.clone()));
    let store = Arc::new(MemoryOfflineStore::new());
    let (events, events_rx) = broadcast::channel(32);

    let config = OfflineConfig {
        drain_pause_ms: 1,
        ..OfflineConfig::default()
    };

    let router = SubmissionRouter::new(
        monitor.clone(),
        intake.clone(),
        store.clone(),
        events.clone(),
        config.default_max_attempts,
    );
    let driver = ReconciliationDriver::new(store.clone(), intake, config, events);

    (monitor, router, driver, store, events_rx)
}

async fn poll_status(server: &TestServer, id: &str) -> JobStatus {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    let client = reqwest::Client::new();
    loop {
        let response = client
            .get(format!("{}/api/job/{}", server.base_url, id))
            .send()
            .await
            .unwrap();
        if response.status().is_success() {
            let body: serde_json::Value = response.json().await.unwrap();
            let status: JobStatus =
                serde_json::from_value(body["job"]["status"].clone()).unwrap();
            if status.is_terminal() {
                return status;
            }
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {id} never reached a terminal state"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn online_submission_completes_on_first_attempt() {
    let server = spawn_server().await;
    let (_monitor, router, _driver, store, _events) = client_stack(&server);

    let ack = router
        .submit(
            "form-submission",
            json!({"name": "A", "email": "a@x.com", "message": "hi"}),
        )
        .await
        .unwrap();

    assert!(!ack.offline);
    assert!(store.list().await.unwrap().is_empty());

    let status = poll_status(&server, &ack.job.id).await;
    assert_eq!(status, JobStatus::Completed);

    let record = server
        .engine
        .get_job(&courier_queue::JobId::from(ack.job.id.clone()))
        .unwrap();
    assert_eq!(record.attempts, 1);

    server.engine.stop();
}

#[tokio::test]
async fn offline_submission_syncs_after_connectivity_returns() {
    let server = spawn_server().await;
    let (monitor, router, driver, store, mut events) = client_stack(&server);

    // Go offline: the cached flag diverts the submission to the store.
    monitor.set_online(false);
    let ack = router
        .submit(
            "form-submission",
            json!({"name": "A", "email": "a@x.com", "message": "hi"}),
        )
        .await
        .unwrap();

    assert!(ack.offline);
    assert_eq!(ack.job.status, "offline/pending");
    assert_eq!(ack.job.attempts, 0);

    let stored = timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(stored, ClientEvent::Stored { .. }));

    // Connectivity returns; the reconnect trigger drains the store.
    monitor.set_online(true);
    let report = driver.drain(SyncTrigger::ConnectivityRestored).await.unwrap();
    assert_eq!(report.synced, 1);

    let synced = timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    let ClientEvent::Synced {
        offline_job_id,
        job,
    } = synced
    else {
        panic!("expected synced event");
    };
    assert_eq!(offline_job_id, ack.job.id);
    assert_ne!(job.id.to_string(), offline_job_id);
    assert!(store.list().await.unwrap().is_empty());

    // The replayed submission runs to completion server-side.
    let status = poll_status(&server, job.id.as_str()).await;
    assert_eq!(status, JobStatus::Completed);

    server.engine.stop();
}

#[tokio::test]
async fn duplicate_triggers_do_not_double_submit() {
    let server = spawn_server().await;
    let (monitor, router, driver, store, _events) = client_stack(&server);

    monitor.set_online(false);
    router
        .submit(
            "form-submission",
            json!({"name": "B", "email": "b@x.com", "message": "again"}),
        )
        .await
        .unwrap();
    monitor.set_online(true);

    // Reconnect, visibility, and a manual sync all fire at once.
    let (first, second, third) = tokio::join!(
        driver.drain(SyncTrigger::ConnectivityRestored),
        driver.drain(SyncTrigger::VisibilityRestored),
        driver.drain(SyncTrigger::Manual),
    );
    let total_synced =
        first.unwrap().synced + second.unwrap().synced + third.unwrap().synced;

    assert_eq!(total_synced, 1);
    assert!(store.list().await.unwrap().is_empty());

    // Exactly one job reached the engine.
    let stats = server.engine.stats();
    assert_eq!(stats.total, 1);

    server.engine.stop();
}
