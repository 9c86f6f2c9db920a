//! Courier server entry point.

use courier_queue::{QueueEngine, SimulatedHandler};
use courier_server::{create_router, AppState, ServerSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_logging();

    info!("Starting Courier server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> courier_core::CourierResult<()> {
    let settings = ServerSettings::from_default_location()?;

    courier_queue::register_metrics();

    let handler = SimulatedHandler {
        failure_rate: settings.handler.failure_rate,
        min_duration: Duration::from_millis(settings.handler.min_duration_ms),
        max_duration: Duration::from_millis(settings.handler.max_duration_ms),
    };

    let engine = Arc::new(QueueEngine::new(settings.engine.clone(), Arc::new(handler)));
    engine
        .start()
        .map_err(|e| courier_core::CourierError::Internal(e.to_string()))?;

    let state = AppState::new(engine.clone());
    let router = create_router(state, &settings.http);

    let addr = settings.http.addr();
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| courier_core::CourierError::Internal(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| courier_core::CourierError::Internal(format!("Server error: {}", e)))?;

    engine.stop();
    info!("Server shutdown complete");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,courier=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
