//! Main application router.

use crate::config::HttpConfig;
use crate::controllers::{health_controller, jobs_controller, submit_controller};
use crate::state::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Creates the application router.
pub fn create_router(state: AppState, http_config: &HttpConfig) -> Router {
    let cors = create_cors_layer(http_config);

    let api_router = Router::new()
        .merge(submit_controller::router())
        .merge(jobs_controller::router())
        .with_state(state);

    let router = Router::new()
        .merge(health_controller::router())
        .merge(api_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    info!("Router created with intake and status endpoints");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(http_config: &HttpConfig) -> CorsLayer {
    if http_config.cors_enabled {
        if http_config.cors_origins.contains(&"*".to_string()) {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    } else {
        CorsLayer::new()
    }
}
