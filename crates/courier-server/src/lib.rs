//! Courier Server
//!
//! HTTP surface hosting one queue engine instance per process:
//! - `POST /api/submit` — intake
//! - `GET /api/job/{id}` — status query
//! - `GET /api/queue-stats` — live counts
//! - `GET /health` — liveness (and the client-side probe target)

pub mod config;
pub mod controllers;
pub mod responses;
pub mod router;
pub mod state;

pub use config::{HandlerConfig, HttpConfig, ServerSettings};
pub use router::create_router;
pub use state::AppState;
