//! Courier Queue - In-Memory Job Queue Engine
//!
//! A memory-resident, single-consumer job queue with:
//! - Strict FIFO processing with retry-to-tail semantics
//! - Bounded attempt counts with a pluggable work handler
//! - Terminal-event broadcasting for `completed`/`failed` jobs
//! - Grace-period retention so polling clients can observe results
//! - Point-in-time queue statistics
//!
//! The engine is memory-resident by design: records do not survive a
//! process restart. Durability for not-yet-confirmed submissions lives
//! client-side (see the `courier-offline` crate).
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_queue::{EngineConfig, QueueEngine, SimulatedHandler, SubmitOptions};
//! use std::sync::Arc;
//!
//! let engine = QueueEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(SimulatedHandler::default()),
//! );
//! engine.start()?;
//!
//! let job = engine.submit(
//!     "form-submission",
//!     serde_json::json!({"name": "A", "email": "a@x.com", "message": "hi"}),
//!     SubmitOptions::default(),
//! )?;
//!
//! // Poll for the outcome:
//! let snapshot = engine.get_job(&job.id);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod handler;
pub mod job;
pub mod metrics;

pub use config::EngineConfig;
pub use engine::QueueEngine;
pub use error::{QueueError, QueueResult};
pub use events::JobEvent;
pub use handler::{JobHandler, SimulatedHandler};
pub use job::{JobId, JobRecord, JobStatus, QueueStats, SubmitOptions};
pub use metrics::register_metrics;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::engine::QueueEngine;
    pub use crate::handler::JobHandler;
    pub use crate::job::{JobId, JobRecord, JobStatus, SubmitOptions};
    pub use crate::{JobEvent, QueueError, QueueResult};
}
