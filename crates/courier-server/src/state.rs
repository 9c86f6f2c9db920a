//! Shared application state.

use courier_queue::QueueEngine;
use std::sync::Arc;

/// State shared across request handlers: the one engine instance hosted by
/// this process.
#[derive(Clone)]
pub struct AppState {
    /// The queue engine.
    pub engine: Arc<QueueEngine>,
}

impl AppState {
    /// Creates state around an engine instance.
    pub fn new(engine: Arc<QueueEngine>) -> Self {
        Self { engine }
    }
}
