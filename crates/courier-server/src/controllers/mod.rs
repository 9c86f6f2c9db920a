//! Request handlers.

pub mod health_controller;
pub mod jobs_controller;
pub mod submit_controller;
