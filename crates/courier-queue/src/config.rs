//! Queue engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a queue engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default attempt ceiling for submissions that do not override it.
    #[serde(default = "default_max_attempts")]
    pub default_max_attempts: u32,

    /// Pause between successive records, in milliseconds.
    #[serde(default = "default_inter_job_pause")]
    pub inter_job_pause_ms: u64,

    /// Retention for completed records, in seconds.
    #[serde(default = "default_completed_retention")]
    pub completed_retention_secs: u64,

    /// Retention for failed records, in seconds.
    #[serde(default = "default_failed_retention")]
    pub failed_retention_secs: u64,

    /// Capacity of the terminal-event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_max_attempts: default_max_attempts(),
            inter_job_pause_ms: default_inter_job_pause(),
            completed_retention_secs: default_completed_retention(),
            failed_retention_secs: default_failed_retention(),
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_inter_job_pause() -> u64 {
    100
}

fn default_completed_retention() -> u64 {
    10
}

fn default_failed_retention() -> u64 {
    30
}

fn default_event_capacity() -> usize {
    128
}

impl EngineConfig {
    /// Returns the inter-job pause as a Duration.
    pub fn inter_job_pause(&self) -> Duration {
        Duration::from_millis(self.inter_job_pause_ms)
    }

    /// Returns the completed-record retention as a Duration.
    pub fn completed_retention(&self) -> Duration {
        Duration::from_secs(self.completed_retention_secs)
    }

    /// Returns the failed-record retention as a Duration.
    pub fn failed_retention(&self) -> Duration {
        Duration::from_secs(self.failed_retention_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_max_attempts, 3);
        assert_eq!(config.inter_job_pause(), Duration::from_millis(100));
        assert_eq!(config.completed_retention(), Duration::from_secs(10));
        assert_eq!(config.failed_retention(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"default_max_attempts": 5}"#).unwrap();
        assert_eq!(config.default_max_attempts, 5);
        assert_eq!(config.inter_job_pause_ms, 100);
    }
}
