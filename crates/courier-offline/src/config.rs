//! Client-side resilience configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the offline stack (monitor, router, driver).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    /// Known-good endpoint used by the reachability probe.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    /// Periodic reconciliation interval in seconds.
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,

    /// Pause between records within one reconciliation pass, in
    /// milliseconds.
    #[serde(default = "default_drain_pause")]
    pub drain_pause_ms: u64,

    /// Resubmission attempt ceiling for offline records.
    #[serde(default = "default_max_attempts")]
    pub default_max_attempts: u32,

    /// Capacity of the trigger channel; a full buffer coalesces triggers.
    #[serde(default = "default_trigger_buffer")]
    pub trigger_buffer: usize,

    /// Capacity of the client event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Path for the durable JSON store, if used.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            probe_url: default_probe_url(),
            probe_timeout_ms: default_probe_timeout(),
            sync_interval_secs: default_sync_interval(),
            drain_pause_ms: default_drain_pause(),
            default_max_attempts: default_max_attempts(),
            trigger_buffer: default_trigger_buffer(),
            event_capacity: default_event_capacity(),
            storage_path: None,
        }
    }
}

fn default_probe_url() -> String {
    "http://127.0.0.1:8080/health".to_string()
}

fn default_probe_timeout() -> u64 {
    1000
}

fn default_sync_interval() -> u64 {
    30
}

fn default_drain_pause() -> u64 {
    100
}

fn default_max_attempts() -> u32 {
    3
}

fn default_trigger_buffer() -> usize {
    8
}

fn default_event_capacity() -> usize {
    128
}

impl OfflineConfig {
    /// Returns the probe timeout as a Duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Returns the reconciliation interval as a Duration.
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    /// Returns the per-record drain pause as a Duration.
    pub fn drain_pause(&self) -> Duration {
        Duration::from_millis(self.drain_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OfflineConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_millis(1000));
        assert_eq!(config.sync_interval(), Duration::from_secs(30));
        assert_eq!(config.drain_pause(), Duration::from_millis(100));
        assert_eq!(config.default_max_attempts, 3);
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: OfflineConfig =
            serde_json::from_str(r#"{"sync_interval_secs": 5}"#).unwrap();
        assert_eq!(config.sync_interval_secs, 5);
        assert_eq!(config.probe_timeout_ms, 1000);
    }
}
