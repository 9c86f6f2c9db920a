//! Reachability detection for submission routing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Determines online/offline status from two signals: a cached platform
/// flag and an active reachability probe.
///
/// The cached flag's false negatives are trusted immediately: when the host
/// reports offline, no probe is made. When it claims online, a short-timeout
/// HEAD request to a known-good endpoint catches lying flags (captive
/// portals, flaky links). The probe never blocks the caller beyond its
/// timeout; any transport error reports offline.
pub struct ConnectivityMonitor {
    client: reqwest::Client,
    probe_url: String,
    probe_timeout: Duration,
    assume_online: AtomicBool,
}

impl ConnectivityMonitor {
    /// Creates a monitor probing the given endpoint.
    pub fn new(probe_url: impl Into<String>, probe_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            probe_url: probe_url.into(),
            probe_timeout,
            assume_online: AtomicBool::new(true),
        }
    }

    /// Updates the cached platform flag (fed by the host's online/offline
    /// events).
    pub fn set_online(&self, online: bool) {
        self.assume_online.store(online, Ordering::SeqCst);
    }

    /// Returns the cached flag without probing.
    pub fn cached_online(&self) -> bool {
        self.assume_online.load(Ordering::SeqCst)
    }

    /// Returns true if the server is actually reachable right now.
    pub async fn is_online(&self) -> bool {
        if !self.cached_online() {
            debug!("Cached flag reports offline, skipping probe");
            return false;
        }

        match self
            .client
            .head(&self.probe_url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let online = response.status().is_success();
                debug!(status = %response.status(), online, "Reachability probe answered");
                online
            }
            Err(err) => {
                debug!(error = %err, "Reachability probe failed, reporting offline");
                false
            }
        }
    }
}
