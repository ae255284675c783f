//! Discovery configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for brain discovery.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// DNS-SD service type brains advertise under.
    pub service_type: String,
    /// How long to wait for a brain to answer, in seconds.
    pub timeout_secs: u64,
}

impl DiscoveryConfig {
    /// Browse window as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            service_type: "_neeo._tcp.local.".to_string(),
            timeout_secs: 10,
        }
    }
}
