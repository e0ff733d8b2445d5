//! Configuration of the heartbeat monitor.

use crate::error::HealthMonitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote procedure invoked on every probe cycle.
pub const DEFAULT_PROBE_METHOD: &str = "Ping";

/// Inbound push counted as an acknowledgment.
pub const DEFAULT_ACK_SIGNAL: &str = "Pong";

fn default_probe_interval_ms() -> u64 {
    30_000
}

fn default_stale_threshold_ms() -> u64 {
    60_000 // one full missed probe cycle
}

fn default_probe_method() -> String {
    DEFAULT_PROBE_METHOD.to_string()
}

fn default_ack_signal() -> String {
    DEFAULT_ACK_SIGNAL.to_string()
}

/// Configuration for the realtime channel heartbeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthMonitorConfig {
    /// Interval between two probes, in milliseconds
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,

    /// Maximum age of the last acknowledgment before the connection is reported unhealthy, in milliseconds
    #[serde(default = "default_stale_threshold_ms")]
    pub stale_threshold_ms: u64,

    /// Name of the remote procedure used as a probe
    #[serde(default = "default_probe_method")]
    pub probe_method: String,

    /// Name of the inbound push signal acknowledging liveness
    #[serde(default = "default_ack_signal")]
    pub ack_signal: String,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            probe_interval_ms: default_probe_interval_ms(),
            stale_threshold_ms: default_stale_threshold_ms(),
            probe_method: default_probe_method(),
            ack_signal: default_ack_signal(),
        }
    }
}

impl HealthMonitorConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn stale_threshold(&self) -> Duration {
        Duration::from_millis(self.stale_threshold_ms)
    }

    pub fn validate(&self) -> Result<(), HealthMonitorError> {
        if self.probe_interval_ms == 0 {
            return Err(HealthMonitorError::InvalidConfig("probe interval must be greater than zero".into()));
        }
        if self.stale_threshold_ms == 0 {
            return Err(HealthMonitorError::InvalidConfig("stale threshold must be greater than zero".into()));
        }
        if self.probe_method.trim().is_empty() {
            return Err(HealthMonitorError::InvalidConfig("probe method name cannot be empty".into()));
        }
        if self.ack_signal.trim().is_empty() {
            return Err(HealthMonitorError::InvalidConfig("acknowledgment signal name cannot be empty".into()));
        }
        Ok(())
    }
}
