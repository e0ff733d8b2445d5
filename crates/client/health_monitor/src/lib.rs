//! Heartbeat monitor for Nurture's realtime notification channel.
//!
//! # Overview
//!
//! Notifications reach the application over a long-lived, bidirectional realtime connection. Transports report
//! their own disconnects, but a connection can also stay "connected" while the peer has stopped answering. The
//! [`HealthMonitor`] detects that case with an application-level heartbeat and turns it into a boolean verdict
//! the UI can render.
//!
//! # Probe cycle
//!
//! Every probe interval (30s by default) the monitor:
//!
//! 1. **Checks the transport state**: if the connection is not connected, the cycle is skipped silently.
//!    Reconnection is the transport's business.
//! 2. **Invokes the probe method** (`Ping`) and awaits the direct reply. A failed invocation is an immediate
//!    unhealthy verdict.
//! 3. **Checks the acknowledgment age**: the peer pushes `Pong` signals at its own pace, and the connection is
//!    healthy if the last one is younger than the stale threshold (60s by default). Starting the monitor counts
//!    as an acknowledgment.
//! 4. **Reports** the verdict to the callback given to [`HealthMonitor::start`].
//!
//! At most one probe is in flight at any time. Verdicts are informational only: the monitor never retries,
//! reconnects or returns an error because the connection is degraded.
//!
//! # Usage
//!
//! ```rust,ignore
//! let monitor = Arc::new(HealthMonitor::new(connection, params.as_config())?);
//! monitor.start(move |is_healthy| status_indicator.set_online(is_healthy))?;
//!
//! // Synchronous read, no network round trip.
//! let snapshot = monitor.get_current_health();
//!
//! // Before discarding the connection.
//! monitor.stop();
//! ```
//!
//! [`HealthMonitorParams`] can be flattened into a `clap` CLI to configure the monitor from flags or
//! `NURTURE_HEARTBEAT_*` environment variables.

mod ack;
pub mod config;
pub mod error;
pub mod metrics;
mod monitor;
mod params;

#[cfg(test)]
mod tests;

pub use config::HealthMonitorConfig;
pub use error::HealthMonitorError;
pub use monitor::{HealthCallback, HealthMonitor, HealthSnapshot, MonitorState};
pub use params::HealthMonitorParams;
