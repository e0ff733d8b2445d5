use crate::ack::AckClock;
use crate::config::HealthMonitorConfig;
use crate::error::HealthMonitorError;
use crate::metrics::HealthMonitorMetrics;
use np_realtime::{RealtimeConnection, Subscription};
use np_utils::{format_duration, AbortOnDrop};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Receives the verdict of every completed probe cycle.
pub type HealthCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Instantaneous view of the connection health, computed without any network round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub is_healthy: bool,
    pub last_ack_age: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Dormant,
    Monitoring,
}

/// Everything owned by a running monitor. Dropping it cancels the probe loop, aborts its task and deregisters
/// the acknowledgment listener, in that order.
struct ProbeTask<C: RealtimeConnection + ?Sized> {
    cancellation_token: CancellationToken,
    _task: AbortOnDrop<()>,
    _ack_subscription: Subscription<C>,
}

impl<C: RealtimeConnection + ?Sized> Drop for ProbeTask<C> {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

/// Application-level heartbeat for a long-lived realtime connection.
///
/// While running, the monitor invokes the probe method every probe interval and listens for the acknowledgment
/// signal. Each completed cycle yields one boolean verdict: `false` if the probe itself failed, otherwise whether
/// the last acknowledgment is younger than the stale threshold. Any acknowledgment counts, it does not have to
/// answer a specific probe.
///
/// The monitor never opens, closes or reconnects the connection, and only one monitor should be attached to a
/// given connection. Put it in an [Arc] to call [HealthMonitor::stop] from inside the health callback.
pub struct HealthMonitor<C: RealtimeConnection + ?Sized> {
    connection: Arc<C>,
    config: HealthMonitorConfig,
    ack: Arc<AckClock>,
    metrics: Arc<HealthMonitorMetrics>,
    running: Mutex<Option<ProbeTask<C>>>,
}

impl<C: RealtimeConnection + ?Sized> fmt::Debug for HealthMonitor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthMonitor").field("config", &self.config).field("state", &self.state()).finish()
    }
}

impl<C: RealtimeConnection + ?Sized> HealthMonitor<C> {
    pub fn new(connection: Arc<C>, config: HealthMonitorConfig) -> Result<Self, HealthMonitorError> {
        config.validate()?;
        if config.stale_threshold() < config.probe_interval() {
            tracing::warn!(
                "Heartbeat stale threshold ({}) is shorter than the probe interval ({}), most verdicts will be unhealthy",
                format_duration(config.stale_threshold()),
                format_duration(config.probe_interval())
            );
        }

        Ok(Self {
            connection,
            config,
            ack: Arc::new(AckClock::new()),
            metrics: Arc::new(HealthMonitorMetrics::register()),
            running: Mutex::new(None),
        })
    }

    pub fn with_defaults(connection: Arc<C>) -> Self {
        Self {
            connection,
            config: HealthMonitorConfig::default(),
            ack: Arc::new(AckClock::new()),
            metrics: Arc::new(HealthMonitorMetrics::register()),
            running: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &HealthMonitorConfig {
        &self.config
    }

    pub fn state(&self) -> MonitorState {
        if self.running.lock().expect("Poisoned lock").is_some() {
            MonitorState::Monitoring
        } else {
            MonitorState::Dormant
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Monitoring
    }

    /// Starts probing the connection, reporting every verdict to `on_health_change`.
    ///
    /// Starting counts as a fresh acknowledgment. Calling this on a running monitor does nothing, the callback
    /// passed the second time is discarded.
    pub fn start(&self, on_health_change: impl Fn(bool) + Send + Sync + 'static) -> Result<(), HealthMonitorError> {
        let mut running = self.running.lock().expect("Poisoned lock");
        if running.is_some() {
            tracing::debug!("Heartbeat monitor already running");
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current()?;

        self.ack.record();

        let ack_handler = {
            let ack = Arc::clone(&self.ack);
            let metrics = Arc::clone(&self.metrics);
            Arc::new(move || {
                ack.record();
                metrics.acks_received.add(1, &[]);
            })
        };
        let ack_subscription =
            Subscription::register(Arc::clone(&self.connection), self.config.ack_signal.clone(), ack_handler);

        let cancellation_token = CancellationToken::new();
        let task = runtime.spawn(probe_loop(
            Arc::clone(&self.connection),
            self.config.clone(),
            Arc::clone(&self.ack),
            Arc::clone(&self.metrics),
            Arc::new(on_health_change),
            cancellation_token.clone(),
        ));

        *running = Some(ProbeTask { cancellation_token, _task: task.into(), _ack_subscription: ack_subscription });
        tracing::debug!(
            "🟢 Heartbeat monitor started (probe `{}` every {}, stale after {})",
            self.config.probe_method,
            format_duration(self.config.probe_interval()),
            format_duration(self.config.stale_threshold())
        );
        Ok(())
    }

    /// Stops probing and deregisters the acknowledgment listener. No new probe cycle starts and an in-flight probe
    /// is dropped without a verdict.
    ///
    /// Safe to call when not running, from inside the health callback, or from any other task or thread. On a
    /// multi-threaded runtime, a verdict whose delivery had already begun on another thread when `stop` was called
    /// may still reach the callback after `stop` returns. It is the last one.
    pub fn stop(&self) {
        // Taken out of the lock first: tearing down calls into the connection.
        let task = self.running.lock().expect("Poisoned lock").take();
        if let Some(task) = task {
            drop(task);
            tracing::debug!("Heartbeat monitor stopped");
        }
    }

    /// Health derived from the age of the last acknowledgment, without probing.
    pub fn get_current_health(&self) -> HealthSnapshot {
        let last_ack_age = self.ack.age();
        HealthSnapshot { is_healthy: last_ack_age < self.config.stale_threshold(), last_ack_age }
    }

    pub fn last_ack_age(&self) -> Duration {
        self.ack.age()
    }
}

async fn probe_loop<C: RealtimeConnection + ?Sized>(
    connection: Arc<C>,
    config: HealthMonitorConfig,
    ack: Arc<AckClock>,
    metrics: Arc<HealthMonitorMetrics>,
    on_health_change: HealthCallback,
    cancellation_token: CancellationToken,
) {
    let period = config.probe_interval();
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let cycle_start = Instant::now();
        let verdict = tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            verdict = probe_once(connection.as_ref(), &config, &ack, &metrics) => verdict,
        };

        // A probe that outlived the interval must not be followed by the ticks it missed.
        if cycle_start.elapsed() >= period {
            interval.reset();
        }

        if let Some(is_healthy) = verdict {
            // Best effort: a concurrent stop() can still land between this check and the call.
            if cancellation_token.is_cancelled() {
                break;
            }
            on_health_change(is_healthy);
        }
    }

    tracing::trace!("Heartbeat probe loop exited");
}

/// Runs one probe cycle. Returns `None` when the cycle was skipped because the transport is not connected.
pub(crate) async fn probe_once<C: RealtimeConnection + ?Sized>(
    connection: &C,
    config: &HealthMonitorConfig,
    ack: &AckClock,
    metrics: &HealthMonitorMetrics,
) -> Option<bool> {
    let state = connection.state();
    if !state.is_connected() {
        tracing::trace!("Skipping heartbeat probe, connection is {state}");
        metrics.probes_skipped.add(1, &[]);
        return None;
    }

    let start = Instant::now();
    metrics.probes_sent.add(1, &[]);
    if let Err(err) = connection.invoke(&config.probe_method).await {
        tracing::warn!("🔴 Heartbeat probe `{}` failed ({}): {err}", config.probe_method, err.reason());
        metrics.probe_failures.add(1, &[]);
        metrics.healthy.record(0, &[]);
        return Some(false);
    }
    metrics.probe_latency.record(start.elapsed().as_secs_f64(), &[]);

    let age = ack.age();
    let is_healthy = age < config.stale_threshold();
    metrics.last_ack_age_ms.record(u64::try_from(age.as_millis()).unwrap_or(u64::MAX), &[]);
    metrics.healthy.record(is_healthy as u64, &[]);

    if is_healthy {
        tracing::trace!("Heartbeat probe succeeded, last acknowledgment {} ago", format_duration(age));
    } else {
        tracing::warn!(
            "🟡 No heartbeat acknowledgment for {} (stale after {})",
            format_duration(age),
            format_duration(config.stale_threshold())
        );
    }
    Some(is_healthy)
}
