use crate::{HealthMonitor, HealthMonitorConfig};
use np_realtime::testing::FakeConnection;
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::Instant;


pub(crate) const PROBE_INTERVAL: Duration = Duration::from_secs(30);
pub(crate) const STALE_THRESHOLD: Duration = Duration::from_secs(60);

/// A verdict and the time it was delivered at, relative to when the recorder was created.
pub(crate) type Verdict = (bool, Duration);

#[fixture]
pub(crate) fn connection() -> Arc<FakeConnection> {
    Arc::new(FakeConnection::new())
}

pub(crate) fn monitor(connection: &Arc<FakeConnection>) -> HealthMonitor<FakeConnection> {
    HealthMonitor::new(Arc::clone(connection), HealthMonitorConfig::default()).expect("Valid default config")
}

/// Health callback forwarding every verdict into a channel, timestamped against the tokio clock.
pub(crate) fn verdict_recorder() -> (impl Fn(bool) + Send + Sync + 'static, UnboundedReceiver<Verdict>) {
    let (sender, receiver) = unbounded_channel();
    let start = Instant::now();
    let callback = move |is_healthy: bool| {
        let _ = sender.send((is_healthy, start.elapsed()));
    };
    (callback, receiver)
}
