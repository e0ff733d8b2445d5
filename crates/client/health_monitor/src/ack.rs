use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Time of the most recent acknowledgment, stored as nanoseconds since `epoch` so that it fits a single atomic.
///
/// Written from the connection's inbound dispatch path and read from the probe task without any lock. Writes go
/// through `fetch_max`: the recorded time never moves backwards, whatever the interleaving.
#[derive(Debug)]
pub(crate) struct AckClock {
    epoch: Instant,
    last_ack_nanos: AtomicU64,
}

impl AckClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now(), last_ack_nanos: AtomicU64::new(0) }
    }

    pub fn record(&self) {
        self.record_at(Instant::now());
    }

    pub fn record_at(&self, at: Instant) {
        let nanos = u64::try_from(at.saturating_duration_since(self.epoch).as_nanos()).unwrap_or(u64::MAX);
        self.last_ack_nanos.fetch_max(nanos, Ordering::SeqCst);
    }

    pub fn last_ack(&self) -> Instant {
        self.epoch + Duration::from_nanos(self.last_ack_nanos.load(Ordering::SeqCst))
    }

    /// Time elapsed since the last acknowledgment.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.last_ack())
    }
}
