//! OpenTelemetry metrics for the realtime channel heartbeat.

use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};

/// Metrics for heartbeat probes and acknowledgments.
pub struct HealthMonitorMetrics {
    /// Probes sent over the connection
    pub probes_sent: Counter<u64>,

    /// Probes whose invocation failed
    pub probe_failures: Counter<u64>,

    /// Probe cycles skipped because the transport was not connected
    pub probes_skipped: Counter<u64>,

    /// Acknowledgments received from the peer
    pub acks_received: Counter<u64>,

    /// Round-trip latency of successful probes (seconds)
    pub probe_latency: Histogram<f64>,

    /// Age of the last acknowledgment when the last verdict was computed
    pub last_ack_age_ms: Gauge<u64>,

    /// Last verdict, 1 when healthy and 0 otherwise
    pub healthy: Gauge<u64>,
}

impl HealthMonitorMetrics {
    /// Register metrics with the global meter provider.
    pub fn register() -> Self {
        let meter = opentelemetry::global::meter("nurture.health_monitor");
        Self::register_with_meter(&meter)
    }

    /// Register metrics with a specific meter (useful for testing).
    pub fn register_with_meter(meter: &Meter) -> Self {
        Self {
            probes_sent: meter
                .u64_counter("health_monitor_probes_sent")
                .with_description("Heartbeat probes sent over the realtime channel")
                .build(),
            probe_failures: meter
                .u64_counter("health_monitor_probe_failures")
                .with_description("Heartbeat probes whose invocation failed")
                .build(),
            probes_skipped: meter
                .u64_counter("health_monitor_probes_skipped")
                .with_description("Probe cycles skipped while the transport was not connected")
                .build(),
            acks_received: meter
                .u64_counter("health_monitor_acks_received")
                .with_description("Heartbeat acknowledgments received from the peer")
                .build(),
            probe_latency: meter
                .f64_histogram("health_monitor_probe_latency_seconds")
                .with_description("Heartbeat probe round-trip latency in seconds")
                .with_unit("s")
                .build(),
            last_ack_age_ms: meter
                .u64_gauge("health_monitor_last_ack_age_ms")
                .with_description("Age of the last heartbeat acknowledgment")
                .with_unit("ms")
                .build(),
            healthy: meter
                .u64_gauge("health_monitor_healthy")
                .with_description("Whether the realtime channel was last reported healthy")
                .build(),
        }
    }
}
