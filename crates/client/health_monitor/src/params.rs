use crate::config::{HealthMonitorConfig, DEFAULT_ACK_SIGNAL, DEFAULT_PROBE_METHOD};
use clap::Args;
use np_utils::parsers::parse_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters used to configure the realtime channel heartbeat, meant to be flattened into the host binary's CLI.
#[derive(Debug, Clone, Args, Deserialize, Serialize)]
pub struct HealthMonitorParams {
    /// How often a heartbeat probe is sent over the realtime channel.
    /// Accepts `ms`, `s`, `min` and `h` suffixes.
    #[arg(
        env = "NURTURE_HEARTBEAT_INTERVAL",
        long,
        default_value = "30s",
        value_parser = parse_duration,
        value_name = "DURATION"
    )]
    pub heartbeat_interval: Duration,

    /// How long without an acknowledgment before the channel is reported unhealthy.
    /// Should be at least twice the heartbeat interval.
    #[arg(
        env = "NURTURE_HEARTBEAT_STALE_THRESHOLD",
        long,
        default_value = "60s",
        value_parser = parse_duration,
        value_name = "DURATION"
    )]
    pub heartbeat_stale_threshold: Duration,

    /// Remote procedure invoked as a probe.
    #[arg(env = "NURTURE_HEARTBEAT_PROBE_METHOD", long, default_value = DEFAULT_PROBE_METHOD)]
    pub heartbeat_probe_method: String,

    /// Inbound signal counted as an acknowledgment.
    #[arg(env = "NURTURE_HEARTBEAT_ACK_SIGNAL", long, default_value = DEFAULT_ACK_SIGNAL)]
    pub heartbeat_ack_signal: String,
}

impl Default for HealthMonitorParams {
    fn default() -> Self {
        let config = HealthMonitorConfig::default();
        Self {
            heartbeat_interval: config.probe_interval(),
            heartbeat_stale_threshold: config.stale_threshold(),
            heartbeat_probe_method: config.probe_method,
            heartbeat_ack_signal: config.ack_signal,
        }
    }
}

impl HealthMonitorParams {
    pub fn as_config(&self) -> HealthMonitorConfig {
        HealthMonitorConfig {
            probe_interval_ms: duration_to_millis(self.heartbeat_interval),
            stale_threshold_ms: duration_to_millis(self.heartbeat_stale_threshold),
            probe_method: self.heartbeat_probe_method.clone(),
            ack_signal: self.heartbeat_ack_signal.clone(),
        }
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        heartbeat: HealthMonitorParams,
    }

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let cli = TestCli::parse_from(["nurture"]);
        assert_eq!(cli.heartbeat.as_config(), HealthMonitorConfig::default());
        assert_eq!(HealthMonitorParams::default().as_config(), HealthMonitorConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = TestCli::parse_from([
            "nurture",
            "--heartbeat-interval",
            "500ms",
            "--heartbeat-stale-threshold",
            "2min",
            "--heartbeat-probe-method",
            "Heartbeat",
            "--heartbeat-ack-signal",
            "HeartbeatAck",
        ]);

        let config = cli.heartbeat.as_config();
        assert_eq!(config.probe_interval(), Duration::from_millis(500));
        assert_eq!(config.stale_threshold(), Duration::from_secs(120));
        assert_eq!(config.probe_method, "Heartbeat");
        assert_eq!(config.ack_signal, "HeartbeatAck");
    }

    #[test]
    fn test_cli_rejects_bad_duration() {
        assert!(TestCli::try_parse_from(["nurture", "--heartbeat-interval", "30"]).is_err());
        assert!(TestCli::try_parse_from(["nurture", "--heartbeat-interval", "thirty seconds"]).is_err());
        assert!(TestCli::try_parse_from(["nurture", "--heartbeat-stale-threshold", "307445734561825861min"]).is_err());
    }
}
