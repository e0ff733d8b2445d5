use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthMonitorError {
    #[error("Health monitor must be started from within a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Invalid health monitor configuration: {0}")]
    InvalidConfig(String),
}
