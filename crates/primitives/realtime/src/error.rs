use crate::ConnectionState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Connection is not connected (current state: {0})")]
    NotConnected(ConnectionState),

    #[error("Invocation of `{method}` timed out")]
    Timeout { method: String },

    #[error("Invocation of `{method}` failed: {reason}")]
    Invocation { method: String, reason: String },

    #[error("Connection closed: {0}")]
    Closed(String),

    #[error("{0}")]
    Other(String),
}

impl ConnectionError {
    /// Short label used in log lines and metric attributes.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotConnected(_) => "not connected",
            Self::Timeout { .. } => "timeout",
            Self::Invocation { .. } => "invocation failed",
            Self::Closed(_) => "connection closed",
            Self::Other(_) => "unknown error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_connected(ConnectionError::NotConnected(ConnectionState::Reconnecting), "not connected")]
    #[case::timeout(ConnectionError::Timeout { method: "Ping".into() }, "timeout")]
    #[case::invocation(
        ConnectionError::Invocation { method: "Ping".into(), reason: "hub method not found".into() },
        "invocation failed"
    )]
    #[case::closed(ConnectionError::Closed("server went away".into()), "connection closed")]
    fn test_error_reason(#[case] error: ConnectionError, #[case] expected: &str) {
        assert_eq!(error.reason(), expected);
    }

    #[test]
    fn test_error_display() {
        let error = ConnectionError::NotConnected(ConnectionState::Reconnecting);
        assert_eq!(error.to_string(), "Connection is not connected (current state: reconnecting)");

        let error = ConnectionError::Timeout { method: "Ping".into() };
        assert_eq!(error.to_string(), "Invocation of `Ping` timed out");
    }
}
