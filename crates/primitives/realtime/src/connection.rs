use crate::error::ConnectionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;

/// Callback run by the connection's inbound dispatch path whenever the signal it is registered for arrives. It
/// must return quickly and never block.
pub type SignalHandler = Arc<dyn Fn() + Send + Sync>;

/// Identifies one handler registration so that it can be removed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transport-level state of a realtime connection, as reported by the transport itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
    Reconnecting,
}

impl ConnectionState {
    #[inline(always)]
    pub fn is_connected(&self) -> bool {
        self == &ConnectionState::Connected
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Disconnected => "disconnected",
                Self::Connecting => "connecting",
                Self::Connected => "connected",
                Self::Disconnecting => "disconnecting",
                Self::Reconnecting => "reconnecting",
            }
        )
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
/// An already established, bidirectional realtime connection.
///
/// The connection is owned by the caller. Implementations are expected to be thin adapters over the transport:
/// they must not reconnect or retry on their own when one of these methods is called.
///
/// # Listener semantics
///
/// Whether registering two handlers for the same signal keeps both or replaces the first one is up to the
/// transport. Callers that need deterministic delivery should register at most one handler per signal.
#[async_trait]
pub trait RealtimeConnection: Send + Sync + 'static {
    /// Current transport state. Must be cheap and non-blocking.
    fn state(&self) -> ConnectionState;

    /// Invokes the zero-argument remote procedure `method` and waits for the peer's direct reply.
    ///
    /// The only bound on how long this may take is the transport's own invocation timeout.
    async fn invoke(&self, method: &str) -> Result<(), ConnectionError>;

    /// Registers `handler` to be called every time the zero-argument push `signal` is received.
    fn register_handler(&self, signal: &str, handler: SignalHandler) -> HandlerId;

    /// Removes a handler previously returned by [`RealtimeConnection::register_handler`]. Unknown ids are ignored.
    fn unregister_handler(&self, signal: &str, id: HandlerId);
}
