//! In-process [RealtimeConnection] for tests.

use crate::{ConnectionError, ConnectionState, HandlerId, RealtimeConnection, SignalHandler};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A connection that lives entirely in memory. Tests drive the remote peer by hand: [FakeConnection::push]
/// delivers an inbound signal, [FakeConnection::fail_invocations] makes invocations error out and
/// [FakeConnection::set_latency] makes them hang for a while (use with a paused tokio clock).
///
/// Several handlers may be registered for the same signal, all of them are called.
pub struct FakeConnection {
    state: Mutex<ConnectionState>,
    handlers: Mutex<HashMap<String, Vec<(HandlerId, SignalHandler)>>>,
    next_handler_id: AtomicU64,
    invocations: Mutex<HashMap<String, usize>>,
    failure: Mutex<Option<String>>,
    latency: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for FakeConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeConnection {
    /// Creates a connection in the [ConnectionState::Connected] state, answering invocations instantly.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ConnectionState::Connected),
            handlers: Default::default(),
            next_handler_id: AtomicU64::new(1),
            invocations: Default::default(),
            failure: Mutex::new(None),
            latency: Mutex::new(Duration::ZERO),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.lock().expect("Poisoned lock") = state;
    }

    /// Every following invocation fails with [ConnectionError::Invocation].
    pub fn fail_invocations(&self, reason: impl Into<String>) {
        *self.failure.lock().expect("Poisoned lock") = Some(reason.into());
    }

    pub fn succeed_invocations(&self) {
        *self.failure.lock().expect("Poisoned lock") = None;
    }

    /// Every following invocation waits `latency` before replying.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().expect("Poisoned lock") = latency;
    }

    /// Delivers the inbound `signal` to every handler registered for it. Returns how many handlers were called.
    pub fn push(&self, signal: &str) -> usize {
        // Handlers are cloned out so that they may (un)register handlers themselves.
        let handlers: Vec<SignalHandler> = self
            .handlers
            .lock()
            .expect("Poisoned lock")
            .get(signal)
            .map(|handlers| handlers.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn handler_count(&self, signal: &str) -> usize {
        self.handlers.lock().expect("Poisoned lock").get(signal).map_or(0, Vec::len)
    }

    /// Number of times `method` was invoked, whatever the outcome.
    pub fn invocation_count(&self, method: &str) -> usize {
        self.invocations.lock().expect("Poisoned lock").get(method).copied().unwrap_or(0)
    }

    /// Invocations currently awaiting their reply.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of invocations that were ever awaiting their reply at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight counter even if the invocation future is dropped before completing.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RealtimeConnection for FakeConnection {
    fn state(&self) -> ConnectionState {
        *self.state.lock().expect("Poisoned lock")
    }

    async fn invoke(&self, method: &str) -> Result<(), ConnectionError> {
        *self.invocations.lock().expect("Poisoned lock").entry(method.to_string()).or_insert(0) += 1;
        let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);

        let latency = *self.latency.lock().expect("Poisoned lock");
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let state = self.state();
        if !state.is_connected() {
            return Err(ConnectionError::NotConnected(state));
        }
        if let Some(reason) = self.failure.lock().expect("Poisoned lock").clone() {
            return Err(ConnectionError::Invocation { method: method.to_string(), reason });
        }
        Ok(())
    }

    fn register_handler(&self, signal: &str, handler: SignalHandler) -> HandlerId {
        let id = HandlerId::new(self.next_handler_id.fetch_add(1, Ordering::SeqCst));
        self.handlers.lock().expect("Poisoned lock").entry(signal.to_string()).or_default().push((id, handler));
        id
    }

    fn unregister_handler(&self, signal: &str, id: HandlerId) {
        let mut handlers = self.handlers.lock().expect("Poisoned lock");
        if let Some(registered) = handlers.get_mut(signal) {
            registered.retain(|(registered_id, _)| *registered_id != id);
            if registered.is_empty() {
                handlers.remove(signal);
            }
        }
    }
}
