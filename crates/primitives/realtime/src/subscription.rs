use crate::{HandlerId, RealtimeConnection, SignalHandler};
use std::fmt;
use std::sync::Arc;

/// A handler registered on a [RealtimeConnection], removed again when this guard is dropped.
pub struct Subscription<C: RealtimeConnection + ?Sized> {
    connection: Arc<C>,
    signal: String,
    id: HandlerId,
}

impl<C: RealtimeConnection + ?Sized> Subscription<C> {
    pub fn register(connection: Arc<C>, signal: impl Into<String>, handler: SignalHandler) -> Self {
        let signal = signal.into();
        let id = connection.register_handler(&signal, handler);
        tracing::trace!("Registered handler {id} for `{signal}`");
        Self { connection, signal, id }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn signal(&self) -> &str {
        &self.signal
    }
}

impl<C: RealtimeConnection + ?Sized> fmt::Debug for Subscription<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("signal", &self.signal).field("id", &self.id).finish()
    }
}

impl<C: RealtimeConnection + ?Sized> Drop for Subscription<C> {
    fn drop(&mut self) {
        self.connection.unregister_handler(&self.signal, self.id);
        tracing::trace!("Unregistered handler {} for `{}`", self.id, self.signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnection;
    use crate::MockRealtimeConnection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscription_unregisters_on_drop() {
        let connection = Arc::new(FakeConnection::new());
        let received = Arc::new(AtomicUsize::new(0));

        let subscription = {
            let received = Arc::clone(&received);
            Subscription::register(
                Arc::clone(&connection),
                "Pong",
                Arc::new(move || {
                    received.fetch_add(1, Ordering::SeqCst);
                }),
            )
        };
        assert_eq!(subscription.signal(), "Pong");
        assert_eq!(connection.handler_count("Pong"), 1);

        assert_eq!(connection.push("Pong"), 1);
        assert_eq!(received.load(Ordering::SeqCst), 1);

        drop(subscription);
        assert_eq!(connection.handler_count("Pong"), 0);
        assert_eq!(connection.push("Pong"), 0);
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_works_with_trait_objects() {
        let mut mock = MockRealtimeConnection::new();
        mock.expect_register_handler().times(1).returning(|_, _| HandlerId::new(7));
        mock.expect_unregister_handler().withf(|_, id| *id == HandlerId::new(7)).times(1).return_const(());

        let connection: Arc<dyn RealtimeConnection> = Arc::new(mock);
        let subscription = Subscription::register(connection, "Pong", Arc::new(|| {}));
        assert_eq!(subscription.id(), HandlerId::new(7));
    }
}
