//! Capability interface for the bidirectional realtime channel used to push notifications to the application.
//!
//! Nothing in here opens, authenticates or reconnects a channel: that is the transport's job. Consumers only get
//! to do four things with an already established connection:
//!
//! - read its [`ConnectionState`],
//! - invoke a named remote procedure and await the peer's direct reply ([`RealtimeConnection::invoke`]),
//! - register a handler for a named inbound push signal ([`RealtimeConnection::register_handler`]),
//! - deregister that handler again ([`RealtimeConnection::unregister_handler`]).
//!
//! Handler registration is usually done through a [`Subscription`], which deregisters on drop so that a listener
//! cannot outlive its owner.
//!
//! With the `testing` feature, [`testing::FakeConnection`] provides an in-process connection and
//! `MockRealtimeConnection` a [mockall] mock of the trait.

mod connection;
pub mod error;
mod subscription;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(any(test, feature = "testing"))]
pub use connection::MockRealtimeConnection;
pub use connection::{ConnectionState, HandlerId, RealtimeConnection, SignalHandler};
pub use error::ConnectionError;
pub use subscription::Subscription;
