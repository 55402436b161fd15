//! Socket abstraction traits.
//!
//! These traits define the interface an event-based transport must provide,
//! allowing the router to be transport-agnostic.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// A subscribed event handler.
///
/// Handlers are invoked inline in whatever context the transport delivers
/// events, one invocation per received event.
pub type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Socket errors.
#[derive(Debug, Error)]
pub enum SocketError {
    /// The socket was closed.
    #[error("Socket closed")]
    Closed,

    /// Failed to send an event.
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// A bidirectional event socket.
///
/// Sockets expose two capabilities: subscribing a handler to a named event
/// sent by the remote peer, and emitting a named event with a payload to
/// the remote peer. Subscriptions persist for the life of the socket; there
/// is no unsubscribe path.
pub trait EventSocket: Send + Sync {
    /// Subscribe a handler to an event sent by the remote peer.
    fn on(&self, event: &str, handler: EventHandler);

    /// Emit a named event with a payload to the remote peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot deliver the event.
    fn emit(&self, event: &str, payload: Value) -> Result<(), SocketError>;
}
