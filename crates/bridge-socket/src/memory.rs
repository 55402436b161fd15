//! In-memory socket pair.
//!
//! A linked pair of endpoints where emitting on one side invokes the
//! handlers subscribed on the other, inline. This is the reference
//! transport for tests and for hosts that wire both ends in-process.

use crate::traits::{EventHandler, EventSocket, SocketError};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Per-endpoint handler registry.
#[derive(Default)]
struct Registry {
    handlers: DashMap<String, Vec<EventHandler>>,
}

impl Registry {
    fn subscribe(&self, event: &str, handler: EventHandler) {
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    fn deliver(&self, event: &str, payload: &Value) -> usize {
        // Clone the handler list out of the map so delivery runs without
        // holding the shard lock; a handler may re-enter the registry.
        let handlers: Vec<EventHandler> = self
            .handlers
            .get(event)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        for handler in &handlers {
            handler.as_ref()(payload.clone());
        }
        handlers.len()
    }
}

/// One endpoint of an in-memory socket pair.
///
/// Both endpoints share a closed flag; closing the link makes further
/// emissions from either side fail.
#[derive(Clone)]
pub struct MemorySocket {
    local: Arc<Registry>,
    peer: Arc<Registry>,
    closed: Arc<AtomicBool>,
}

impl MemorySocket {
    /// Create a linked pair of sockets.
    ///
    /// Events emitted on the first endpoint are delivered to handlers
    /// subscribed on the second, and vice versa.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let a = Arc::new(Registry::default());
        let b = Arc::new(Registry::default());
        let closed = Arc::new(AtomicBool::new(false));

        (
            Self {
                local: a.clone(),
                peer: b.clone(),
                closed: closed.clone(),
            },
            Self {
                local: b,
                peer: a,
                closed,
            },
        )
    }

    /// Close the link. Affects both endpoints.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Check whether the link is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    /// Number of handlers the local endpoint has subscribed for an event.
    #[must_use]
    pub fn handler_count(&self, event: &str) -> usize {
        self.local
            .handlers
            .get(event)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}

impl EventSocket for MemorySocket {
    fn on(&self, event: &str, handler: EventHandler) {
        self.local.subscribe(event, handler);
    }

    fn emit(&self, event: &str, payload: Value) -> Result<(), SocketError> {
        if !self.is_open() {
            return Err(SocketError::Closed);
        }

        let delivered = self.peer.deliver(event, &payload);
        trace!(event = %event, recipients = delivered, "Delivered in-memory event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_pair_delivery() {
        let (local, remote) = MemorySocket::pair();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = received.clone();
        remote.on(
            "ping",
            Arc::new(move |payload| sink.lock().unwrap().push(payload)),
        );

        local.emit("ping", json!(1)).unwrap();
        local.emit("ping", json!(2)).unwrap();

        assert_eq!(*received.lock().unwrap(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_delivery_is_directional() {
        let (local, remote) = MemorySocket::pair();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = received.clone();
        local.on(
            "ping",
            Arc::new(move |payload| sink.lock().unwrap().push(payload)),
        );

        // The local handler must not see the local emission.
        local.emit("ping", json!("out")).unwrap();
        assert!(received.lock().unwrap().is_empty());

        remote.emit("ping", json!("in")).unwrap();
        assert_eq!(*received.lock().unwrap(), vec![json!("in")]);
    }

    #[test]
    fn test_multiple_handlers() {
        let (local, remote) = MemorySocket::pair();
        let count = Arc::new(Mutex::new(0));

        for _ in 0..3 {
            let count = count.clone();
            remote.on(
                "tick",
                Arc::new(move |_| *count.lock().unwrap() += 1),
            );
        }
        assert_eq!(remote.handler_count("tick"), 3);

        local.emit("tick", Value::Null).unwrap();
        assert_eq!(*count.lock().unwrap(), 3);
    }

    #[test]
    fn test_emit_without_handlers() {
        let (local, _remote) = MemorySocket::pair();
        assert!(local.emit("nobody-listens", json!("hello")).is_ok());
    }

    #[test]
    fn test_emit_after_close() {
        let (local, remote) = MemorySocket::pair();
        local.close();

        assert!(!remote.is_open());
        assert!(matches!(
            local.emit("ping", Value::Null),
            Err(SocketError::Closed)
        ));
        assert!(matches!(
            remote.emit("ping", Value::Null),
            Err(SocketError::Closed)
        ));
    }

    #[test]
    fn test_handler_can_emit_back() {
        let (local, remote) = MemorySocket::pair();
        let received = Arc::new(Mutex::new(Vec::new()));

        let echo = remote.clone();
        remote.on(
            "ping",
            Arc::new(move |payload| {
                echo.emit("pong", payload).unwrap();
            }),
        );

        let sink = received.clone();
        local.on(
            "pong",
            Arc::new(move |payload| sink.lock().unwrap().push(payload)),
        );

        local.emit("ping", json!(42)).unwrap();
        assert_eq!(*received.lock().unwrap(), vec![json!(42)]);
    }
}
