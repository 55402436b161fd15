//! Action router bridging the dispatch pipeline and the socket.
//!
//! The router is a single middleware stage. Outbound, every action passing
//! through it is tested against the criterion: matches are handed to the
//! send strategy with the bound emit capability, everything else flows on
//! to the next stage untouched. Inbound, mounting the router subscribes a
//! handler per configured event name that synthesizes an action from the
//! event payload and dispatches it.

use crate::action::{Action, ON_ACTION_PREFIX};
use crate::criterion::Criterion;
use crate::pipeline::{Dispatch, DispatchError, Middleware, Next};
use fluxbridge_socket::{EventSocket, SocketError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The emit capability, bound once to a socket instance at router
/// construction. Represents "send a named event with a payload to the
/// remote peer".
#[derive(Clone)]
pub struct Emit {
    socket: Arc<dyn EventSocket>,
}

impl Emit {
    fn bind(socket: Arc<dyn EventSocket>) -> Self {
        Self { socket }
    }

    /// Send a named event with a payload to the remote peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot deliver the event.
    pub fn send(&self, event: &str, payload: Value) -> Result<(), SocketError> {
        self.socket.emit(event, payload)
    }
}

/// The send strategy invoked for every matched action.
pub trait SendStrategy: Send + Sync {
    /// Send a matched action to the remote peer.
    ///
    /// The strategy owns the rest of the action's journey: it may forward
    /// the action through `next`, dispatch follow-up actions, or consume
    /// it entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if sending or anything downstream fails.
    fn execute(
        &self,
        action: Action,
        emit: &Emit,
        next: Next<'_>,
        dispatch: &dyn Dispatch,
    ) -> Result<Action, DispatchError>;
}

/// The default send strategy.
///
/// Emits `action.event` with `action.data` to the socket, then forwards
/// the original action downstream — a routed action reaches both the
/// remote peer and the local pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSend;

impl SendStrategy for DefaultSend {
    fn execute(
        &self,
        action: Action,
        emit: &Emit,
        next: Next<'_>,
        _dispatch: &dyn Dispatch,
    ) -> Result<Action, DispatchError> {
        let Some(event) = action.event().map(str::to_owned) else {
            return Err(DispatchError::MissingEvent(
                action.kind().unwrap_or_default().to_string(),
            ));
        };

        let data = action.data().cloned().unwrap_or(Value::Null);
        emit.send(&event, data)?;
        next(action)
    }
}

/// Router configuration.
#[derive(Clone)]
pub struct RouterConfig {
    /// Event names to subscribe to on the socket.
    pub events: Vec<String>,
    /// Prefix naming actions synthesized from inbound events.
    pub action_prefix: String,
    /// Strategy invoked for matched actions.
    pub execute: Arc<dyn SendStrategy>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            events: vec!["connect".to_string()],
            action_prefix: ON_ACTION_PREFIX.to_string(),
            execute: Arc::new(DefaultSend),
        }
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("events", &self.events)
            .field("action_prefix", &self.action_prefix)
            .finish_non_exhaustive()
    }
}

/// The action router.
///
/// Constructed once per connection. The criterion, configuration, and
/// bound emit capability are written here and read-only afterwards; each
/// per-action decision is a pure function of them.
pub struct ActionRouter {
    socket: Arc<dyn EventSocket>,
    emit: Emit,
    criterion: Criterion,
    config: RouterConfig,
}

impl ActionRouter {
    /// Create a router with the default criterion and configuration.
    #[must_use]
    pub fn new(socket: Arc<dyn EventSocket>) -> Self {
        Self::with_config(socket, Criterion::default(), RouterConfig::default())
    }

    /// Create a router with a custom criterion.
    #[must_use]
    pub fn with_criterion(socket: Arc<dyn EventSocket>, criterion: impl Into<Criterion>) -> Self {
        Self::with_config(socket, criterion, RouterConfig::default())
    }

    /// Create a router with a custom criterion and configuration.
    #[must_use]
    pub fn with_config(
        socket: Arc<dyn EventSocket>,
        criterion: impl Into<Criterion>,
        config: RouterConfig,
    ) -> Self {
        Self {
            emit: Emit::bind(socket.clone()),
            socket,
            criterion: criterion.into(),
            config,
        }
    }

    /// The criterion this router matches against.
    #[must_use]
    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }
}

impl Middleware for ActionRouter {
    fn install(&self, dispatch: Arc<dyn Dispatch>) {
        for event in &self.config.events {
            let dispatch = dispatch.clone();
            let prefix = self.config.action_prefix.clone();
            let event_name = event.clone();

            self.socket.on(
                event,
                Arc::new(move |payload| {
                    let action = Action::synthesized(&prefix, &event_name, payload);
                    // Handlers cannot surface errors to the transport.
                    if let Err(error) = dispatch.dispatch(action) {
                        warn!(event = %event_name, %error, "Inbound dispatch failed");
                    }
                }),
            );

            debug!(event = %event, "Subscribed to inbound socket event");
        }
    }

    fn handle(
        &self,
        action: Action,
        next: Next<'_>,
        dispatch: &dyn Dispatch,
    ) -> Result<Action, DispatchError> {
        if self.criterion.matches(&action) {
            trace!(kind = action.kind().unwrap_or_default(), "Routing action to socket");
            self.config.execute.execute(action, &self.emit, next, dispatch)
        } else {
            next(action)
        }
    }
}
