//! # fluxbridge-core
//!
//! Action routing between a unidirectional dispatch pipeline and a
//! bidirectional event socket.
//!
//! This crate provides the building blocks:
//!
//! - **Action** - Tagged data record flowing through the pipeline
//! - **Criterion** - Matching rule selecting which actions leave for the socket
//! - **ActionRouter** - The middleware stage doing the bridging
//! - **Pipeline** - Minimal middleware chain ending in a sink
//!
//! ## Architecture
//!
//! ```text
//!                 outbound (matched actions)
//! ┌──────────┐     ┌──────────────┐     ┌──────────┐
//! │ Dispatch │────▶│ ActionRouter │────▶│  Socket  │
//! └──────────┘     └──────────────┘     └──────────┘
//!       ▲                 │ inbound (synthesized actions)
//!       └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fluxbridge_core::{Action, ActionRouter, Dispatch, Pipeline};
//! use fluxbridge_socket::MemorySocket;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let (local, _remote) = MemorySocket::pair();
//! let router = ActionRouter::new(Arc::new(local));
//! let pipeline = Pipeline::build(vec![Arc::new(router)], |action| action);
//!
//! let action = Action::new("SOCKET_IO_EMIT/chat")
//!     .with_event("chat")
//!     .with_data(json!({ "text": "hi" }));
//! pipeline.dispatch(action).unwrap();
//! ```

pub mod action;
pub mod criterion;
pub mod pipeline;
pub mod router;

pub use action::{Action, EMIT_ACTION_PREFIX, ON_ACTION_PREFIX};
pub use criterion::{Criterion, Predicate};
pub use pipeline::{Dispatch, DispatchError, Middleware, Next, Pipeline};
pub use router::{ActionRouter, DefaultSend, Emit, RouterConfig, SendStrategy};
