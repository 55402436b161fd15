//! # fluxbridge-socket
//!
//! Event-socket capability seam for the Fluxbridge action router.
//!
//! This crate defines the contract an event-based transport must expose to
//! the router — subscribe to named events, emit named events — and an
//! in-memory linked-pair implementation for tests and hosts that need a
//! transport without a network.
//!
//! Connection lifecycle (connect, disconnect, reconnect) is entirely the
//! transport's concern; nothing here manages it.
//!
//! ```rust
//! use fluxbridge_socket::{EventSocket, MemorySocket};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let (local, remote) = MemorySocket::pair();
//! remote.on("greet", Arc::new(|payload| println!("got {payload}")));
//! local.emit("greet", json!({"hello": "world"})).unwrap();
//! ```

pub mod memory;
pub mod traits;

pub use memory::MemorySocket;
pub use traits::{EventHandler, EventSocket, SocketError};
