//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator health check connects
//!     → listener.rs (accept loop on 0.0.0.0:<readiness_port>)
//!     → connection.rs (id + guard for the connection's short lifetime)
//!     → read at most 64 bytes, discard, close
//!
//! Listener States:
//!     Unbound → Bound → Accepting (loop, never exits on its own)
//! ```
//!
//! # Design Decisions
//! - The listener only makes the port connectable; nothing is ever written
//! - Connections are handled inline in the accept loop
//! - A failed read or accept is logged and the loop keeps going
//! - Bind failure is fatal and surfaced to the caller, never retried

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{
    readiness, ListenerError, ListenerOptions, ReadinessListener, DISCARD_READ_LIMIT,
};
