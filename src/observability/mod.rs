//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, exec, net
//!     → tracing macros with structured fields
//!     → logging.rs (EnvFilter + fmt layer on stderr, text or JSON)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so stdout stays free for command output
//! - `RUST_LOG` overrides the default filter

pub mod logging;
