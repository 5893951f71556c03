//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (PYTH, SOL_RPC_HOST, READINESS_PORT, ...)
//!     → loader.rs (lookup, parse numbers, apply defaults)
//!     → DevnetConfig (resolved once, immutable)
//!     → shared via Arc with the command runner and readiness listener
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup; there is no reload path
//! - Every entry falls back to a literal default independently
//! - Derived defaults (keypair paths, RPC URL) follow the resolved values
//!   they are built from
//! - An unparsable number is fatal, never silently defaulted

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::DevnetConfig;
