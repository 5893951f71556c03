//! Command execution subsystem.
//!
//! # Data Flow
//! ```text
//! caller (driver binary, setup code)
//!     → pyth.rs / solana.rs (compose CLI argument lists from DevnetConfig)
//!     → runner.rs (spawn, capture stdout/stderr, log outcome)
//!     → Ok(CommandOutput) | Err(CommandError)
//!     → top-level driver decides whether the process exits
//! ```
//!
//! # Design Decisions
//! - Execution is blocking; async callers go through `spawn_blocking`
//! - The runner never terminates the process itself: fail-fast failures
//!   come back as `CommandError`, carrying the exit code to use
//! - Output is captured as text, decoded lossily

pub mod pyth;
pub mod runner;
pub mod solana;

pub use pyth::{pyth_command, pyth_run_or_die, PythFlags};
pub use runner::{
    format_command, run_or_die, run_or_die_async, CommandError, CommandOutput, RunOptions,
};
pub use solana::{sol_command, sol_run_or_die, SOLANA_CLI};
