//! Operational plumbing for a local price-oracle devnet.
//!
//! - [`config`]: environment-sourced settings, resolved once
//! - [`exec`]: oracle CLI / node CLI invocation with fail-fast semantics
//! - [`net`]: TCP readiness listener for orchestrator health checks

pub mod config;
pub mod exec;
pub mod net;
pub mod observability;

pub use config::DevnetConfig;
pub use exec::{
    pyth_run_or_die, run_or_die, sol_run_or_die, CommandError, CommandOutput, RunOptions,
};
pub use net::{readiness, ReadinessListener};
