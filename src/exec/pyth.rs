//! Oracle CLI invocation.
//!
//! Argument shape:
//! `<pyth> <subcommand> [args...] [-d] [-n] -k <key_store> -r <rpc_host> -c finalized`

use crate::config::DevnetConfig;
use crate::exec::runner::{run_or_die, CommandError, CommandOutput, RunOptions};

/// Commitment level passed to every oracle CLI call.
pub const COMMITMENT: &str = "finalized";

/// Per-call flags for the oracle CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythFlags {
    /// Append `-d`.
    pub debug: bool,
    /// When false, append `-n` to skip the interactive confirmation.
    ///
    /// Not every subcommand accepts `-n`; callers pick this per subcommand.
    pub confirm: bool,
}

impl Default for PythFlags {
    fn default() -> Self {
        Self {
            debug: false,
            confirm: true,
        }
    }
}

/// Compose the oracle CLI argument list without running it.
pub fn pyth_command<S: AsRef<str>>(
    config: &DevnetConfig,
    subcommand: &str,
    args: &[S],
    flags: PythFlags,
) -> Vec<String> {
    let mut cmd = Vec::with_capacity(args.len() + 10);
    cmd.push(config.pyth_path.clone());
    cmd.push(subcommand.to_string());
    cmd.extend(args.iter().map(|a| a.as_ref().to_string()));
    if flags.debug {
        cmd.push("-d".to_string());
    }
    if !flags.confirm {
        cmd.push("-n".to_string());
    }
    cmd.extend([
        "-k".to_string(),
        config.key_store.clone(),
        "-r".to_string(),
        config.rpc_host.clone(),
        "-c".to_string(),
        COMMITMENT.to_string(),
    ]);
    cmd
}

/// Run an oracle CLI subcommand through [`run_or_die`].
pub fn pyth_run_or_die<S: AsRef<str>>(
    config: &DevnetConfig,
    subcommand: &str,
    args: &[S],
    flags: PythFlags,
    options: &RunOptions,
) -> Result<CommandOutput, CommandError> {
    run_or_die(&pyth_command(config, subcommand, args, flags), options)
}
