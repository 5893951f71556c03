//! Command-line interface of the `pyth-devnet` driver.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pyth_devnet::exec::{PythFlags, RunOptions};

/// Process exit codes used by the driver itself.
///
/// Fail-fast command failures exit with the child's own code instead.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

#[derive(Parser, Debug)]
#[command(name = "pyth-devnet")]
#[command(
    about = "Oracle devnet helper: run oracle/node CLI steps, signal readiness",
    long_about = None
)]
pub struct Cli {
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// After the command step completes, keep serving the readiness port
    #[arg(long, global = true)]
    pub then_ready: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an arbitrary command with fail-fast semantics
    Run(RunArgs),
    /// Run an oracle CLI subcommand
    Pyth(PythArgs),
    /// Run a node CLI subcommand
    Sol(SolArgs),
    /// Serve the readiness port forever
    Readiness(ReadinessArgs),
    /// Print the resolved configuration
    Config(ConfigArgs),
}

/// Options shared by every command step.
#[derive(Args, Debug, Clone, Default)]
pub struct StepArgs {
    /// Report a non-zero exit instead of exiting with it
    #[arg(long)]
    pub no_die: bool,

    /// Working directory for the command
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Extra environment variable for the command (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub env: Vec<(String, String)>,
}

impl StepArgs {
    pub fn run_options(&self) -> RunOptions {
        let mut options = RunOptions::default().with_die(!self.no_die);
        if let Some(dir) = &self.cwd {
            options = options.with_working_directory(dir.clone());
        }
        for (key, value) in &self.env {
            options = options.with_env(key.clone(), value.clone());
        }
        options
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub step: StepArgs,

    /// Program followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PythArgs {
    #[command(flatten)]
    pub step: StepArgs,

    /// Pass -d to the oracle CLI
    #[arg(long)]
    pub debug: bool,

    /// Pass -n to the oracle CLI (only for subcommands that accept it)
    #[arg(long)]
    pub no_confirm: bool,

    /// Oracle CLI subcommand
    pub subcommand: String,

    /// Arguments for the subcommand
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl PythArgs {
    pub fn flags(&self) -> PythFlags {
        PythFlags {
            debug: self.debug,
            confirm: !self.no_confirm,
        }
    }
}

#[derive(Args, Debug)]
pub struct SolArgs {
    #[command(flatten)]
    pub step: StepArgs,

    /// Node CLI subcommand
    pub subcommand: String,

    /// Arguments for the subcommand
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ReadinessArgs {
    /// Drop readiness connections that haven't sent 64 bytes or closed in time
    #[arg(long, value_name = "SECONDS")]
    pub read_timeout_secs: Option<f64>,
}

impl ReadinessArgs {
    pub fn read_timeout(&self) -> Result<Option<Duration>, String> {
        self.read_timeout_secs
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .map_err(|e| format!("invalid --read-timeout-secs {}: {}", secs, e))
            })
            .transpose()
    }
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
    pub format: ConfigFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
