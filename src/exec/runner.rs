//! Command runner.
//!
//! Runs an external program to completion, capturing its output as text,
//! and applies the fail-fast policy: a non-zero exit with `die` set comes
//! back as `CommandError::Failed` so the driver can exit with the child's
//! own code.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Exit code used when the program could not be found (shell convention).
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code used when the program exists but could not be launched.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Passthrough options for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Fail fast on a non-zero exit.
    pub die: bool,
    /// Working directory for the child.
    pub working_directory: Option<PathBuf>,
    /// Variables added on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    /// Text written to the child's stdin. Without it the child inherits
    /// ours, so interactive confirmations can still be answered.
    pub stdin: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            die: true,
            working_directory: None,
            env: BTreeMap::new(),
            stdin: None,
        }
    }
}

impl RunOptions {
    /// Options that return failures to the caller instead of failing fast.
    pub fn no_die() -> Self {
        Self {
            die: false,
            ..Self::default()
        }
    }

    pub fn with_die(mut self, die: bool) -> Self {
        self.die = die;
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Full argument list, program first.
    pub args: Vec<String>,
    /// Exit code; `128 + signal` when the child was killed on Unix.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Space-joined argument list.
    pub fn command_line(&self) -> String {
        format_command(&self.args)
    }
}

/// Command runner errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Called with an empty argument list.
    #[error("cannot run an empty command")]
    EmptyCommand,

    /// The program could not be launched.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting on or reading from the child failed.
    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The command exited non-zero and fail-fast was requested.
    #[error("command '{}' exited with code {}", .output.command_line(), .output.exit_code)]
    Failed { output: CommandOutput },
}

impl CommandError {
    /// Code the hosting process should exit with for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::EmptyCommand | CommandError::Io { .. } => 1,
            CommandError::Spawn { source, .. } => spawn_exit_code(source),
            CommandError::Failed { output } => output.exit_code,
        }
    }

    /// Captured output, when the command got far enough to produce one.
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            CommandError::Failed { output } => Some(output),
            _ => None,
        }
    }
}

/// Space-joined rendering of an argument list, as used in log lines.
pub fn format_command<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command to completion and enforce the fail-fast policy.
///
/// Blocks the calling thread until the child exits. There is no timeout.
pub fn run_or_die<S: AsRef<str>>(
    args: &[S],
    options: &RunOptions,
) -> Result<CommandOutput, CommandError> {
    let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
    let (program, rest) = args.split_first().ok_or(CommandError::EmptyCommand)?;
    let readable = format_command(&args);

    tracing::debug!(command = %readable, "Running command");

    let mut cmd = Command::new(program);
    cmd.args(rest);
    if let Some(dir) = &options.working_directory {
        cmd.current_dir(dir);
    }
    cmd.envs(&options.env);
    cmd.stdin(if options.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => return spawn_failed(args.clone(), source, options.die),
    };

    // Feed stdin from a separate thread so a chatty child can't deadlock
    // against a full stdout pipe.
    let writer = match (options.stdin.clone(), child.stdin.take()) {
        (Some(input), Some(mut stdin)) => Some(std::thread::spawn(move || {
            let _ = stdin.write_all(input.as_bytes());
        })),
        _ => None,
    };

    let raw = child.wait_with_output().map_err(|source| CommandError::Io {
        program: program.clone(),
        source,
    })?;
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    let output = CommandOutput {
        exit_code: exit_code_of(raw.status),
        stdout: String::from_utf8_lossy(&raw.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&raw.stderr).into_owned(),
        args,
    };

    if output.success() {
        tracing::debug!(command = %readable, "Command succeeded");
        return Ok(output);
    }

    tracing::error!(
        command = %readable,
        exit_code = output.exit_code,
        stdout = %output.stdout,
        stderr = %output.stderr,
        "Command returned non-zero exit code"
    );

    if options.die {
        Err(CommandError::Failed { output })
    } else {
        tracing::warn!(command = %readable, "Fail-fast disabled, returning failure to caller");
        Ok(output)
    }
}

/// Run a command on the blocking pool.
pub async fn run_or_die_async(
    args: Vec<String>,
    options: RunOptions,
) -> Result<CommandOutput, CommandError> {
    let program = args.first().cloned().unwrap_or_default();
    tokio::task::spawn_blocking(move || run_or_die(&args, &options))
        .await
        .map_err(|e| CommandError::Io {
            program,
            source: io::Error::new(io::ErrorKind::Other, e),
        })?
}

fn spawn_failed(
    args: Vec<String>,
    source: io::Error,
    die: bool,
) -> Result<CommandOutput, CommandError> {
    let exit_code = spawn_exit_code(&source);
    let program = args[0].clone();

    tracing::error!(
        program = %program,
        exit_code,
        error = %source,
        "Failed to launch command"
    );

    if die {
        return Err(CommandError::Spawn { program, source });
    }

    tracing::warn!(
        command = %format_command(&args),
        "Fail-fast disabled, returning failure to caller"
    );
    Ok(CommandOutput {
        args,
        exit_code,
        stdout: String::new(),
        stderr: source.to_string(),
    })
}

fn spawn_exit_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => EXIT_NOT_FOUND,
        _ => EXIT_NOT_EXECUTABLE,
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
