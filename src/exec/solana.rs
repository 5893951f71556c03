//! Node CLI invocation.
//!
//! Argument shape: `solana <subcommand> [args...] --url <rpc_url>`

use crate::config::DevnetConfig;
use crate::exec::runner::{run_or_die, CommandError, CommandOutput, RunOptions};

/// Node CLI program name, resolved through `PATH`.
pub const SOLANA_CLI: &str = "solana";

/// Compose the node CLI argument list without running it.
pub fn sol_command<S: AsRef<str>>(
    config: &DevnetConfig,
    subcommand: &str,
    args: &[S],
) -> Vec<String> {
    let mut cmd = Vec::with_capacity(args.len() + 4);
    cmd.push(SOLANA_CLI.to_string());
    cmd.push(subcommand.to_string());
    cmd.extend(args.iter().map(|a| a.as_ref().to_string()));
    cmd.push("--url".to_string());
    cmd.push(config.rpc_url.clone());
    cmd
}

/// Run a node CLI subcommand through [`run_or_die`].
pub fn sol_run_or_die<S: AsRef<str>>(
    config: &DevnetConfig,
    subcommand: &str,
    args: &[S],
    options: &RunOptions,
) -> Result<CommandOutput, CommandError> {
    run_or_die(&sol_command(config, subcommand, args), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_command_shape() {
        let cmd = sol_command(&DevnetConfig::default(), "balance", &[] as &[&str]);
        assert_eq!(cmd, vec!["solana", "balance", "--url", "solana-devnet:8899"]);
    }

    #[test]
    fn test_args_precede_url() {
        let mut config = DevnetConfig::default();
        config.rpc_url = "http://127.0.0.1:8899".into();

        let cmd = sol_command(&config, "airdrop", &["100", "KEY"]);
        assert_eq!(
            cmd,
            vec!["solana", "airdrop", "100", "KEY", "--url", "http://127.0.0.1:8899"]
        );
    }
}
