//! pyth-devnet driver.
//!
//! Runs one setup step against the oracle CLI, the node CLI or an arbitrary
//! program, and/or serves the readiness port.
//!
//! ```text
//!   environment ──▶ DevnetConfig (resolved once)
//!                        │
//!          ┌─────────────┴──────────────┐
//!          ▼                            ▼
//!   exec (blocking pool)         net::ReadinessListener
//!   run / pyth / sol             0.0.0.0:<READINESS_PORT>
//!          │
//!          ▼
//!   exit code: 0, or the failed child's own code
//! ```

mod cli;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use cli::{exit_codes, Cli, Commands, ConfigFormat};
use pyth_devnet::config::DevnetConfig;
use pyth_devnet::exec::{pyth_command, run_or_die_async, sol_command, CommandError, CommandOutput};
use pyth_devnet::net::{ListenerOptions, ReadinessListener};
use pyth_devnet::observability::logging;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.json) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    let config = match DevnetConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Error: {}", e);
            return exit_codes::CONFIG_ERROR;
        }
    };

    tracing::info!(
        pyth = %config.pyth_path,
        key_store = %config.key_store,
        rpc_host = %config.rpc_host,
        rpc_url = %config.rpc_url,
        readiness_port = config.readiness_port,
        "Configuration loaded"
    );

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    rt.block_on(dispatch(cli, config))
}

async fn dispatch(cli: Cli, config: Arc<DevnetConfig>) -> i32 {
    let then_ready = cli.then_ready;

    let (argv, step) = match cli.command {
        Commands::Config(args) => return print_config(&config, args.format),
        Commands::Readiness(args) => {
            let options = match args.read_timeout() {
                Ok(timeout) => ListenerOptions {
                    read_timeout: timeout,
                    ..ListenerOptions::from_config(&config)
                },
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return exit_codes::UNEXPECTED_FAILURE;
                }
            };
            return serve_readiness(options).await;
        }
        Commands::Run(args) => (args.command, args.step),
        Commands::Pyth(args) => (
            pyth_command(&config, &args.subcommand, &args.args, args.flags()),
            args.step,
        ),
        Commands::Sol(args) => (sol_command(&config, &args.subcommand, &args.args), args.step),
    };

    match run_or_die_async(argv, step.run_options()).await {
        Ok(output) => {
            echo(&output);
            if then_ready {
                return serve_readiness(ListenerOptions::from_config(&config)).await;
            }
            exit_codes::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Bind and serve the readiness port; only returns on bind failure.
async fn serve_readiness(options: ListenerOptions) -> i32 {
    let listener = match ReadinessListener::bind(&options).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Readiness listener failed to start");
            eprintln!("Error: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    match listener.serve().await {}
}

fn print_config(config: &DevnetConfig, format: ConfigFormat) -> i32 {
    let rendered = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::to_string(config).map_err(|e| e.to_string()),
    };

    match rendered {
        Ok(text) => {
            println!("{}", text.trim_end());
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::UNEXPECTED_FAILURE
        }
    }
}

/// Pass the child's captured output through to our own stdout/stderr.
fn echo(output: &CommandOutput) {
    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    let _ = std::io::stdout().flush();
}

fn fail(e: &CommandError) -> i32 {
    if let Some(output) = e.output() {
        echo(output);
    }
    eprintln!("Error: {}", e);
    e.exit_code()
}
