//! userpurge operator CLI.
//!
//! Read-only preflight for account deletions: runs the filesystem gate for
//! account ids and prints the paths and namespace a deletion would touch.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use userpurge_deletion::DeletionConfig;

#[derive(Parser)]
#[command(name = "userpurge")]
#[command(version, about = "Account deletion preflight")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Deletion config file
    #[arg(
        long,
        global = true,
        env = "USERPURGE_CONFIG",
        default_value = "/etc/userpurge/userpurge.toml"
    )]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that deletions of these accounts would pass the filesystem gate
    Check {
        /// Account ids
        #[arg(required = true)]
        account_ids: Vec<String>,
    },

    /// Print the per-account directories a deletion would remove
    Paths {
        /// Account id
        account_id: String,
    },

    /// Print the time-series namespace of a user
    Namespace {
        /// Username
        username: String,
    },

    /// Print the effective configuration (admin key redacted)
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let chain = format!("{e:#}");
            tracing::error!(error = %chain, "userpurge failed");
            ExitCode::from(2)
        }
    }
}

/// Dispatches a parsed command. `Ok(false)` means a check failed.
async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check { account_ids } => {
            let config = load_config(&cli.config)?;
            let report = commands::check(&config, &account_ids).await;
            print!("{report}");
            Ok(report.passed())
        }
        Commands::Paths { account_id } => {
            let config = load_config(&cli.config)?;
            for path in commands::paths(&config, &account_id)? {
                println!("{}", path.display());
            }
            Ok(true)
        }
        Commands::Namespace { username } => {
            println!("{}", commands::namespace(&username));
            Ok(true)
        }
        Commands::Config => {
            let config = load_config(&cli.config)?;
            println!("{config:#?}");
            Ok(true)
        }
    }
}

fn load_config(path: &std::path::Path) -> Result<DeletionConfig> {
    DeletionConfig::load(path).with_context(|| format!("loading {}", path.display()))
}
