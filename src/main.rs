// Copyright 2026 Acroharvest Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use acroharvest::cli;
use acroharvest::config::DEFAULT_SECRETS_FILE;

#[derive(Parser)]
#[command(
    name = "acroharvest",
    about = "acroharvest — sweep the 3-letter keyspace against a public definition API",
    version,
    after_help = "Run 'acroharvest <command> --help' for details on each command."
)]
struct Cli {
    /// Suppress non-essential output (progress bar)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the harvest: all 17,576 candidates, one lookup each
    Harvest {
        /// Path to the JSON secrets file holding the access key
        #[arg(long, default_value = DEFAULT_SECRETS_FILE)]
        secrets: PathBuf,
        /// Directory for snapshots, CSV/text exports and the audit log
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Override the lookup endpoint (mainly for testing against a stub)
        #[arg(long)]
        base_url: Option<String>,
        /// Process only the first N candidates (smoke runs)
        #[arg(long)]
        limit: Option<usize>,
        /// Per-request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.quiet {
        std::env::set_var("ACROHARVEST_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("ACROHARVEST_VERBOSE", "1");
    }

    let result = match cli.command {
        Commands::Harvest {
            secrets,
            out_dir,
            base_url,
            limit,
            timeout,
        } => cli::harvest_cmd::run(&secrets, out_dir, base_url, limit, timeout).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "acroharvest", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
