//! `acroharvest harvest` — run the full batch job.

use crate::cli::output;
use crate::config::{HarvestConfig, Secrets};
use crate::harvester::Harvester;
use crate::keyspace::KEYSPACE_SIZE;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run the harvest command.
pub async fn run(
    secrets_path: &Path,
    out_dir: PathBuf,
    base_url: Option<String>,
    limit: Option<usize>,
    timeout_secs: u64,
) -> Result<()> {
    // Initialize tracing
    let default_level = if output::is_verbose() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("acroharvest={default_level}"))
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    // Secrets first: a missing key should fail before anything else happens.
    let secrets = Secrets::load(secrets_path)?;

    let mut config = HarvestConfig {
        out_dir,
        limit: limit.unwrap_or(KEYSPACE_SIZE).min(KEYSPACE_SIZE),
        timeout: Duration::from_secs(timeout_secs),
        ..HarvestConfig::default()
    };
    if let Some(url) = base_url {
        config.base_url = url;
    }

    let mut harvester = Harvester::new(config, &secrets)?;
    harvester.run().await?;
    Ok(())
}
