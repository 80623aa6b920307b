//! Run configuration and secret loading.
//!
//! The access key lives in a local JSON file (default `secret_keys.txt`)
//! under the fixed field name the marketplace header uses. A missing or
//! malformed secrets file is the one fatal error class: nothing is worth
//! starting a multi-hour run without a usable key.

use crate::lookup::DEFAULT_BASE_URL;
use crate::throttle::RatePolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default secrets file, relative to the working directory.
pub const DEFAULT_SECRETS_FILE: &str = "secret_keys.txt";

/// Access key loaded from the secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    #[serde(rename = "X-Mashape-Key")]
    pub access_key: String,
}

impl Secrets {
    /// Load and validate the secrets file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| {
            format!(
                "cannot read secrets file '{}'. Create a JSON file with an \
                 \"X-Mashape-Key\" field holding your access key.",
                path.display()
            )
        })?;
        let secrets: Secrets = serde_json::from_str(&raw)
            .with_context(|| format!("secrets file '{}' is not valid JSON", path.display()))?;
        if secrets.access_key.trim().is_empty() {
            anyhow::bail!("secrets file '{}' has an empty access key", path.display());
        }
        Ok(secrets)
    }
}

/// Everything a harvest run needs beyond the secrets.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Lookup endpoint. Overridable so tests can point at a stub.
    pub base_url: String,
    /// Where the snapshots, CSVs, text files and audit log land.
    pub out_dir: PathBuf,
    /// Process only the first `limit` candidates (full keyspace by default).
    pub limit: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    pub policy: RatePolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from("."),
            limit: crate::keyspace::KEYSPACE_SIZE,
            timeout: Duration::from_secs(30),
            policy: RatePolicy::default(),
        }
    }
}
