//! JSONL audit log — append-only record of one harvest run.
//!
//! Every run gets a uuid, a start event, one event per candidate-level
//! error, and a completion event with the final counts. The log is the
//! place to look when `missed.txt` has entries and you want to know why.

use crate::buckets::Summary;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub const AUDIT_FILE: &str = "harvest.jsonl";

/// A single audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub run_id: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Append-only JSONL logger for one run.
pub struct AuditLog {
    file: File,
    run_id: String,
}

impl AuditLog {
    /// Open (append) the audit log in the output directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(AUDIT_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open audit log: {}", path.display()))?;
        Ok(Self {
            file,
            run_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn log(&mut self, event: AuditEvent) {
        // Audit failures never interrupt the run.
        if let Ok(json) = serde_json::to_string(&event) {
            let _ = writeln!(self.file, "{json}");
        }
    }

    fn event(&self, name: &str) -> AuditEvent {
        AuditEvent {
            timestamp: Utc::now().to_rfc3339(),
            run_id: self.run_id.clone(),
            event: name.to_string(),
            candidate: None,
            status: None,
            detail: None,
        }
    }

    pub fn run_started(&mut self, limit: usize) {
        let mut e = self.event("run_started");
        e.detail = Some(format!("limit={limit}"));
        self.log(e);
    }

    pub fn transport_error(&mut self, candidate: &str, detail: &str) {
        let mut e = self.event("transport_error");
        e.candidate = Some(candidate.to_string());
        e.detail = Some(detail.to_string());
        self.log(e);
    }

    pub fn http_error(&mut self, candidate: &str, status: u16) {
        let mut e = self.event("http_error");
        e.candidate = Some(candidate.to_string());
        e.status = Some(status);
        self.log(e);
    }

    pub fn run_completed(&mut self, summary: &Summary) {
        let mut e = self.event("run_completed");
        e.detail = Some(format!(
            "total={} found={} missed={} no_results={}",
            summary.total_candidates, summary.acronyms_found, summary.missed, summary.no_results
        ));
        self.log(e);
    }
}
