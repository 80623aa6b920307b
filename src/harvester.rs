//! The sequential harvest loop.
//!
//! One candidate at a time, in keyspace order: look up, classify, extract,
//! bucket, then pay the rate policy's pause. Per-candidate errors are
//! absorbed here — nothing short of a configuration failure terminates the
//! run. All persistence happens once, after the last candidate.

use crate::audit::AuditLog;
use crate::buckets::{HarvestBuckets, Summary};
use crate::cli::output;
use crate::config::{HarvestConfig, Secrets};
use crate::export;
use crate::keyspace::{all_candidates, Candidate};
use crate::lookup::{DefineClient, LookupOutcome};
use crate::pattern::ExpansionPattern;
use crate::snapshot::{self, SnapshotKind};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

/// What the loop owes the rate policy after one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    /// Transport failure: apply the long cooldown before moving on.
    Cooldown,
}

/// Scan a candidate's definitions in order; the first successful extraction
/// wins and stops the scan. Failed extractions park the candidate in
/// `missed` until (and unless) a later definition succeeds.
pub fn scan_definitions(candidate: Candidate, definitions: &[String], buckets: &mut HarvestBuckets) {
    let pattern = ExpansionPattern::compile(candidate);
    for definition in definitions {
        let normalized = ExpansionPattern::normalize(definition);
        match pattern.extract(&normalized) {
            Some(expansion) => {
                buckets.record_hit(candidate, expansion, normalized);
                return;
            }
            None => buckets.record_missed(candidate),
        }
    }
}

/// Fold one classified lookup reply into the buckets.
///
/// HTTP errors deliberately leave the buckets untouched: only transport
/// failures and failed extractions mark a candidate as missed.
pub fn apply_outcome(
    candidate: Candidate,
    outcome: &LookupOutcome,
    buckets: &mut HarvestBuckets,
) -> LoopAction {
    match outcome {
        LookupOutcome::NoResults => buckets.record_no_results(candidate),
        LookupOutcome::HttpError(_) => {}
        LookupOutcome::Malformed => buckets.record_missed(candidate),
        LookupOutcome::Definitions(defs) => scan_definitions(candidate, defs, buckets),
    }
    LoopAction::Continue
}

/// Drives one complete harvest run.
pub struct Harvester {
    client: DefineClient,
    config: HarvestConfig,
    audit: AuditLog,
}

impl Harvester {
    pub fn new(config: HarvestConfig, secrets: &Secrets) -> Result<Self> {
        let client = DefineClient::new(&config.base_url, &secrets.access_key, config.timeout);
        let audit = AuditLog::open(&config.out_dir)?;
        Ok(Self {
            client,
            config,
            audit,
        })
    }

    /// Run the full job: loop, snapshot, export, summarize. Returns the
    /// final buckets for inspection.
    pub async fn run(&mut self) -> Result<HarvestBuckets> {
        let limit = self.config.limit;
        let mut buckets = HarvestBuckets::new();

        info!(run_id = self.audit.run_id(), limit, "starting harvest");
        self.audit.run_started(limit);

        let bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(limit as u64)
        };
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed}<{eta}] {msg}")
        {
            bar.set_style(style);
        }

        for (index, candidate) in all_candidates().take(limit).enumerate() {
            let action = self.process_candidate(candidate, &mut buckets).await;
            if action == LoopAction::Cooldown {
                bar.set_message(format!("cooling down after failure on {candidate}"));
                tokio::time::sleep(self.config.policy.failure_cooldown()).await;
                bar.set_message("");
            }

            bar.inc(1);
            let pause = self.config.policy.pause_after(index);
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        bar.finish();

        self.persist(&buckets)?;

        let summary = buckets.summary(limit);
        export::print_summary(&summary);
        self.audit.run_completed(&summary);
        info!(
            found = summary.acronyms_found,
            missed = summary.missed,
            no_results = summary.no_results,
            "harvest complete"
        );

        Ok(buckets)
    }

    /// One candidate: lookup, classify, bucket. Errors are logged and
    /// absorbed; the return value only tells the loop whether a cooldown
    /// is owed.
    async fn process_candidate(
        &mut self,
        candidate: Candidate,
        buckets: &mut HarvestBuckets,
    ) -> LoopAction {
        match self.client.lookup(candidate).await {
            Err(failure) => {
                warn!(%candidate, error = %failure, "transport failure, marking missed");
                self.audit
                    .transport_error(candidate.as_str(), &failure.to_string());
                buckets.record_missed(candidate);
                LoopAction::Cooldown
            }
            Ok(outcome) => {
                if let LookupOutcome::HttpError(status) = outcome {
                    warn!(%candidate, status, "http error, skipping");
                    self.audit.http_error(candidate.as_str(), status);
                }
                apply_outcome(candidate, &outcome, buckets)
            }
        }
    }

    /// Snapshots first (crash-recovery artifact), tabular export second.
    fn persist(&self, buckets: &HarvestBuckets) -> Result<()> {
        let dir = &self.config.out_dir;
        snapshot::write_records(dir, SnapshotKind::Exact, &buckets.exact)?;
        snapshot::write_set(dir, SnapshotKind::NoResults, &buckets.no_results)?;
        snapshot::write_records(dir, SnapshotKind::HadResult, &buckets.had_result)?;
        export::write_all(dir, buckets)?;
        Ok(())
    }
}
