//! Run-scoped result aggregator.
//!
//! Four outcome buckets, mutually exclusive per candidate at end of run:
//! `exact` and `had_result` hold extracted records, `no_results` holds
//! candidates the source has no entry for, `missed` holds candidates that
//! errored out or whose definitions yielded no extraction. A later success
//! for a candidate evicts it from `missed`.

use crate::keyspace::Candidate;
use crate::pattern::ExpansionClass;
use std::collections::BTreeSet;

/// One successful extraction: candidate, title-cased expansion, and the
/// normalized definition text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub candidate: String,
    pub expansion: String,
    pub definition: String,
}

/// Final counts printed at end of run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_candidates: usize,
    pub acronyms_found: usize,
    pub missed: usize,
    pub no_results: usize,
}

/// The run's accumulated outcomes. Created empty, mutated only by the
/// sequential harvest loop, persisted once at run end.
#[derive(Debug, Default)]
pub struct HarvestBuckets {
    /// Expansions longer than 5 chars — treated as real.
    pub exact: Vec<ResultRecord>,
    /// Expansions of 5 chars or fewer — secondary evidence.
    pub had_result: Vec<ResultRecord>,
    /// Candidates the source has no entry for. Sorted set, so export
    /// order is deterministic.
    pub no_results: BTreeSet<String>,
    /// Candidates that errored out without an extractable result.
    pub missed: BTreeSet<String>,
}

impl HarvestBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a successful extraction. Clears any earlier `missed` entry for
    /// the candidate so membership stays mutually exclusive.
    pub fn record_hit(&mut self, candidate: Candidate, expansion: String, definition: String) {
        let record = ResultRecord {
            candidate: candidate.as_str().to_string(),
            expansion,
            definition,
        };
        match crate::pattern::classify(&record.expansion) {
            ExpansionClass::Short => self.had_result.push(record),
            ExpansionClass::Exact => self.exact.push(record),
        }
        self.missed.remove(candidate.as_str());
    }

    /// The source has no entry for this candidate.
    pub fn record_no_results(&mut self, candidate: Candidate) {
        self.no_results.insert(candidate.as_str().to_string());
    }

    /// The candidate errored out (transport failure) or none of its
    /// definitions yielded an extraction.
    pub fn record_missed(&mut self, candidate: Candidate) {
        self.missed.insert(candidate.as_str().to_string());
    }

    /// Whether the candidate already has an extracted record.
    pub fn has_hit(&self, candidate: &str) -> bool {
        self.exact.iter().any(|r| r.candidate == candidate)
            || self.had_result.iter().any(|r| r.candidate == candidate)
    }

    pub fn summary(&self, total_candidates: usize) -> Summary {
        Summary {
            total_candidates,
            acronyms_found: self.exact.len() + self.had_result.len(),
            missed: self.missed.len(),
            no_results: self.no_results.len(),
        }
    }
}
