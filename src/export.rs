//! Final persistence: tabular exports, plain-text lists, stdout summary.
//!
//! Row schema for the tabular files is (candidate, expansion, definition),
//! every field quoted. The text files are newline-delimited and sorted.

use crate::buckets::{HarvestBuckets, ResultRecord, Summary};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// File names, matching the original artifacts.
pub const EXACT_CSV: &str = "existing_acronyms.csv";
pub const HAD_RESULT_CSV: &str = "had_result.csv";
pub const NO_RESULTS_TXT: &str = "no_results.txt";
pub const MISSED_TXT: &str = "missed.txt";

/// Quote one CSV field: wrap in double quotes, double any embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render records as all-quoted CSV rows.
pub fn records_csv(records: &[ResultRecord]) -> String {
    let mut csv = String::new();
    for r in records {
        csv.push_str(&quote(&r.candidate));
        csv.push(',');
        csv.push_str(&quote(&r.expansion));
        csv.push(',');
        csv.push_str(&quote(&r.definition));
        csv.push('\n');
    }
    csv
}

/// Render a candidate set as newline-delimited text. `BTreeSet` iteration
/// already gives sorted, deterministic order.
pub fn set_text(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join("\n")
}

/// Write the four final artifacts into `dir`.
pub fn write_all(dir: &Path, buckets: &HarvestBuckets) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))?;

    let write = |name: &str, contents: String| -> Result<()> {
        let path = dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))
    };

    write(EXACT_CSV, records_csv(&buckets.exact))?;
    write(HAD_RESULT_CSV, records_csv(&buckets.had_result))?;
    write(NO_RESULTS_TXT, set_text(&buckets.no_results))?;
    write(MISSED_TXT, set_text(&buckets.missed))?;
    Ok(())
}

/// Print the end-of-run stats block.
pub fn print_summary(summary: &Summary) {
    let rule = "-".repeat(100);
    println!("{rule}");
    println!(
        "Total possible permutations (with repetition allowed): {}",
        summary.total_candidates
    );
    println!("Total acronyms found: {}", summary.acronyms_found);
    println!("Words missed due to some error: {}", summary.missed);
    println!("Words without acronyms (yet): {}", summary.no_results);
    println!("{rule}");
}
