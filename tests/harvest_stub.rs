//! End-to-end harvest runs against a stubbed definition API.
//!
//! Covers the full pipeline: HTTP lookup, response classification, regex
//! extraction, bucket accounting, binary snapshots and tabular export —
//! with a zeroed rate policy so nothing actually sleeps.

use acroharvest::buckets::HarvestBuckets;
use acroharvest::config::{HarvestConfig, Secrets};
use acroharvest::export;
use acroharvest::harvester::{apply_outcome, Harvester};
use acroharvest::keyspace::Candidate;
use acroharvest::lookup::{DefineClient, LookupOutcome};
use acroharvest::snapshot::{self, SnapshotContent};
use acroharvest::throttle::RatePolicy;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "test-access-key";

fn write_secrets(dir: &Path) -> std::path::PathBuf {
    let p = dir.join("secret_keys.txt");
    std::fs::write(&p, format!(r#"{{"X-Mashape-Key": "{TEST_KEY}"}}"#)).unwrap();
    p
}

fn stub_config(server: &MockServer, out_dir: &Path, limit: usize) -> HarvestConfig {
    HarvestConfig {
        base_url: format!("{}/define", server.uri()),
        out_dir: out_dir.to_path_buf(),
        limit,
        timeout: Duration::from_secs(5),
        policy: RatePolicy::unthrottled(),
    }
}

async fn mount_definitions(server: &MockServer, term: &str, definitions: &[&str]) {
    let list: Vec<serde_json::Value> = definitions
        .iter()
        .map(|d| json!({ "definition": d, "example": "" }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/define"))
        .and(query_param("term", term))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "result_type": "exact",
                "list": list,
            })),
        )
        .mount(server)
        .await;
}

async fn mount_no_results(server: &MockServer, term: &str) {
    Mock::given(method("GET"))
        .and(path("/define"))
        .and(query_param("term", term))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result_type": "no_results" })),
        )
        .mount(server)
        .await;
}

// ── Full runs over a truncated keyspace ──

#[tokio::test]
async fn full_run_buckets_every_candidate_exactly_once() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let secrets = Secrets::load(&write_secrets(out.path())).unwrap();

    // First five candidates in keyspace order: aaa aab aac aad aae.
    // aaa: real expansion; the mock also pins down the request headers.
    Mock::given(method("GET"))
        .and(path("/define"))
        .and(query_param("term", "aaa"))
        .and(header("X-Mashape-Key", TEST_KEY))
        .and(header("accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result_type": "exact",
            "list": [{ "definition": "Aardvarks Are Amazing", "example": "" }],
        })))
        .mount(&server)
        .await;
    // aab: the source has no entry.
    mount_no_results(&server, "aab").await;
    // aac: server-side error — logged and skipped, no bucket.
    Mock::given(method("GET"))
        .and(path("/define"))
        .and(query_param("term", "aac"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    // aad: definitions exist but nothing matches the pattern.
    mount_definitions(&server, "aad", &["zzz nothing relevant"]).await;
    // aae: first definition fails extraction, second succeeds.
    mount_definitions(
        &server,
        "aae",
        &["zzz nothing relevant", "all about everything"],
    )
    .await;

    let mut harvester = Harvester::new(stub_config(&server, out.path(), 5), &secrets).unwrap();
    let buckets = harvester.run().await.unwrap();

    // Bucket contents.
    assert_eq!(buckets.exact.len(), 2);
    assert_eq!(buckets.exact[0].candidate, "aaa");
    assert_eq!(buckets.exact[0].expansion, "Aardvarks Are Amazing");
    assert_eq!(buckets.exact[0].definition, "aardvarks are amazing");
    assert_eq!(buckets.exact[1].candidate, "aae");
    assert_eq!(buckets.exact[1].expansion, "All About Everything");
    assert!(buckets.no_results.contains("aab"));
    assert!(buckets.missed.contains("aad"));
    assert!(
        !buckets.missed.contains("aae"),
        "second definition success must clear missed"
    );

    // Mutual exclusivity across all four buckets.
    for c in ["aaa", "aab", "aac", "aad", "aae"] {
        let memberships = [
            buckets.exact.iter().any(|r| r.candidate == c),
            buckets.had_result.iter().any(|r| r.candidate == c),
            buckets.no_results.contains(c),
            buckets.missed.contains(c),
        ];
        assert!(
            memberships.iter().filter(|m| **m).count() <= 1,
            "{c} is in more than one bucket"
        );
    }
    assert_eq!(buckets.summary(5).acronyms_found, 2);

    // Exported artifacts.
    let exact_csv = std::fs::read_to_string(out.path().join(export::EXACT_CSV)).unwrap();
    assert!(exact_csv.contains("\"aaa\",\"Aardvarks Are Amazing\",\"aardvarks are amazing\""));
    let no_results = std::fs::read_to_string(out.path().join(export::NO_RESULTS_TXT)).unwrap();
    assert_eq!(no_results, "aab");
    let missed = std::fs::read_to_string(out.path().join(export::MISSED_TXT)).unwrap();
    assert_eq!(missed, "aad");

    // Snapshots were written and verify against their checksums.
    let (_, content) = snapshot::read(&out.path().join("snapshot_exact.bin")).unwrap();
    match content {
        SnapshotContent::Records(records) => {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].candidate, "aaa");
        }
        other => panic!("wrong snapshot content: {other:?}"),
    }
    let (_, content) = snapshot::read(&out.path().join("snapshot_no_results.bin")).unwrap();
    assert_eq!(content, SnapshotContent::Set(vec!["aab".to_string()]));

    // Audit log recorded the run and the one HTTP error.
    let audit = std::fs::read_to_string(out.path().join("harvest.jsonl")).unwrap();
    assert!(audit.contains("\"run_started\""));
    assert!(audit.contains("\"http_error\""));
    assert!(audit.contains("\"aac\""));
    assert!(audit.contains("\"run_completed\""));
}

#[tokio::test]
async fn transport_failure_marks_candidate_missed() {
    // Nothing listens on this port; every lookup is a connection error.
    let out = tempfile::tempdir().unwrap();
    let secrets = Secrets::load(&write_secrets(out.path())).unwrap();
    let config = HarvestConfig {
        base_url: "http://127.0.0.1:1/define".to_string(),
        out_dir: out.path().to_path_buf(),
        limit: 2,
        timeout: Duration::from_secs(2),
        policy: RatePolicy::unthrottled(),
    };

    let mut harvester = Harvester::new(config, &secrets).unwrap();
    let buckets = harvester.run().await.unwrap();

    assert!(buckets.missed.contains("aaa"));
    assert!(buckets.missed.contains("aab"));
    assert!(buckets.exact.is_empty());
    assert!(buckets.no_results.is_empty());

    let audit = std::fs::read_to_string(out.path().join("harvest.jsonl")).unwrap();
    assert!(audit.contains("\"transport_error\""));
}

// ── Targeted scenarios from arbitrary keyspace positions ──

#[tokio::test]
async fn no_results_reply_lands_only_in_no_results_output() {
    let server = MockServer::start().await;
    mount_no_results(&server, "xyz").await;

    let client = DefineClient::new(
        &format!("{}/define", server.uri()),
        TEST_KEY,
        Duration::from_secs(5),
    );
    let candidate = Candidate::parse("xyz").unwrap();
    let outcome = client.lookup(candidate).await.unwrap();
    assert_eq!(outcome, LookupOutcome::NoResults);

    let mut buckets = HarvestBuckets::new();
    apply_outcome(candidate, &outcome, &mut buckets);

    let out = tempfile::tempdir().unwrap();
    export::write_all(out.path(), &buckets).unwrap();
    let no_results = std::fs::read_to_string(out.path().join(export::NO_RESULTS_TXT)).unwrap();
    assert_eq!(no_results, "xyz");
    assert_eq!(
        std::fs::read_to_string(out.path().join(export::MISSED_TXT)).unwrap(),
        ""
    );
    assert_eq!(
        std::fs::read_to_string(out.path().join(export::EXACT_CSV)).unwrap(),
        ""
    );
}

#[tokio::test]
async fn self_match_definition_extracts_the_expansion() {
    let server = MockServer::start().await;
    mount_definitions(&server, "abc", &["abc is short for always be coding"]).await;

    let client = DefineClient::new(
        &format!("{}/define", server.uri()),
        TEST_KEY,
        Duration::from_secs(5),
    );
    let candidate = Candidate::parse("abc").unwrap();
    let outcome = client.lookup(candidate).await.unwrap();

    let mut buckets = HarvestBuckets::new();
    apply_outcome(candidate, &outcome, &mut buckets);

    assert_eq!(buckets.exact.len(), 1);
    assert_eq!(buckets.exact[0].candidate, "abc");
    assert_eq!(buckets.exact[0].expansion, "Always Be Coding");
    assert_eq!(buckets.exact[0].definition, "abc is short for always be coding");
}
