//! HTTP client for the external definition API.
//!
//! One GET per candidate, no per-request retry: a candidate that fails is
//! recorded and skipped, never re-queried (the run-level rate policy handles
//! cooldowns). The base URL is injectable so tests can point at a stub server.

use crate::keyspace::Candidate;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default lookup endpoint (Urban Dictionary via the Mashape marketplace).
pub const DEFAULT_BASE_URL: &str =
    "https://mashape-community-urban-dictionary.p.mashape.com/define";

/// Header carrying the marketplace access key.
pub const ACCESS_KEY_HEADER: &str = "X-Mashape-Key";

/// Classified reply for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The source has no entry for this candidate.
    NoResults,
    /// Definition texts, in the order the source returned them.
    Definitions(Vec<String>),
    /// Non-2xx reply.
    HttpError(u16),
    /// 2xx reply whose body did not parse as the expected JSON shape.
    Malformed,
}

/// Transport-level failure (connect error, timeout). Distinct from
/// `LookupOutcome` because it triggers the long cooldown.
#[derive(Debug, Error)]
#[error("transport failure for '{candidate}': {source}")]
pub struct TransportFailure {
    pub candidate: String,
    #[source]
    pub source: reqwest::Error,
}

/// JSON wire shape of the definition API reply.
#[derive(Debug, Deserialize)]
struct DefineReply {
    result_type: String,
    #[serde(default)]
    list: Vec<DefineEntry>,
}

#[derive(Debug, Deserialize)]
struct DefineEntry {
    definition: String,
}

/// Client for the definition API.
#[derive(Clone)]
pub struct DefineClient {
    client: reqwest::Client,
    base_url: String,
}

impl DefineClient {
    /// Build a client with the access key baked into default headers.
    pub fn new(base_url: &str, access_key: &str, timeout: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Ok(v) = reqwest::header::HeaderValue::from_str(access_key) {
            headers.insert(ACCESS_KEY_HEADER, v);
        }
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("text/plain"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up one candidate and classify the reply.
    ///
    /// `Err` is reserved for transport failures; every HTTP-level oddity is a
    /// classified `Ok` variant so the harvester can keep its error handling
    /// at the loop level.
    pub async fn lookup(&self, candidate: Candidate) -> Result<LookupOutcome, TransportFailure> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("term", candidate.as_str())])
            .send()
            .await
            .map_err(|source| TransportFailure {
                candidate: candidate.as_str().to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Ok(LookupOutcome::HttpError(status.as_u16()));
        }

        let reply: DefineReply = match resp.json().await {
            Ok(r) => r,
            Err(_) => return Ok(LookupOutcome::Malformed),
        };

        if reply.result_type == "no_results" {
            return Ok(LookupOutcome::NoResults);
        }

        Ok(LookupOutcome::Definitions(
            reply.list.into_iter().map(|e| e.definition).collect(),
        ))
    }
}
