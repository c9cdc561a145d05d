// src/collection/walker.rs
// =============================================================================
// This module walks the whole seed collection and drives the validator.
//
// Three nested stages:
// 1. Clusters: a fixed list of regions, walked in order
// 2. Pages: follow each `next` cursor until the cluster is exhausted
// 3. Seeds: validate every record on a page, one at a time
//
// Page fetches are the only thing we retry: up to 3 consecutive failures
// for the same cursor are tolerated; on the 4th the cluster is abandoned
// (treated as end-of-stream) and the walk moves to the next cluster.
// A failing seed URL is never retried - its verdict goes in the report.
//
// Rust concepts:
// - Labeled breaks: 'clusters lets the -n cap stop all three loops at once
// - let-else: Bail out of a fetch attempt without an extra match level
// - Mutable borrows: The report writer is threaded through by &mut
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::time::Duration;

use crate::checker::UrlValidator;
use crate::report::ReportWriter;

use super::api::CollectionClient;

/// The regions we pull seeds for, walked in this order
pub const CLUSTERS: [&str; 3] = ["us-east-2", "eu-central-1", "ap-northeast-1"];

// Consecutive page-fetch failures tolerated before a cluster is abandoned
const MAX_PAGE_RETRIES: u32 = 3;

// Counters accumulated across the whole run
//
// Invariant: successes + failures == processed after every validated seed.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub processed: u64,
    pub successes: u64,
    pub failures: u64,
    pub elapsed_seconds: f64,
}

// The walker owns the API client, the validator and the running counters
pub struct CollectionWalker {
    api: CollectionClient,
    validator: UrlValidator,
    summary: RunSummary,
}

impl CollectionWalker {
    pub fn new(api: CollectionClient, validator: UrlValidator) -> Self {
        Self {
            api,
            validator,
            summary: RunSummary::default(),
        }
    }

    // Finalizes the counters with the measured wall-clock time
    pub fn into_summary(self, elapsed: Duration) -> RunSummary {
        let mut summary = self.summary;
        summary.elapsed_seconds = elapsed.as_secs_f64();
        summary
    }

    // Walks every cluster, page and seed, writing failures to the report
    //
    // `limit` > 0 stops the entire run once that many seeds have been
    // processed - mid-page, before any further page is fetched.
    //
    // Per-seed failures never surface as errors here; only the report
    // writer can make this function bail out early.
    pub async fn run(
        &mut self,
        endpoint: &str,
        limit: u64,
        report: &mut ReportWriter,
    ) -> Result<()> {
        // The page counter runs across all clusters
        let mut page = 0u64;

        'clusters: for cluster in CLUSTERS {
            let mut cursor = Some(endpoint.to_string());
            let mut retries = 0u32;

            while let Some(page_url) = cursor.clone() {
                page += 1;
                println!(
                    "📄 Checking seeds for cluster {}, page {} (✅ {} ❌ {})",
                    cluster, page, self.summary.successes, self.summary.failures
                );

                let Some(api_page) = self.api.fetch_page(&page_url, cluster).await else {
                    eprintln!("⚠️  No response for request {}", page_url);
                    retries += 1;
                    if retries > MAX_PAGE_RETRIES {
                        // Abandon the cluster and advance - any remaining
                        // pagination state for it is dropped on purpose
                        eprintln!(
                            "❌ Giving up on {} after {} retries",
                            page_url, MAX_PAGE_RETRIES
                        );
                        break;
                    }
                    continue;
                };

                retries = 0;
                cursor = api_page.next.clone();

                for entry in api_page.results {
                    let record = entry.into_record();
                    self.summary.processed += 1;

                    let outcome = self.validator.check(&record.url).await;
                    if outcome.success {
                        println!(
                            "{} ✅ Verification succeeded for '{}' ({}) from collection {} org {}",
                            self.summary.processed,
                            record.url,
                            record.title,
                            record.uuid,
                            record.org_slug
                        );
                        self.summary.successes += 1;
                    } else {
                        println!(
                            "{} ❌ Verification failed for '{}' from collection {} org {} with code {} and msg '{}'",
                            self.summary.processed,
                            record.url,
                            record.uuid,
                            record.org_slug,
                            outcome.status_code,
                            outcome.message
                        );
                        report.write_failure(&record, &outcome)?;
                        self.summary.failures += 1;
                    }

                    if limit > 0 && self.summary.processed >= limit {
                        println!("🛑 Exiting loop, max requests reached {}", limit);
                        break 'clusters;
                    }
                }
            }
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a labeled break?
//    - 'clusters: names the outer loop
//    - break 'clusters jumps out of all three nested loops at once
//    - That's exactly what the -n cap needs: stop everything, mid-page
//
// 2. What is let-else?
//    - let Some(x) = expr else { ... } binds on success
//    - The else block MUST diverge (break/continue/return)
//    - Perfect for "no page? handle the retry and move on" without
//      indenting the whole happy path inside a match
//
// 3. Why does the report writer come in as &mut?
//    - main() owns the report so it can close it after the walk,
//      however the walk ended
//    - The walker only borrows it for the duration of run()
//    - The borrow checker guarantees nobody else writes rows meanwhile
//
// 4. Why clone the cursor at the top of the while let?
//    - The loop needs the current URL even while it may overwrite
//      `cursor` with the next one
//    - Cloning a short String once per page is nothing next to the
//      network round-trip it drives
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seed(uri: &str, index: usize) -> serde_json::Value {
        json!({
            "url": format!("{}/seed/{}", uri, index),
            "title": format!("Seed {}", index),
            "uuid": format!("uuid-{}", index),
            "org": { "slug": "test-org" }
        })
    }

    fn seeds(uri: &str, range: std::ops::Range<usize>) -> Vec<serde_json::Value> {
        range.map(|i| seed(uri, i)).collect()
    }

    fn walker() -> CollectionWalker {
        CollectionWalker::new(
            CollectionClient::with_api_key(None),
            UrlValidator::new().unwrap(),
        )
    }

    fn scratch_report(dir: &tempfile::TempDir) -> ReportWriter {
        ReportWriter::create_at(dir.path().join("report.tsv")).unwrap()
    }

    // Two pages for the first cluster; the other clusters get 404s until
    // they are abandoned. Every seed probe answers 404, so every seed is a
    // failure and each one lands in the report.
    #[tokio::test]
    async fn test_walk_follows_pagination_and_keeps_counts_consistent() {
        let server = MockServer::start().await;
        let uri = server.uri();
        let endpoint = format!("{}/api/collections/", uri);

        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("cluster", "us-east-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": format!("{}/api/collections/?page=2", uri),
                "results": seeds(&uri, 0..3),
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "results": seeds(&uri, 3..5),
            })))
            .mount(&server)
            .await;
        // Seed probes: unmatched HEAD requests answer 404 ("Not found")

        let dir = tempfile::tempdir().unwrap();
        let mut report = scratch_report(&dir);
        let mut walker = walker();

        walker.run(&endpoint, 0, &mut report).await.unwrap();

        let summary = walker.into_summary(Duration::ZERO);
        assert_eq!(summary.processed, 5);
        assert_eq!(summary.successes + summary.failures, summary.processed);
        assert_eq!(summary.failures, 5);
        report.finish().unwrap();

        let written = std::fs::read_to_string(dir.path().join("report.tsv")).unwrap();
        // Header plus one row per failed seed, in processing order
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with(&format!("{}/seed/0\t", uri)));
        assert!(lines[5].starts_with(&format!("{}/seed/4\t", uri)));
        assert!(lines[1].contains("Not found"));
    }

    // The first cluster never answers: after the retry budget is exhausted
    // the walk abandons it and still reaches the second cluster.
    #[tokio::test]
    async fn test_exhausted_page_retries_abandon_cluster_and_advance() {
        let server = MockServer::start().await;
        let uri = server.uri();
        let endpoint = format!("{}/api/collections/", uri);

        // Only eu-central-1 is served; us-east-2 gets 404s until abandoned
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("cluster", "eu-central-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "results": seeds(&uri, 0..1),
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut report = scratch_report(&dir);
        let mut walker = walker();

        // Must not raise - abandonment is normal control flow
        walker.run(&endpoint, 0, &mut report).await.unwrap();

        assert_eq!(walker.into_summary(Duration::ZERO).processed, 1);
    }

    // -n caps the whole run: with 15 seeds on page one and a cap of 10,
    // exactly 10 are validated and the second page is never requested.
    #[tokio::test]
    async fn test_limit_stops_run_before_fetching_more_pages() {
        let server = MockServer::start().await;
        let uri = server.uri();
        let endpoint = format!("{}/api/collections/", uri);

        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("cluster", "us-east-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": format!("{}/api/collections/?page=2", uri),
                "results": seeds(&uri, 0..15),
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "results": seeds(&uri, 15..25),
            })))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut report = scratch_report(&dir);
        let mut walker = walker();

        walker.run(&endpoint, 10, &mut report).await.unwrap();

        assert_eq!(walker.into_summary(Duration::ZERO).processed, 10);
    }

    // A seed that probes 200 with no robots policy in the way counts as a
    // success and stays out of the report.
    #[tokio::test]
    async fn test_successful_seed_is_counted_not_reported() {
        let server = MockServer::start().await;
        let uri = server.uri();
        let endpoint = format!("{}/api/collections/", uri);

        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("cluster", "us-east-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "results": [{
                    "url": format!("{}/ok", uri),
                    "title": "Healthy seed",
                    "uuid": "uuid-ok",
                    "org": { "slug": "test-org" }
                }],
            })))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut report = scratch_report(&dir);
        let mut walker = walker();

        // Cap at 1 so the empty remaining clusters are never walked
        walker.run(&endpoint, 1, &mut report).await.unwrap();

        let summary = walker.into_summary(Duration::ZERO);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.failures, 0);
        report.finish().unwrap();

        let written = std::fs::read_to_string(dir.path().join("report.tsv")).unwrap();
        assert_eq!(written.lines().count(), 1, "header only, no failure rows");
    }
}
