// src/collection/api.rs
// =============================================================================
// This module talks to the Commons Collection API.
//
// The API is a paginated JSON resource:
// - each page has an optional `next` (absolute URL of the following page)
// - and `results`: entries carrying url / title / uuid / org.slug
//
// Request shape:
// - query params sourcing=coherencebot and cluster=<region>, unless the
//   endpoint URL already carries its own query string
// - JSON content-type/accept headers plus an x-api-key credential
//
// The API key is NOT baked into the source - it comes from the
// COMMONS_API_KEY environment variable. Without it we still send the
// request, just without the credential header.
//
// Rust concepts:
// - serde derive: Declarative JSON deserialization
// - Option<T>: `next` is absent/null on the last page
// - Builder pattern: reqwest's RequestBuilder
// =============================================================================

use reqwest::Client;
use serde::Deserialize;

/// The production collection endpoint, overridable with --endpoint
pub const DEFAULT_ENDPOINT: &str = "https://policycommons.net/api/collections/";

/// Environment variable holding the collection API credential
pub const API_KEY_ENV: &str = "COMMONS_API_KEY";

// One page of the collection API response
#[derive(Debug, Deserialize)]
pub struct ApiPage {
    /// Absolute URL of the next page, absent/null on the last one
    pub next: Option<String>,
    /// Seed entries on this page (tolerated absent)
    #[serde(default)]
    pub results: Vec<SeedEntry>,
}

// One raw entry as the API serves it - org.slug is nested in the wire format
#[derive(Debug, Deserialize)]
pub struct SeedEntry {
    pub url: String,
    pub title: String,
    pub uuid: String,
    pub org: Org,
}

#[derive(Debug, Deserialize)]
pub struct Org {
    pub slug: String,
}

// The flattened seed record the rest of the program works with
//
// Immutable once extracted; lives for one page-processing iteration.
#[derive(Debug, Clone)]
pub struct SeedRecord {
    pub url: String,
    pub uuid: String,
    pub title: String,
    pub org_slug: String,
}

impl SeedEntry {
    // Flattens the wire entry into our record shape
    pub fn into_record(self) -> SeedRecord {
        SeedRecord {
            url: self.url,
            uuid: self.uuid,
            title: self.title,
            org_slug: self.org.slug,
        }
    }
}

// The collection API client: an HTTP client plus the optional credential
pub struct CollectionClient {
    client: Client,
    api_key: Option<String>,
}

impl CollectionClient {
    // Creates a client with the credential read from the environment
    pub fn new() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        if api_key.is_none() {
            eprintln!(
                "⚠️  Warning: {} is not set; collection requests go out without a credential",
                API_KEY_ENV
            );
        }
        Self::with_api_key(api_key)
    }

    // Creates a client with an explicit credential (handy in tests)
    pub fn with_api_key(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    // Fetches one page of seeds for a cluster
    //
    // Returns None on any failure (transport error, non-200, bad JSON) so
    // the walker can decide whether to retry - a bad page never aborts
    // the run from here.
    pub async fn fetch_page(&self, endpoint: &str, cluster: &str) -> Option<ApiPage> {
        let mut request = self
            .client
            .get(endpoint)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("accept", "application/json");

        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        // A `next` URL already carries its own query string - adding our
        // params on top would corrupt the cursor
        if !endpoint.contains('?') {
            request = request.query(&[("sourcing", "coherencebot"), ("cluster", cluster)]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                eprintln!("⚠️  Collection request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            eprintln!(
                "⚠️  Collection request not accepted for {} cluster {}: HTTP {}",
                endpoint,
                cluster,
                status.as_u16()
            );
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                eprintln!("⚠️  Collection response unreadable: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<ApiPage>(&body) {
            Ok(page) => Some(page),
            Err(e) => {
                eprintln!("⚠️  Collection response was not valid JSON: {}", e);
                None
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[derive(Deserialize)] do?
//    - serde generates the JSON-to-struct conversion code at compile time
//    - Field names must match the wire format (url, title, uuid, org)
//    - Nested objects (org.slug) become nested structs
//
// 2. What is #[serde(default)]?
//    - If the key is missing from the JSON, use the type's default value
//    - For Vec that's an empty vector - a page without `results` is just
//      an empty page, not an error
//
// 3. Why Option<ApiPage> instead of Result?
//    - The caller only ever does one thing with a failure: count it
//      against the retry budget
//    - The details have already been printed here, closest to where
//      they happened
//
// 4. Why into_record (consuming self)?
//    - The wire entry is done once we've flattened it
//    - Taking self by value lets us move the Strings out instead of
//      cloning them
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_body(uri: &str, next: Option<String>) -> serde_json::Value {
        json!({
            "next": next,
            "results": [{
                "url": format!("{}/seed/1", uri),
                "title": "Annual Report",
                "uuid": "11111111-aaaa",
                "org": { "slug": "test-org" }
            }]
        })
    }

    #[tokio::test]
    async fn test_fetch_page_sends_sourcing_cluster_and_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("sourcing", "coherencebot"))
            .and(query_param("cluster", "us-east-2"))
            .and(header("x-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_body(&server.uri(), None)),
            )
            .mount(&server)
            .await;

        let client = CollectionClient::with_api_key(Some("test-key".to_string()));
        let endpoint = format!("{}/api/collections/", server.uri());
        let page = client.fetch_page(&endpoint, "us-east-2").await;

        let page = page.expect("page should deserialize");
        assert_eq!(page.results.len(), 1);
        assert!(page.next.is_none());

        let record = page.results.into_iter().next().unwrap().into_record();
        assert_eq!(record.org_slug, "test-org");
        assert_eq!(record.uuid, "11111111-aaaa");
    }

    #[tokio::test]
    async fn test_fetch_page_skips_params_when_endpoint_has_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_body(&server.uri(), None)),
            )
            .mount(&server)
            .await;

        let client = CollectionClient::with_api_key(None);
        let endpoint = format!("{}/api/collections/?page=2", server.uri());
        let page = client.fetch_page(&endpoint, "us-east-2").await;
        assert!(page.is_some());

        // The cursor's own query string must be the only one sent
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].url.query().unwrap_or("").contains("sourcing"));
    }

    #[tokio::test]
    async fn test_fetch_page_returns_none_on_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CollectionClient::with_api_key(None);
        let endpoint = format!("{}/api/collections/", server.uri());

        assert!(client.fetch_page(&endpoint, "us-east-2").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_page_tolerates_missing_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/collections/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "next": null })))
            .mount(&server)
            .await;

        let client = CollectionClient::with_api_key(None);
        let endpoint = format!("{}/api/collections/", server.uri());
        let page = client.fetch_page(&endpoint, "us-east-2").await.unwrap();

        assert!(page.results.is_empty());
    }
}
