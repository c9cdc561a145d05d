// src/checker/validate.rs
// =============================================================================
// This module runs the full check for a single seed URL.
//
// The sequence for one URL:
// 1. Send a bodyless HEAD probe (30s timeout, redirects NOT followed)
// 2. If the transport itself failed, describe the failure (code stays 0)
// 3. Otherwise classify the status code (see status.rs)
// 4. A plain 200 still has to pass the robots gate before we call it good
//
// Every failure mode becomes a ValidationOutcome - this function never
// returns an error, so a bad seed can never abort the run.
//
// Rust concepts:
// - async/await: Two network calls may happen per URL (probe + robots)
// - match on Result: Separates transport failures from HTTP answers
// - reqwest error introspection: is_timeout(), is_redirect(), etc.
// =============================================================================

use reqwest::{redirect, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::robots::RobotsGate;
use super::status::classify;

/// The agent name we check robots policies against
pub const CRAWLER_AGENT: &str = "CoherenceBot";

// How long a probe may take before we give up on the seed
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

// The final verdict for one seed URL
//
// status_code is the real HTTP code when we got an answer, and 0 when the
// failure happened below HTTP (timeout, TLS, connection refused, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True only for a 200 response the robots gate approved
    pub success: bool,
    /// Observed HTTP status code, or 0 for transport-level failures
    pub status_code: u16,
    /// Human-readable explanation that ends up in the report
    pub message: String,
}

// The validator: a redirect-disabled HTTP client plus the robots gate
pub struct UrlValidator {
    client: Client,
    gate: RobotsGate,
    probe_timeout: Duration,
}

impl UrlValidator {
    // Creates a validator with the standard 30 second probe timeout
    pub fn new() -> anyhow::Result<Self> {
        Self::with_probe_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    // Creates a validator with a custom probe timeout (handy in tests)
    //
    // Redirects are never followed: a 3xx answer is itself the verdict,
    // and the Location header tells us where the seed went.
    pub fn with_probe_timeout(probe_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            gate: RobotsGate::new(),
            probe_timeout,
        })
    }

    // Checks one seed URL and returns its verdict
    //
    // Success path makes two network calls (probe + robots fetch),
    // failure paths make one. No retries happen here - if the caller
    // wants retries, that's its business.
    pub async fn check(&self, url: &str) -> ValidationOutcome {
        let result = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let verdict = classify(status_code, response.headers());

                if verdict.candidate_success {
                    // Got a clean 200 - now check for robot exclusion
                    if self.gate.is_allowed(url, CRAWLER_AGENT).await {
                        ValidationOutcome {
                            success: true,
                            status_code,
                            message: "Accepted".to_string(),
                        }
                    } else {
                        ValidationOutcome {
                            success: false,
                            status_code,
                            message: "Robot exclusion".to_string(),
                        }
                    }
                } else {
                    ValidationOutcome {
                        success: false,
                        status_code,
                        message: verdict.message,
                    }
                }
            }
            Err(error) => self.transport_failure(error),
        }
    }

    // Describes a failure that happened below the HTTP layer
    //
    // There is no status code to report for these, so the code stays 0
    // and the message carries the failure kind.
    fn transport_failure(&self, error: reqwest::Error) -> ValidationOutcome {
        let error_string = error.to_string();

        let message = if error.is_timeout() {
            format!("Timeout after {}s", self.probe_timeout.as_secs())
        } else if error.is_redirect() {
            "Too many redirects".to_string()
        } else if error_string.contains("certificate") || error_string.contains("ssl") {
            "SSL error".to_string()
        } else {
            error_string
        };

        ValidationOutcome {
            success: false,
            status_code: 0,
            message,
        }
    }
}
