// src/checker/robots.rs
// =============================================================================
// This module decides whether our crawler may fetch a URL at all.
//
// How it works:
// 1. Derive the robots.txt location from the seed URL's origin
//    (scheme + host + port only - path and query are discarded)
// 2. Fetch the robots.txt with a bounded timeout
// 3. Evaluate the Allow/Disallow rules for our agent name
// 4. Also read the Crawl-delay directive (we surface it, we don't sleep on it)
//
// If the robots.txt cannot be fetched or the URL cannot be parsed, we fall
// back to "allow" - an unreachable policy file never blocks validation.
//
// Rust concepts:
// - Option chaining: ? on Option inside helper functions
// - Struct methods: The gate owns its HTTP client and timeout
// - External crates: robotstxt is a port of Google's robots.txt matcher
// =============================================================================

use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

// How long we wait for a robots.txt before giving up and allowing the URL.
// The probe timeout is 30s; policy files should answer much faster.
const DEFAULT_ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);

// The outcome of one robots evaluation
//
// Computed fresh for every URL - we deliberately do not cache robots.txt
// per host, so a verdict always reflects what the server said just now.
#[derive(Debug, Clone)]
pub struct RobotsDecision {
    /// Whether the agent may fetch the URL
    pub allowed: bool,
    /// Why the gate decided the way it did
    pub reason: String,
    /// Crawl-delay directive for the agent, in seconds, if the site sets one
    pub crawl_delay: Option<f64>,
}

// The robots gate itself: an HTTP client plus a fetch timeout
pub struct RobotsGate {
    client: Client,
    fetch_timeout: Duration,
}

impl RobotsGate {
    // Creates a gate with the default bounded fetch timeout
    pub fn new() -> Self {
        Self::with_fetch_timeout(DEFAULT_ROBOTS_TIMEOUT)
    }

    // Creates a gate with a custom fetch timeout (handy in tests)
    pub fn with_fetch_timeout(fetch_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            fetch_timeout,
        }
    }

    // Convenience wrapper when the caller only cares about yes/no
    //
    // Also narrates what the policy said: a Crawl-delay directive is
    // surfaced for operators (validation never paces on it), and a denial
    // explains which robots.txt spoke.
    pub async fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        let decision = self.evaluate(url, user_agent).await;

        if let Some(delay) = decision.crawl_delay {
            println!("   ℹ️  robots.txt requests a {}s crawl delay", delay);
        }
        if !decision.allowed {
            eprintln!("   🤖 {}", decision.reason);
        }

        decision.allowed
    }

    // Evaluates robots policy for one URL and agent
    //
    // Every call re-fetches the robots.txt - no per-host caching. That keeps
    // the gate stateless and the verdict fresh, at the cost of one extra
    // request per successful probe.
    pub async fn evaluate(&self, url: &str, user_agent: &str) -> RobotsDecision {
        let robots_url = match robots_url_for(url) {
            Some(robots_url) => robots_url,
            None => {
                return RobotsDecision {
                    allowed: true,
                    reason: format!("no origin to derive robots.txt from '{}'", url),
                    crawl_delay: None,
                }
            }
        };

        let body = match self.fetch_robots(&robots_url).await {
            Some(body) => body,
            None => {
                // No policy file reachable - the default is to allow
                return RobotsDecision {
                    allowed: true,
                    reason: format!("robots.txt unavailable at {}", robots_url),
                    crawl_delay: None,
                };
            }
        };

        let mut matcher = DefaultMatcher::default();
        let allowed = matcher.one_agent_allowed_by_robots(&body, user_agent, url);
        let crawl_delay = crawl_delay_for(&body, user_agent);

        RobotsDecision {
            allowed,
            reason: if allowed {
                format!("allowed by {}", robots_url)
            } else {
                format!("disallowed by {}", robots_url)
            },
            crawl_delay,
        }
    }

    // Fetches the robots.txt body, or None if anything goes wrong
    //
    // A non-2xx answer (most commonly a 404) means the site publishes no
    // usable policy, which we treat the same as an unreachable file.
    async fn fetch_robots(&self, robots_url: &str) -> Option<String> {
        let response = self
            .client
            .get(robots_url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        response.text().await.ok()
    }
}

// Derives the robots.txt URL from a target URL's origin
//
// Only scheme and authority survive; path, query and fragment are discarded.
// A non-default port stays in (url::Url reports None for default ports).
//
// Example:
//   "https://example.com/reports/2024?page=2" -> "https://example.com/robots.txt"
pub fn robots_url_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}/robots.txt", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}/robots.txt", parsed.scheme(), host)),
    }
}

// Reads the Crawl-delay directive for an agent from a robots.txt body
//
// The robotstxt matcher doesn't expose Crawl-delay, so we scan for it
// ourselves: find the User-agent block that applies (a named match beats
// the * wildcard) and take its Crawl-delay value.
fn crawl_delay_for(body: &str, user_agent: &str) -> Option<f64> {
    let agent_lower = user_agent.to_lowercase();
    let mut block_applies = false;
    let mut named_block_seen = false;
    let mut delay = None;

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let lower = line.to_lowercase();
        if let Some(agent) = lower.strip_prefix("user-agent:") {
            let agent = agent.trim();
            if agent == "*" {
                // The wildcard block only applies while no named block matched
                block_applies = !named_block_seen;
            } else if agent_lower.contains(agent) {
                block_applies = true;
                named_block_seen = true;
                // A named block overrides whatever the wildcard block said
                delay = None;
            } else {
                block_applies = false;
            }
        } else if block_applies {
            if let Some(value) = lower.strip_prefix("crawl-delay:") {
                if let Ok(seconds) = value.trim().parse::<f64>() {
                    delay = Some(seconds);
                }
            }
        }
    }

    delay
}
