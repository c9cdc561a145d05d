// src/checker/status.rs
// =============================================================================
// This module classifies HTTP status codes into validation verdicts.
//
// Key functionality:
// - Maps every possible status code to exactly one human-readable message
// - Flags plain 200 responses as "candidate" successes (the robots gate
//   still has to approve them before we call the URL good)
// - Reads the Location header for redirects so the report shows where a
//   moved seed went
//
// Rust concepts:
// - Pattern matching: To carve the status range into brackets
// - Ranges: (201..=299) style range patterns
// - HeaderMap: reqwest's typed view of HTTP response headers
// =============================================================================

use reqwest::header::{HeaderMap, LOCATION};

// The verdict for a single status code
//
// candidate_success is only true for a plain 200 - the caller still has to
// run the robots check before declaring the URL good.
#[derive(Debug, Clone)]
pub struct Classification {
    /// True only for HTTP 200 (pending robots approval)
    pub candidate_success: bool,
    /// Human-readable explanation that ends up in the report
    pub message: String,
}

// Classifies an HTTP status code (plus response headers) into a verdict
//
// This is a total function: every u16 lands in exactly one bracket below,
// so no status code can fall through unclassified.
//
// The brackets, checked in priority order:
//   200            -> candidate success
//   206            -> "No content"
//   201-299        -> "Other 2xx"
//   300-399        -> Location header value, or "Redirect without location"
//   400-406        -> specific client error messages
//   407-499        -> "Other 4xx"
//   below 200      -> "Partial response"
//   500 and above  -> "Server error"
pub fn classify(status_code: u16, headers: &HeaderMap) -> Classification {
    let (candidate_success, message) = match status_code {
        200 => (true, "OK".to_string()),
        206 => (false, "No content".to_string()),
        201..=299 => (false, "Other 2xx".to_string()),
        300..=399 => (false, redirect_message(headers)),
        400 => (false, "Bad Request".to_string()),
        401 => (false, "Unauthorized".to_string()),
        402 => (false, "Payment required".to_string()),
        403 => (false, "Forbidden".to_string()),
        404 => (false, "Not found".to_string()),
        405 => (false, "Method not allowed".to_string()),
        406 => (false, "Not acceptable".to_string()),
        407..=499 => (false, "Other 4xx".to_string()),
        // Everything below 200 (1xx interim responses and anything odd)
        0..=199 => (false, "Partial response".to_string()),
        // 500 and everything above
        _ => (false, "Server error".to_string()),
    };

    Classification {
        candidate_success,
        message,
    }
}

// Builds the message for a 3xx response
//
// If the server told us where the seed moved to, the redirect target itself
// is the most useful thing to put in the report.
fn redirect_message(headers: &HeaderMap) -> String {
    headers
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(|target| target.to_string())
        .unwrap_or_else(|| "Redirect without location".to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why match instead of if/else chains?
//    - Range patterns (201..=299) state the brackets directly
//    - The compiler proves the match covers every u16, so the function is
//      total by construction - no status code can slip through
//
// 2. Why is 206 checked before the 201..=299 range?
//    - match tries arms top to bottom; the first hit wins
//    - 206 needs its own message, so it has to come before the range
//      that would otherwise swallow it
//
// 3. What is unwrap_or_else?
//    - Like unwrap_or, but the fallback is a closure
//    - The closure only runs when the Option is None, so we don't build
//      the fallback String on the happy path
//
// 4. Why take HeaderMap instead of just the Location value?
//    - The caller shouldn't need to know which bracket wants which header
//    - Handing over the whole map keeps the classification policy in
//      one place
// -----------------------------------------------------------------------------
