// src/checker/mod.rs
// =============================================================================
// This module contains all URL validation logic.
//
// Submodules:
// - status: Classifies HTTP status codes into verdict messages
// - robots: Fetches and evaluates robots.txt policies
// - validate: Runs the full per-URL check (probe -> classify -> robots)
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod robots;
mod status;
mod validate;

// Re-export public items from submodules
// This lets users write `checker::UrlValidator` instead of
// `checker::validate::UrlValidator`
pub use robots::{robots_url_for, RobotsDecision, RobotsGate};
pub use status::{classify, Classification};
pub use validate::{UrlValidator, ValidationOutcome, CRAWLER_AGENT};
