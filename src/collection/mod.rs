// src/collection/mod.rs
// =============================================================================
// This module covers everything about the seed collection itself.
//
// Submodules:
// - api: Talks to the paginated collection API and extracts seed records
// - walker: Walks clusters -> pages -> seeds and drives the validator
//
// This file (mod.rs) is the module root - it re-exports the public API
// so the rest of the application doesn't care about our file layout.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod api;
mod walker;

// Re-export public items from submodules
pub use api::{ApiPage, CollectionClient, SeedEntry, SeedRecord, API_KEY_ENV, DEFAULT_ENDPOINT};
pub use walker::{CollectionWalker, RunSummary, CLUSTERS};
