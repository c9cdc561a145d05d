// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The surface is deliberately tiny - an endpoint override and a stop-after
// cap. Everything else about a run is fixed.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;

use crate::collection::DEFAULT_ENDPOINT;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "seed-guardian",
    version = "0.1.0",
    about = "Checks that collection seed URLs are alive and open to crawling",
    long_about = "seed-guardian pages through the Commons Collection API, probes every seed URL \
                  it finds, applies robots-exclusion policy, and writes the failures to a \
                  timestamped TSV report."
)]
pub struct Cli {
    /// The collection endpoint to use
    ///
    /// Accepts both the short and the long form: -e / --endpoint
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Stop after this many URLs have been processed (0 = unlimited)
    ///
    /// Short-only: -n 100
    #[arg(short = 'n', value_name = "N", default_value_t = 0)]
    pub limit: u64,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why no subcommands?
//    - This tool does exactly one thing: walk the collection and check seeds
//    - Flat options keep invocations short: seed-guardian -n 100
//    - clap still generates --help and --version for free
//
// 2. What does default_value do?
//    - Fills the field when the user doesn't pass the flag
//    - We point it at a shared constant so the CLI and the API client
//      can never disagree about the production endpoint
//
// 3. Why u64 for the cap?
//    - Counts can't be negative, so an unsigned type says so in the type
//    - 0 doubles as the "unlimited" sentinel
//
// 4. What is #[arg(short = 'n')]?
//    - Creates a short flag without a long form
//    - With a bare #[arg(short, long)], clap derives both from the field name
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["seed-guardian"]);
        assert_eq!(cli.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cli.limit, 0);
    }

    #[test]
    fn test_endpoint_override_and_cap() {
        let cli = Cli::parse_from([
            "seed-guardian",
            "-e",
            "https://staging.example.com/api/collections/",
            "-n",
            "25",
        ]);
        assert_eq!(cli.endpoint, "https://staging.example.com/api/collections/");
        assert_eq!(cli.limit, 25);
    }
}
