// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Open the timestamped TSV error report
// 3. Walk the collection (clusters -> pages -> seeds), validating each seed
// 4. Close the report and print the summary - on EVERY exit path
// 5. Exit with proper code (0 = clean run, 1 = run aborted, 2 = setup error)
//
// An unexpected error during the walk is caught exactly once, right here.
// It never skips the report close or the summary - partial counts are
// still worth printing.
//
// Rust concepts:
// - async/await: All network I/O runs on the tokio runtime
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Ownership: The walker gives its summary back when the run is over
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - per-URL validation logic
mod cli; // src/cli.rs - command-line parsing
mod collection; // src/collection/ - collection API client + walker
mod report; // src/report.rs - TSV error report

// Import items we need from our modules
use checker::UrlValidator;
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use collection::{CollectionClient, CollectionWalker, RunSummary};
use report::ReportWriter;
use std::time::Instant;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Setup failed before the walk even started
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = run completed
//   Ok(1) = run aborted on an unexpected error (partial results reported)
//   Err   = setup error (report could not be opened, client build failed)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    println!("🔍 Checking seeds from {}", cli.endpoint);

    // Open the report first: if we can't record failures there is no
    // point in burning network time
    let mut report = ReportWriter::create()?;
    println!("📝 Writing failures to {}", report.path().display());

    let api = CollectionClient::new();
    let validator = UrlValidator::new()?;
    let mut walker = CollectionWalker::new(api, validator);

    let started = Instant::now();
    let walk_result = walker.run(&cli.endpoint, cli.limit, &mut report).await;

    // The one place unexpected walk errors are caught - report close and
    // summary printing happen regardless
    if let Err(e) = &walk_result {
        eprintln!("⚠️  Unexpected error, stopping early: {}", e);
    }
    if let Err(e) = report.finish() {
        eprintln!("⚠️  Could not close the report cleanly: {}", e);
    }

    let summary = walker.into_summary(started.elapsed());
    print_summary(&summary);

    Ok(if walk_result.is_ok() { 0 } else { 1 })
}

// Prints the run totals in a human-readable block
fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Summary:");
    println!("   📋 URLs processed: {}", summary.processed);
    println!("   ✅ Successes: {}", summary.successes);
    println!("   ❌ Failures: {}", summary.failures);
    println!("   ⏱️  Execution time: {:.2}s", summary.elapsed_seconds);
    if summary.processed > 0 {
        println!(
            "   ⏱️  Average per URL: {:.2}s",
            summary.elapsed_seconds / summary.processed as f64
        );
    }
}
