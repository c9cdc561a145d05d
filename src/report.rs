// src/report.rs
// =============================================================================
// This module writes the tab-separated error report.
//
// The report is a scoped resource: opened once at run start, rows appended
// (and flushed) as failures are encountered, and closed on every exit path.
// main() calls finish() explicitly; if anything unwinds past that, the
// BufWriter still flushes when it drops.
//
// File name: seed-errors-<YYYYMMDD-HHMMSS>.tsv, timestamped at run start.
// Columns:   URL  UUID  Org  Code  Message
//
// Rust concepts:
// - RAII: Dropping the writer flushes it, so no bare global file handle
// - BufWriter: Buffers small writes into fewer syscalls
// - writeln!: Formatted writing into anything that implements Write
// =============================================================================

use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::checker::ValidationOutcome;
use crate::collection::SeedRecord;

// The open report file plus the path we tell the user about
pub struct ReportWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportWriter {
    // Opens a report named after the run-start timestamp, in the
    // current directory
    pub fn create() -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S");
        Self::create_at(PathBuf::from(format!("seed-errors-{}.tsv", timestamp)))
    }

    // Opens a report at an explicit path and writes the header row
    pub fn create_at(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)
            .map_err(|e| anyhow!("Failed to create report file {}: {}", path.display(), e))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "URL\tUUID\tOrg\tCode\tMessage")?;
        writer.flush()?;

        Ok(Self { path, writer })
    }

    /// Where the report lives, for the console banner
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Appends one failed seed, flushed immediately so the row survives
    // however the run ends
    pub fn write_failure(&mut self, record: &SeedRecord, outcome: &ValidationOutcome) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}",
            record.url, record.uuid, record.org_slug, outcome.status_code, outcome.message
        )?;
        self.writer.flush()?;
        Ok(())
    }

    // Flushes and closes the report
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
